use std::collections::BTreeMap;

use super::dataset::ResultsDataset;
use crate::descriptor::FieldValue;

// ---------------------------------------------------------------------------
// Selecting runs from a mesh by their parameters
// ---------------------------------------------------------------------------

/// Parameter name → required value.
pub type Selector = BTreeMap<String, FieldValue>;

/// Return indices of datasets whose params match every entry of `selector`.
///
/// A dataset passes a selector entry when:
/// * it has the parameter and the value is equal, or
/// * it lacks the parameter and the selector asks for `Null`
///
/// Numeric values compare on the real line, so `hw = 20` selects `hw = 20.0`.
pub fn selected_indices(datasets: &[ResultsDataset], selector: &Selector) -> Vec<usize> {
    datasets
        .iter()
        .enumerate()
        .filter(|(_, ds)| {
            selector.iter().all(|(key, wanted)| match ds.params.get(key) {
                Some(value) => values_match(value, wanted),
                None => wanted.is_null(),
            })
        })
        .map(|(i, _)| i)
        .collect()
}

/// The datasets matching `selector`.
pub fn selected<'a>(datasets: &'a [ResultsDataset], selector: &Selector) -> Vec<&'a ResultsDataset> {
    selected_indices(datasets, selector)
        .into_iter()
        .map(|i| &datasets[i])
        .collect()
}

/// Indices of `datasets` ordered by the given parameter keys, in order of
/// priority. Missing parameters sort first (as `Null`).
pub fn sorted_indices(datasets: &[ResultsDataset], keys: &[&str]) -> Vec<usize> {
    let sort_key = |ds: &ResultsDataset| -> Vec<FieldValue> {
        keys.iter()
            .map(|k| ds.params.get(*k).cloned().unwrap_or(FieldValue::Null))
            .collect()
    };
    let mut indices: Vec<usize> = (0..datasets.len()).collect();
    indices.sort_by_cached_key(|&i| sort_key(&datasets[i]));
    indices
}

fn values_match(value: &FieldValue, wanted: &FieldValue) -> bool {
    match (value.as_f64(), wanted.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => value == wanted,
    }
}
