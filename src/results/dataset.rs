use std::collections::BTreeMap;

use log::debug;
use ndarray::Array2;

use super::canonical::{Canonicalization, RmeConvention};
use super::quantum::{StateQn, SubspaceLabel, SubspacePair};
use crate::descriptor::{FieldValue, ParsedDescriptor};
use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Listing – a column-labelled basis enumeration table
// ---------------------------------------------------------------------------

/// A basis listing (e.g. SpJ or baby SpNCCI subspaces): one row per entry,
/// one named numeric column per label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl Listing {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    /// Value of `column` for entry `row`.
    pub fn label(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ResultsDataset – the complete content of one loaded run
// ---------------------------------------------------------------------------

/// Observable name → canonical subspace pair → RME matrix (group-theory
/// convention, rows/columns indexed by 0-based in-subspace ordinal).
pub type ObservableStore = BTreeMap<String, BTreeMap<SubspacePair, Array2<f64>>>;

/// Decomposition kind → subspace → array with one column per state.
pub type DecompositionStore = BTreeMap<String, BTreeMap<SubspaceLabel, Array2<f64>>>;

/// Results of one run. Created empty, filled by a loader, then queried.
///
/// Observable matrices are held only for canonical subspace pairs; use
/// [`ResultsDataset::insert_observable`] so that invariant holds whatever
/// order a loader encounters them in.
#[derive(Debug, Clone, Default)]
pub struct ResultsDataset {
    pub params: BTreeMap<String, FieldValue>,
    pub energies: BTreeMap<StateQn, f64>,
    pub listings: BTreeMap<String, Listing>,
    pub decompositions: DecompositionStore,
    pub(crate) observables: ObservableStore,
}

impl ResultsDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `params` from a parsed filename. `A = Z + N` is derived when
    /// both are present and `A` is not already a field.
    pub fn from_descriptor(descriptor: &ParsedDescriptor) -> Self {
        let mut dataset = Self::new();
        dataset.extend_params(descriptor);
        dataset
    }

    pub fn extend_params(&mut self, descriptor: &ParsedDescriptor) {
        for (key, value) in descriptor.iter() {
            self.params.insert(key.clone(), value.clone());
        }
        if !self.params.contains_key("A") {
            if let (Some(z), Some(n)) = (descriptor.get_i64("Z"), descriptor.get_i64("N")) {
                self.params.insert("A".to_string(), FieldValue::Int(z + n));
            }
        }
    }

    pub fn param(&self, key: &str) -> Option<&FieldValue> {
        self.params.get(key)
    }

    // -- energies --

    pub fn set_energy(&mut self, qn: StateQn, energy: f64) {
        self.energies.insert(qn, energy);
    }

    pub fn get_energy(&self, qn: &StateQn) -> Option<f64> {
        self.energies.get(qn).copied()
    }

    /// All states, sorted by energy (ties broken by quantum numbers).
    pub fn get_levels(&self) -> Vec<StateQn> {
        let mut levels: Vec<(StateQn, f64)> =
            self.energies.iter().map(|(qn, e)| (*qn, *e)).collect();
        levels.sort_by(|(qa, ea), (qb, eb)| ea.total_cmp(eb).then(qa.cmp(qb)));
        levels.into_iter().map(|(qn, _)| qn).collect()
    }

    // -- listings --

    pub fn set_listing(&mut self, name: impl Into<String>, listing: Listing) {
        self.listings.insert(name.into(), listing);
    }

    pub fn listing_label(&self, listing: &str, row: usize, column: &str) -> Option<f64> {
        self.listings.get(listing)?.label(row, column)
    }

    // -- decompositions --

    pub fn set_decomposition(
        &mut self,
        kind: impl Into<String>,
        subspace: SubspaceLabel,
        array: Array2<f64>,
    ) {
        self.decompositions
            .entry(kind.into())
            .or_default()
            .insert(subspace, array);
    }

    // -- observables --

    /// Store a group-theory RME matrix for `pair`.
    ///
    /// Non-canonical pairs are transposed and rescaled into canonical order
    /// before storage. Diagonal sectors must be complete square matrices.
    pub fn insert_observable(
        &mut self,
        observable: impl Into<String>,
        pair: SubspacePair,
        matrix: Array2<f64>,
    ) -> Result<(), DatasetError> {
        let observable = observable.into();
        let (rows, cols) = matrix.dim();
        if pair.is_diagonal() && rows != cols {
            return Err(DatasetError::NonSquareDiagonal {
                observable,
                rows,
                cols,
            });
        }

        let (canonical, matrix) = if pair.is_canonical() {
            (pair, matrix)
        } else {
            let canonical = pair.swapped();
            // inverse of the exchange applied on retrieval
            let to_canonical = Canonicalization {
                pair: canonical,
                flipped: true,
                factor: RmeConvention::GroupTheory.exchange_factor(canonical.bra.j, canonical.ket.j),
            };
            debug!("storing {observable} {pair} as {canonical}");
            (canonical, to_canonical.apply(matrix.view()))
        };

        self.observables
            .entry(observable)
            .or_default()
            .insert(canonical, matrix);
        Ok(())
    }

    /// Stored canonical matrix, without any transformation.
    pub fn stored_observable(&self, observable: &str, pair: &SubspacePair) -> Option<&Array2<f64>> {
        self.observables.get(observable)?.get(pair)
    }

    pub fn observable_names(&self) -> impl Iterator<Item = &str> {
        self.observables.keys().map(String::as_str)
    }

    pub fn observable_pairs(&self, observable: &str) -> impl Iterator<Item = &SubspacePair> {
        self.observables
            .get(observable)
            .into_iter()
            .flat_map(|pairs| pairs.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FormatRegistry;
    use crate::results::quantum::HalfInt;
    use ndarray::array;

    fn label(twice_j: i32, g: u8) -> SubspaceLabel {
        SubspaceLabel::new(HalfInt::from_twice(twice_j), g)
    }

    #[test]
    fn descriptor_seeds_params_and_mass_number() {
        let registry = FormatRegistry::with_builtin_formats().unwrap();
        let descriptor = registry
            .parse(
                "run0000-mfdn-Z2-N6-Daejeon16-coul1-hw05.000-a_cm20-Nmax02-Mj0.0-lan500-tol1.0e-06.res",
                "mfdn_format_7_ho",
            )
            .unwrap();
        let dataset = ResultsDataset::from_descriptor(&descriptor);
        assert_eq!(dataset.param("A"), Some(&FieldValue::Int(8)));
        assert_eq!(dataset.param("hw"), Some(&FieldValue::Float(5.0)));
    }

    #[test]
    fn levels_sort_by_energy() {
        let mut ds = ResultsDataset::new();
        let a = StateQn::from_f64(0.0, 0, 1).unwrap();
        let b = StateQn::from_f64(2.0, 0, 1).unwrap();
        let c = StateQn::from_f64(1.0, 1, 1).unwrap();
        ds.set_energy(a, -30.0);
        ds.set_energy(b, -27.5);
        ds.set_energy(c, -31.2);
        assert_eq!(ds.get_levels(), vec![c, a, b]);
        assert_eq!(ds.get_energy(&b), Some(-27.5));
        assert_eq!(ds.get_energy(&StateQn::from_f64(4.0, 0, 1).unwrap()), None);
    }

    #[test]
    fn non_canonical_insert_is_stored_canonically() {
        let mut ds = ResultsDataset::new();
        let upper = SubspacePair::new(label(4, 0), label(0, 0));
        ds.insert_observable("E2p", upper, array![[3.0, 1.0]].reversed_axes())
            .unwrap();

        let canonical = upper.swapped();
        assert!(ds.stored_observable("E2p", &upper).is_none());
        let stored = ds.stored_observable("E2p", &canonical).unwrap();
        assert_eq!(stored.dim(), (1, 2));
        // <0||T||2>_gt = sqrt(5) <2||T||0>_gt for integer ΔJ = 2
        assert!((stored[[0, 0]] - 3.0 * 5f64.sqrt()).abs() < 1e-12);
        assert!((stored[[0, 1]] - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn diagonal_sector_must_be_square() {
        let mut ds = ResultsDataset::new();
        let diag = SubspacePair::new(label(2, 0), label(2, 0));
        let err = ds
            .insert_observable("r2intr", diag, array![[1.0, 2.0]])
            .unwrap_err();
        assert!(matches!(err, DatasetError::NonSquareDiagonal { rows: 1, cols: 2, .. }));
    }

    #[test]
    fn listing_labels_by_column_name() {
        let mut ds = ResultsDataset::new();
        ds.set_listing(
            "baby_spncci",
            Listing::new(
                vec!["Nex".to_string(), "omega.mu".to_string()],
                vec![vec![0.0, 1.0], vec![2.0, 3.0]],
            ),
        );
        assert_eq!(ds.listing_label("baby_spncci", 1, "Nex"), Some(2.0));
        assert_eq!(ds.listing_label("baby_spncci", 2, "Nex"), None);
        assert_eq!(ds.listing_label("baby_spncci", 0, "lambda"), None);
        assert_eq!(ds.listing_label("spj", 0, "J"), None);
    }
}
