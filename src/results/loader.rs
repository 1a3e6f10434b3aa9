use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use ndarray::Array2;
use serde::Deserialize;

use super::dataset::{Listing, ResultsDataset};
use super::quantum::{HalfInt, StateQn, SubspaceLabel, SubspacePair};
use crate::descriptor::FieldValue;
use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a results dataset from an interchange file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – full snapshot: params, energies, observables, decompositions, listings
/// * `.csv`  – energy table with columns `J`, `g`, `n`, `E`
pub fn load_file(path: &Path) -> Result<ResultsDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    info!(
        "loaded {}: {} states, {} observables",
        path.display(),
        dataset.energies.len(),
        dataset.observable_names().count()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (all sections optional):
///
/// ```json
/// {
///   "params": { "A": 8, "hw": 20.0, "interaction": "JISP16" },
///   "energies": [ { "J": 0.0, "g": 0, "n": 1, "E": -30.12 } ],
///   "observables": [
///     { "name": "E2p", "bra": [0.0, 0], "ket": [2.0, 0], "matrix": [[1.2], [0.3]] }
///   ],
///   "decompositions": [
///     { "kind": "Nex", "subspace": [0.0, 0], "matrix": [[0.9, 0.2], [0.1, 0.8]] }
///   ],
///   "listings": { "spj": { "columns": ["J", "dim"], "rows": [[0.0, 4]] } }
/// }
/// ```
///
/// Observables may be given for either order of a subspace pair; they are
/// stored canonically.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    params: BTreeMap<String, FieldValue>,
    energies: Vec<EnergyRecord>,
    observables: Vec<ObservableRecord>,
    decompositions: Vec<DecompositionRecord>,
    listings: BTreeMap<String, ListingRecord>,
}

#[derive(Debug, Deserialize)]
struct EnergyRecord {
    #[serde(rename = "J")]
    j: f64,
    g: u8,
    n: usize,
    #[serde(rename = "E")]
    energy: f64,
}

#[derive(Debug, Deserialize)]
struct ObservableRecord {
    name: String,
    bra: (f64, u8),
    ket: (f64, u8),
    matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct DecompositionRecord {
    kind: String,
    subspace: (f64, u8),
    matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn load_json(path: &Path) -> Result<ResultsDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Build a dataset from a JSON snapshot held in memory.
pub fn parse_json(text: &str) -> Result<ResultsDataset> {
    let snapshot: Snapshot = serde_json::from_str(text).context("parsing JSON")?;
    let mut dataset = ResultsDataset::new();
    dataset.params = snapshot.params;

    for (i, rec) in snapshot.energies.iter().enumerate() {
        let qn = StateQn::from_f64(rec.j, rec.g, rec.n)
            .with_context(|| format!("energies[{i}]"))?;
        if rec.n == 0 {
            warn!("energies[{i}]: skipping state with ordinal 0");
            continue;
        }
        dataset.set_energy(qn, rec.energy);
    }

    for (i, rec) in snapshot.observables.into_iter().enumerate() {
        let pair = SubspacePair::new(label(rec.bra)?, label(rec.ket)?);
        let matrix = rows_to_array(&rec.name, rec.matrix)
            .with_context(|| format!("observables[{i}] ({})", rec.name))?;
        dataset
            .insert_observable(rec.name.clone(), pair, matrix)
            .with_context(|| format!("observables[{i}] ({})", rec.name))?;
    }

    for (i, rec) in snapshot.decompositions.into_iter().enumerate() {
        let subspace = label(rec.subspace)?;
        let array = rows_to_array(&rec.kind, rec.matrix)
            .with_context(|| format!("decompositions[{i}] ({})", rec.kind))?;
        dataset.set_decomposition(rec.kind, subspace, array);
    }

    for (name, rec) in snapshot.listings {
        if let Some(row) = rec.rows.iter().position(|r| r.len() != rec.columns.len()) {
            bail!(
                "listing {name}: row {row} has {} values but there are {} columns",
                rec.rows[row].len(),
                rec.columns.len()
            );
        }
        dataset.set_listing(name, Listing::new(rec.columns, rec.rows));
    }

    Ok(dataset)
}

fn label((j, g): (f64, u8)) -> Result<SubspaceLabel> {
    Ok(SubspaceLabel::new(HalfInt::try_from(j)?, g))
}

/// Row-major nested vectors → dense matrix. All rows must have equal length.
fn rows_to_array(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, DatasetError> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
        return Err(DatasetError::ShapeMismatch {
            observable: name.to_string(),
            rows: n_rows,
            cols: bad.len(),
            expected_rows: n_rows,
            expected_cols: n_cols,
        });
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|_| DatasetError::ShapeMismatch {
        observable: name.to_string(),
        rows: n_rows,
        cols: n_cols,
        expected_rows: n_rows,
        expected_cols: n_cols,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, then one state per row.
///   `J,g,n,E`
///   `0.0,0,1,-30.12`
/// Extra columns are ignored.
fn load_csv(path: &Path) -> Result<ResultsDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_energy_table(reader)
}

/// Read an energy table from any CSV source.
pub fn read_energy_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ResultsDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let (j_idx, g_idx, n_idx, e_idx) = (column("J")?, column("g")?, column("n")?, column("E")?);

    let mut dataset = ResultsDataset::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let j: f64 = parse_cell(field(j_idx), row_no, "J")?;
        let g: u8 = parse_cell(field(g_idx), row_no, "g")?;
        let n: usize = parse_cell(field(n_idx), row_no, "n")?;
        let energy: f64 = parse_cell(field(e_idx), row_no, "E")?;

        let qn = StateQn::from_f64(j, g, n).with_context(|| format!("CSV row {row_no}"))?;
        if n == 0 {
            warn!("CSV row {row_no}: skipping state with ordinal 0");
            continue;
        }
        dataset.set_energy(qn, energy);
    }

    Ok(dataset)
}

fn parse_cell<T>(s: &str, row: usize, col: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse::<T>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "params": { "A": 8, "hw": 20.0, "interaction": "JISP16" },
        "energies": [
            { "J": 0.0, "g": 0, "n": 1, "E": -30.5 },
            { "J": 2.0, "g": 0, "n": 1, "E": -27.0 }
        ],
        "observables": [
            { "name": "E2p", "bra": [2.0, 0], "ket": [0.0, 0], "matrix": [[2.0]] },
            { "name": "r2intr", "bra": [0.0, 0], "ket": [0.0, 0], "matrix": [[32.0]] }
        ],
        "decompositions": [
            { "kind": "Nex", "subspace": [0.0, 0], "matrix": [[0.75], [0.25]] }
        ],
        "listings": { "spj": { "columns": ["J", "dim"], "rows": [[0.0, 4], [2.0, 3]] } }
    }"#;

    fn qn(j: f64, g: u8, n: usize) -> StateQn {
        StateQn::from_f64(j, g, n).unwrap()
    }

    #[test]
    fn json_snapshot_populates_every_section() {
        let ds = parse_json(SNAPSHOT).unwrap();
        assert_eq!(ds.param("A"), Some(&FieldValue::Int(8)));
        assert_eq!(ds.param("interaction"), Some(&FieldValue::from("JISP16")));
        assert_eq!(ds.get_levels(), vec![qn(0.0, 0, 1), qn(2.0, 0, 1)]);
        assert_eq!(ds.listing_label("spj", 1, "dim"), Some(3.0));
        assert_eq!(
            ds.get_decomposition("Nex", qn(0.0, 0, 1)).map(|c| c.to_vec()),
            Some(vec![0.75, 0.25])
        );
        assert!((ds.get_radius("r", qn(0.0, 0, 1), f64::NAN).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn json_observable_given_in_reverse_order_round_trips() {
        let ds = parse_json(SNAPSHOT).unwrap();
        // stored as given for (2,0): requesting (2,0) returns it unchanged
        let gt = ds
            .rme("E2p", qn(2.0, 0, 1), qn(0.0, 0, 1), crate::results::RmeConvention::GroupTheory)
            .unwrap();
        assert!((gt - 2.0).abs() < 1e-12);
        assert_eq!(ds.observable_pairs("E2p").count(), 1);
        assert!(ds.observable_pairs("E2p").all(SubspacePair::is_canonical));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let text = r#"{ "observables": [
            { "name": "M1", "bra": [1.0, 0], "ket": [2.0, 0], "matrix": [[1.0, 2.0], [3.0]] }
        ] }"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("M1"));
    }

    #[test]
    fn quarter_integer_j_is_rejected() {
        let text = r#"{ "energies": [ { "J": 0.25, "g": 0, "n": 1, "E": 1.0 } ] }"#;
        assert!(parse_json(text).is_err());
    }

    #[test]
    fn negative_j_is_rejected() {
        let text = r#"{ "observables": [
            { "name": "M1", "bra": [-0.5, 0], "ket": [-0.5, 0], "matrix": [[1.0]] }
        ] }"#;
        let err = parse_json(text).unwrap_err();
        assert!(err.downcast_ref::<DatasetError>().is_some_and(|e| matches!(
            e,
            DatasetError::NegativeAngularMomentum(_)
        )));

        let text = r#"{ "energies": [ { "J": -1.0, "g": 0, "n": 1, "E": 1.0 } ] }"#;
        assert!(parse_json(text).is_err());
    }

    #[test]
    fn csv_energy_table() {
        let data = "J,g,n,E\n1.5,1,1,-40.25\n0.5,1,1,-38.0\n1.5,1,2,-35.5\n";
        let ds = read_energy_table(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(
            ds.get_levels(),
            vec![qn(1.5, 1, 1), qn(0.5, 1, 1), qn(1.5, 1, 2)]
        );
    }

    #[test]
    fn ordinal_zero_is_skipped_by_both_loaders() {
        let data = "J,g,n,E\n0.0,0,0,-5.0\n0.0,0,1,-4.0\n";
        let from_csv = read_energy_table(csv::Reader::from_reader(data.as_bytes())).unwrap();
        let from_json = parse_json(
            r#"{ "energies": [
                { "J": 0.0, "g": 0, "n": 0, "E": -5.0 },
                { "J": 0.0, "g": 0, "n": 1, "E": -4.0 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(from_csv.get_levels(), vec![qn(0.0, 0, 1)]);
        assert_eq!(from_csv.get_levels(), from_json.get_levels());
    }

    #[test]
    fn csv_missing_column_fails() {
        let data = "J,g,E\n1.5,1,-40.25\n";
        let err = read_energy_table(csv::Reader::from_reader(data.as_bytes())).unwrap_err();
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn load_file_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("run0000.json");
        std::fs::File::create(&json)
            .unwrap()
            .write_all(SNAPSHOT.as_bytes())
            .unwrap();
        assert_eq!(load_file(&json).unwrap().energies.len(), 2);

        let other = dir.path().join("run0000.res");
        std::fs::write(&other, "").unwrap();
        let err = load_file(&other).unwrap_err();
        assert!(err.to_string().contains(".res"));
    }
}
