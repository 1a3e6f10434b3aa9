use thiserror::Error;

/// Failures of the filename-parsing layer. These indicate a caller or setup
/// bug and are always reported, never absorbed into defaults.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("bad form for {format} results filename: {filename:?}")]
    MalformedFilename { format: String, filename: String },

    #[error("unknown filename format {0:?}")]
    UnknownFormat(String),

    #[error("filename format {0:?} is already registered")]
    DuplicateFormat(String),

    #[error("field {field:?} has unconvertible value {value:?}: {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },
}

/// Failures of the query layer that are not "absent" or "out of range".
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unsupported radius kind {0:?} (expected one of r, rp, rn)")]
    UnsupportedRadiusKind(String),
}

/// Failures while a loader populates a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("matrix for {observable} has {rows}x{cols} entries, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        observable: String,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("diagonal sector matrix for {observable} must be square, got {rows}x{cols}")]
    NonSquareDiagonal {
        observable: String,
        rows: usize,
        cols: usize,
    },

    #[error("angular momentum {0} is not a multiple of 1/2")]
    NotHalfInteger(f64),

    #[error("angular momentum {0} is negative")]
    NegativeAngularMomentum(f64),
}
