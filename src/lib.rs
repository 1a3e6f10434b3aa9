//! Descriptors and observable queries for MFDn and SpNCCI results.
//!
//! [`descriptor`] turns a results filename into typed run parameters through
//! a [`FormatRegistry`]; [`results`] holds a run's energies and observable
//! matrices and derives RMEs, transition strengths, radii and decompositions
//! from canonically stored matrices.

pub mod descriptor;
pub mod error;
pub mod results;

pub use descriptor::{FieldValue, FormatRegistry, ParsedDescriptor};
pub use error::{DatasetError, DescriptorError, QueryError};
pub use results::{ResultsDataset, RmeConvention, StateQn};
