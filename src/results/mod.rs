/// Results layer: dataset, canonical storage, observable queries.
///
/// Architecture:
/// ```text
///  ParsedDescriptor + .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  populate → ResultsDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ResultsDataset  │  params, energies, listings,
///   └────────────────┘  decompositions, canonical observables
///        │
///        ▼
///   ┌─────────────┐
///   │ observables  │  canonicalize → RME, B(λ), radius, decomposition
///   └─────────────┘
/// ```

pub mod canonical;
pub mod dataset;
pub mod loader;
pub mod observables;
pub mod quantum;
pub mod select;

pub use canonical::{canonicalize, Canonicalization, RmeConvention};
pub use dataset::{Listing, ResultsDataset};
pub use observables::RadiusKind;
pub use quantum::{HalfInt, StateQn, SubspaceLabel, SubspacePair};
