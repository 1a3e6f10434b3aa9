/// Results filename descriptors: registry, grammars, typed fields.
///
/// Architecture:
/// ```text
///  run0000-mfdn-Z2-N6-...-tol1.0e-06.res
///        │
///        ▼
///   ┌────────────────┐
///   │ FormatRegistry  │  format name → DescriptorParser
///   └────────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ RegexFormat   │  anchored grammar + conversion table
///   └──────────────┘
///        │
///        ▼
///   ParsedDescriptor   field → FieldValue
/// ```

pub mod formats;
pub mod grammar;
pub mod registry;
pub mod value;

pub use grammar::{Conversion, RegexFormat};
pub use registry::{DescriptorParser, FormatRegistry};
pub use value::{FieldValue, ParsedDescriptor};
