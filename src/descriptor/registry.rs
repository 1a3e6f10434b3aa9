use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use super::formats;
use super::value::ParsedDescriptor;
use crate::error::DescriptorError;

// ---------------------------------------------------------------------------
// DescriptorParser – the capability every filename format provides
// ---------------------------------------------------------------------------

/// Turns a results filename (basename) into a typed descriptor.
///
/// Implementations either return every converted field or fail; partial
/// descriptors are never produced.
pub trait DescriptorParser: Send + Sync {
    fn parse(&self, filename: &str) -> Result<ParsedDescriptor, DescriptorError>;
}

/// Plain functions are parsers too, which keeps ad-hoc formats cheap to add.
impl<F> DescriptorParser for F
where
    F: Fn(&str) -> Result<ParsedDescriptor, DescriptorError> + Send + Sync,
{
    fn parse(&self, filename: &str) -> Result<ParsedDescriptor, DescriptorError> {
        self(filename)
    }
}

// ---------------------------------------------------------------------------
// FormatRegistry
// ---------------------------------------------------------------------------

/// Format name → parser. Built once during startup and shared read-only
/// afterwards (`&FormatRegistry` is `Send + Sync`).
#[derive(Default)]
pub struct FormatRegistry {
    parsers: BTreeMap<String, Box<dyn DescriptorParser>>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in MFDn and SpNCCI format.
    pub fn with_builtin_formats() -> Result<Self, DescriptorError> {
        let mut registry = Self::new();
        formats::register_builtin(&mut registry)?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        parser: impl DescriptorParser + 'static,
    ) -> Result<(), DescriptorError> {
        let name = name.into();
        if self.parsers.contains_key(&name) {
            return Err(DescriptorError::DuplicateFormat(name));
        }
        debug!("registering filename format {name}");
        self.parsers.insert(name, Box::new(parser));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn DescriptorParser, DescriptorError> {
        self.parsers
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| DescriptorError::UnknownFormat(name.to_string()))
    }

    /// Look up `format_name` and parse `filename` with it.
    pub fn parse(
        &self,
        filename: &str,
        format_name: &str,
    ) -> Result<ParsedDescriptor, DescriptorError> {
        self.lookup(format_name)?.parse(filename)
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}
