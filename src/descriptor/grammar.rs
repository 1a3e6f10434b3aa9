use std::collections::BTreeMap;

use regex::{Captures, Regex};

use super::registry::DescriptorParser;
use super::value::{FieldValue, ParsedDescriptor};
use crate::error::DescriptorError;

// ---------------------------------------------------------------------------
// Field conversions
// ---------------------------------------------------------------------------

/// How a captured group becomes a typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Int,
    Float,
    /// `true` iff the group matched and equals the given literal.
    Flag(&'static str),
    /// Integer when the group matched, `Null` otherwise.
    OptionalInt,
    /// Float when the group matched, `Null` otherwise.
    OptionalFloat,
}

impl Conversion {
    fn apply(self, field: &str, raw: Option<&str>) -> Result<FieldValue, DescriptorError> {
        match (self, raw) {
            (Conversion::Flag(literal), raw) => Ok(FieldValue::Bool(raw == Some(literal))),
            (Conversion::OptionalInt, None) | (Conversion::OptionalFloat, None) => {
                Ok(FieldValue::Null)
            }
            (Conversion::Int | Conversion::OptionalInt, Some(s)) => s
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|e| invalid(field, s, e)),
            (Conversion::Float | Conversion::OptionalFloat, Some(s)) => s
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|e| invalid(field, s, e)),
            (Conversion::Int | Conversion::Float, None) => Err(DescriptorError::InvalidField {
                field: field.to_string(),
                value: String::new(),
                reason: "required group did not participate in the match".to_string(),
            }),
        }
    }
}

fn invalid(field: &str, value: &str, err: impl std::fmt::Display) -> DescriptorError {
    DescriptorError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
        reason: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RegexFormat – a versioned filename grammar plus its conversion table
// ---------------------------------------------------------------------------

/// A filename grammar expressed as a regex with named groups, and the
/// conversion table applied to those groups after a full match.
///
/// Named groups missing from the table pass through as `Str` (or `Null`
/// when an optional group did not match).
#[derive(Debug, Clone)]
pub struct RegexFormat {
    name: &'static str,
    pattern: Regex,
    conversions: &'static [(&'static str, Conversion)],
}

impl RegexFormat {
    /// `pattern` is anchored at both ends before compiling.
    pub fn new(
        name: &'static str,
        pattern: &str,
        conversions: &'static [(&'static str, Conversion)],
    ) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            name,
            pattern,
            conversions,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn convert(&self, caps: &Captures<'_>) -> Result<ParsedDescriptor, DescriptorError> {
        let mut fields = BTreeMap::new();
        for group in self.pattern.capture_names().flatten() {
            let raw = caps.name(group).map(|m| m.as_str());
            let value = match self.conversions.iter().find(|(f, _)| *f == group) {
                Some((_, conversion)) => conversion.apply(group, raw)?,
                None => raw.map_or(FieldValue::Null, FieldValue::from),
            };
            fields.insert(group.to_string(), value);
        }
        Ok(ParsedDescriptor::new(fields))
    }
}

impl DescriptorParser for RegexFormat {
    fn parse(&self, filename: &str) -> Result<ParsedDescriptor, DescriptorError> {
        let caps = self
            .pattern
            .captures(filename)
            .ok_or_else(|| DescriptorError::MalformedFilename {
                format: self.name.to_string(),
                filename: filename.to_string(),
            })?;
        self.convert(&caps)
    }
}
