//! Schema validation of the ticket store with detailed error reporting

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::ops::Range;
use thiserror::Error;

use crate::core::store::line_col_to_offset;
use crate::schema::registry::SchemaRegistry;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(glazier::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// The embedded ticket schema could not be compiled
#[derive(Debug, Error, Diagnostic)]
#[error("ticket schema is unavailable: {0}")]
#[diagnostic(code(glazier::schema::unavailable))]
pub struct SchemaUnavailable(String);

/// Validator for ticket store files
pub struct Validator {
    compiled: JsonValidator,
}

impl Validator {
    /// Compile the ticket store schema from the registry
    pub fn new(registry: &SchemaRegistry) -> Result<Self, SchemaUnavailable> {
        let text = registry
            .tickets()
            .ok_or_else(|| SchemaUnavailable("not embedded".to_string()))?;
        let schema: JsonValue =
            serde_json::from_str(text).map_err(|e| SchemaUnavailable(e.to_string()))?;
        let compiled = validator_for(&schema).map_err(|e| SchemaUnavailable(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate the text of a ticket store, reporting every violation
    pub fn validate(&self, source: &str, filename: &str) -> Result<(), ValidationError> {
        let value: JsonValue = match serde_json::from_str(source) {
            Ok(v) => v,
            Err(e) => {
                let offset = line_col_to_offset(source, e.line(), e.column());
                let violation = SchemaViolation::new(
                    format!("JSON parse error: {}", e),
                    "invalid JSON".to_string(),
                    (offset, 1).into(),
                    Some("Check brackets, commas and quotes".to_string()),
                );
                return Err(ValidationError::new(filename, source, vec![violation]));
            }
        };

        let items = item_ranges(source);
        let violations: Vec<SchemaViolation> = self
            .compiled
            .iter_errors(&value)
            .map(|error| error_to_violation(source, &items, &error))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(filename, source, violations))
        }
    }
}

fn error_to_violation(source: &str, items: &[Range<usize>], error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);
    let span = find_path_span(source, items, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        jsonschema::error::ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, format_enum_options(options))
        }
        jsonschema::error::ValidationErrorKind::MinLength { .. } => {
            format!("Value at {} must not be empty", path)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    match options.as_array() {
        Some(values) => values
            .iter()
            .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        None => options.to_string(),
    }
}

fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => "missing field".to_string(),
        jsonschema::error::ValidationErrorKind::Enum { .. } => "invalid value".to_string(),
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        _ => "here".to_string(),
    }
}

fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => match property.as_str() {
            Some("id") => Some("Every ticket needs a numeric id; 'glazier ticket new' assigns one".to_string()),
            _ => None,
        },
        jsonschema::error::ValidationErrorKind::Enum { .. } => {
            Some("Values are lowercase, e.g. \"brushed nickel\" or \"left\"".to_string())
        }
        _ => None,
    }
}

/// Byte ranges of the objects directly inside the top-level array
fn item_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = None;

    for (i, b) in source.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                if depth == 1 && b == b'{' {
                    start = Some(i);
                }
                depth += 1;
            }
            b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 1 && b == b'}' {
                    if let Some(s) = start.take() {
                        ranges.push(s..i + 1);
                    }
                }
            }
            _ => {}
        }
    }

    ranges
}

/// Find the span for a JSON pointer such as `/2/glassColor`
fn find_path_span(source: &str, items: &[Range<usize>], json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();
    let first_line = || -> SourceSpan { (0, source.find('\n').unwrap_or(source.len()).max(1)).into() };

    let item = match parts.first().and_then(|p| p.parse::<usize>().ok()) {
        Some(index) => match items.get(index) {
            Some(range) => range.clone(),
            None => return first_line(),
        },
        None => return first_line(),
    };

    let key = parts.iter().skip(1).rev().find(|p| p.parse::<usize>().is_err());
    if let Some(key) = key {
        let needle = format!("\"{}\"", key);
        if let Some(pos) = source[item.clone()].find(&needle) {
            return (item.start + pos, needle.len()).into();
        }
    }

    // Highlight the opening brace of the ticket
    (item.start, 1).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(&SchemaRegistry::default()).unwrap()
    }

    #[test]
    fn test_valid_store_passes() {
        let source = r#"[
  {"id": 1, "ticketNumber": "A", "customerName": "Ann", "glassColor": "black",
   "doorSide": "left", "doorWidth": "30", "panelWidth": "20", "overallWidth": "50",
   "outages": [{"side": "left", "direction": "in", "value": "1/4"}]}
]"#;
        assert!(validator().validate(source, "store.json").is_ok());
        assert!(validator().validate("[]", "store.json").is_ok());
    }

    #[test]
    fn test_bad_enum_is_reported() {
        let source = r#"[
  {"id": 1, "ticketNumber": "A", "customerName": "Ann"},
  {"id": 2, "ticketNumber": "B", "customerName": "Bo", "glassColor": "gold"}
]"#;
        let err = validator().validate(source, "store.json").unwrap_err();
        assert_eq!(err.violation_count(), 1);
        assert!(err.violations()[0].message().contains("glassColor"));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let source = r#"[{"ticketNumber": "A"}]"#;
        let err = validator().validate(source, "store.json").unwrap_err();
        assert!(err.violation_count() >= 1);
        assert!(err
            .violations()
            .iter()
            .all(|v| v.message().starts_with("Missing required field")));
    }

    #[test]
    fn test_not_json() {
        let err = validator().validate("[{", "store.json").unwrap_err();
        assert!(err.violations()[0].message().starts_with("JSON parse error"));
    }

    #[test]
    fn test_item_ranges_ignore_braces_in_strings() {
        let source = r#"[{"a": "}{"}, {"b": [1, {"c": 2}]}]"#;
        let ranges = item_ranges(source);
        assert_eq!(ranges.len(), 2);
        assert_eq!(&source[ranges[0].clone()], r#"{"a": "}{"}"#);
        assert_eq!(&source[ranges[1].clone()], r#"{"b": [1, {"c": 2}]}"#);
    }

    #[test]
    fn test_find_path_span_points_at_key() {
        let source = r#"[{"id": 1}, {"id": 2, "doorSide": "up"}]"#;
        let items = item_ranges(source);
        let span = find_path_span(source, &items, "/1/doorSide");
        let start = span.offset();
        assert_eq!(&source[start..start + span.len()], "\"doorSide\"");
    }
}
