//! Per-field validity computation.

use std::fmt;

use crate::field::{FieldSnapshot, InputType};
use crate::pattern::PatternTable;
use crate::validator::Validator;

/// Message for a required field left empty (or unchecked).
pub const REQUIRED_MESSAGE: &str = "can't be empty";

/// Message for a `pattern` mismatch when the field has no `title`.
pub const ILLEGAL_FORMAT_MESSAGE: &str = "illegal value format";

/// A single reason a field is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Required field is empty, or required checkbox/radio group is unchecked.
    Required,
    /// Value does not match the pattern registered for its input type.
    TypeMismatch { kind: String, message: String },
    /// Value does not match the field's own `pattern` attribute.
    PatternMismatch { message: String },
    /// Reported by a custom validator.
    Custom(String),
}

impl Violation {
    pub fn message(&self) -> &str {
        match self {
            Violation::Required => REQUIRED_MESSAGE,
            Violation::TypeMismatch { message, .. } => message,
            Violation::PatternMismatch { message } => message,
            Violation::Custom(message) => message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Compute the ordered error messages for one field.
pub fn evaluate(
    field: &FieldSnapshot,
    validator: Option<&Validator>,
    patterns: &PatternTable,
) -> Vec<String> {
    evaluate_violations(field, validator, patterns)
        .iter()
        .map(|v| v.message().to_string())
        .collect()
}

/// Compute the violations for one field.
///
/// A non-empty custom result short-circuits every built-in check.
pub fn evaluate_violations(
    field: &FieldSnapshot,
    validator: Option<&Validator>,
    patterns: &PatternTable,
) -> Vec<Violation> {
    let custom = validator.map(|v| v.resolve(field)).unwrap_or_default();
    if !custom.is_empty() {
        return custom.into_iter().map(Violation::Custom).collect();
    }

    let mut violations = Vec::new();

    match &field.input_type {
        t if t.is_custom_only() => {}
        // A radio is only ever reported through its group: skip when the
        // group is satisfied or nothing is required, else treat as checkbox.
        InputType::Radio if !field.required || field.group_checked => {}
        InputType::Radio | InputType::Checkbox => {
            if field.required && !field.checked {
                violations.push(Violation::Required);
            }
        }
        _ => check_value(field, patterns, &mut violations),
    }

    log::trace!(
        "[evaluate] field={} type={} violations={}",
        field.name,
        field.input_type,
        violations.len()
    );

    violations
}

fn check_value(field: &FieldSnapshot, patterns: &PatternTable, violations: &mut Vec<Violation>) {
    if field.value.is_empty() {
        if field.required {
            violations.push(Violation::Required);
        }
        return;
    }

    let kind = field.input_type.as_str();
    if let Some(regex) = patterns.builtin(kind) {
        if !regex.is_match(&field.value) {
            violations.push(Violation::TypeMismatch {
                kind: kind.to_string(),
                message: patterns
                    .message(kind)
                    .unwrap_or(ILLEGAL_FORMAT_MESSAGE)
                    .to_string(),
            });
        }
    }

    if field.input_type == InputType::Textarea {
        return;
    }

    let Some(pattern) = field.pattern.as_deref().filter(|p| !p.is_empty()) else {
        return;
    };

    match patterns.matches_custom(pattern, &field.value) {
        Ok(true) => {}
        Ok(false) => {
            let message = field
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(ILLEGAL_FORMAT_MESSAGE);
            violations.push(Violation::PatternMismatch {
                message: message.to_string(),
            });
        }
        Err(err) => {
            log::warn!("[evaluate] ignoring pattern on field '{}': {}", field.name, err);
        }
    }
}
