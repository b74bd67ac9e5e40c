//! Form-level aggregation of field errors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::evaluate::evaluate;
use crate::field::FormSnapshot;
use crate::pattern::PatternTable;
use crate::validator::{FormOverride, Validator};

/// Errors of a whole form, keyed by field name in document order.
///
/// Fields without errors are absent; a present key always has at least one
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no field has errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if any field has errors.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Set the errors of a field. An empty list removes the field instead.
    pub fn set(&mut self, name: impl Into<String>, errors: Vec<String>) {
        let name = name.into();
        if errors.is_empty() {
            self.errors.shift_remove(&name);
        } else {
            self.errors.insert(name, errors);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.errors.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(name, errors)| (name.as_str(), errors.as_slice()))
    }

    /// The first message of the first invalid field.
    pub fn first_error(&self) -> Option<(&str, &str)> {
        self.errors
            .iter()
            .next()
            .and_then(|(name, errors)| errors.first().map(|e| (name.as_str(), e.as_str())))
    }

    pub fn into_map(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }
}

/// Compute the errors of every named element of a form.
///
/// For each entry in document order, a non-empty override for its name wins;
/// otherwise controls are evaluated and non-controls contribute nothing.
/// Later entries sharing a name replace earlier ones.
pub fn compute_errors<'v, F>(
    form: &FormSnapshot,
    overrides: Option<&FormOverride>,
    patterns: &PatternTable,
    validator_for: F,
) -> ValidationResult
where
    F: Fn(&str) -> Option<&'v Validator>,
{
    let overrides = overrides.and_then(|o| o.resolve(form)).unwrap_or_default();
    let mut result = ValidationResult::new();

    for entry in &form.entries {
        let errors = match overrides.get(&entry.name).filter(|e| !e.is_empty()) {
            Some(errors) => errors.clone(),
            None => entry
                .field
                .as_ref()
                .map(|field| evaluate(field, validator_for(&entry.id), patterns))
                .unwrap_or_default(),
        };
        result.set(entry.name.clone(), errors);
    }

    log::debug!(
        "[aggregate] form={} invalid_fields={}",
        form.id,
        result.len()
    );

    result
}
