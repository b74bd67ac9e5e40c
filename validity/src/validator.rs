//! Custom validators for fields and error overrides for forms.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::aggregate::ValidationResult;
use crate::field::{FieldSnapshot, FormSnapshot};

/// Type alias for a computed field validator.
pub type FieldFn = Rc<dyn Fn(&FieldSnapshot) -> Vec<String>>;

/// Type alias for a computed form override.
pub type FormFn = Rc<dyn Fn(&FormSnapshot) -> IndexMap<String, Vec<String>>>;

/// A custom validator installed on a field.
///
/// Whatever it resolves to replaces the built-in checks when non-empty.
#[derive(Clone)]
pub enum Validator {
    /// A fixed list of errors.
    Fixed(Vec<String>),
    /// A single error.
    Single(String),
    /// Errors computed from the field each time it is validated.
    Computed(FieldFn),
}

impl Validator {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldSnapshot) -> Vec<String> + 'static,
    {
        Self::Computed(Rc::new(f))
    }

    /// Resolve to a list of errors. Empty messages are dropped.
    pub fn resolve(&self, field: &FieldSnapshot) -> Vec<String> {
        let errors = match self {
            Validator::Fixed(errors) => errors.clone(),
            Validator::Single(error) => vec![error.clone()],
            Validator::Computed(f) => f(field),
        };
        without_blanks(errors)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Fixed(errors) => f.debug_tuple("Fixed").field(errors).finish(),
            Validator::Single(error) => f.debug_tuple("Single").field(error).finish(),
            Validator::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Validator {
    fn from(error: &str) -> Self {
        Validator::Single(error.to_string())
    }
}

impl From<String> for Validator {
    fn from(error: String) -> Self {
        Validator::Single(error)
    }
}

impl From<Vec<String>> for Validator {
    fn from(errors: Vec<String>) -> Self {
        Validator::Fixed(errors)
    }
}

impl From<Vec<&str>> for Validator {
    fn from(errors: Vec<&str>) -> Self {
        Validator::Fixed(errors.into_iter().map(str::to_string).collect())
    }
}

/// Errors installed on a form, keyed by field name.
///
/// A `Single` string has no field to attach to: it overrides no field but
/// still marks the form itself invalid (see [`FormOverride::form_messages`]).
#[derive(Clone)]
pub enum FormOverride {
    Single(String),
    Map(IndexMap<String, Vec<String>>),
    Computed(FormFn),
}

impl FormOverride {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FormSnapshot) -> IndexMap<String, Vec<String>> + 'static,
    {
        Self::Computed(Rc::new(f))
    }

    /// Resolve to per-field errors, or `None` when the shape carries no
    /// per-field information. Empty messages are dropped.
    pub fn resolve(&self, form: &FormSnapshot) -> Option<IndexMap<String, Vec<String>>> {
        let map = match self {
            FormOverride::Single(error) => {
                log::trace!("[validator] form override '{}' names no field, ignored", error);
                return None;
            }
            FormOverride::Map(map) => map.clone(),
            FormOverride::Computed(f) => f(form),
        };

        Some(
            map.into_iter()
                .map(|(name, errors)| (name, without_blanks(errors)))
                .collect(),
        )
    }

    /// Errors that belong to the form as a whole rather than to a field.
    pub fn form_messages(&self) -> Vec<String> {
        match self {
            FormOverride::Single(error) => without_blanks(vec![error.clone()]),
            FormOverride::Map(_) | FormOverride::Computed(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for FormOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormOverride::Single(error) => f.debug_tuple("Single").field(error).finish(),
            FormOverride::Map(map) => f.debug_tuple("Map").field(map).finish(),
            FormOverride::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for FormOverride {
    fn from(error: &str) -> Self {
        FormOverride::Single(error.to_string())
    }
}

impl From<IndexMap<String, Vec<String>>> for FormOverride {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        FormOverride::Map(map)
    }
}

impl From<ValidationResult> for FormOverride {
    fn from(result: ValidationResult) -> Self {
        FormOverride::Map(result.into_map())
    }
}

fn without_blanks(errors: Vec<String>) -> Vec<String> {
    errors.into_iter().filter(|e| !e.is_empty()).collect()
}
