//! Engine configuration.

use std::path::Path;

use formdom::Selector;
use indexmap::IndexMap;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidityError};
use crate::pattern::PatternTable;

/// Controls validated by default: every named `input`, `select` and `textarea`.
pub const DEFAULT_CONTROLS: &str = "input[name], select[name], textarea[name]";

/// A caller-defined input type pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Expression matched against non-empty values. Not anchored automatically.
    pub pattern: String,
    /// Error reported on mismatch.
    pub message: String,
    #[serde(default)]
    pub case_insensitive: bool,
}

/// Configuration for a `FormValidity` engine.
///
/// Loaded from JSON or built in code:
///
/// ```ignore
/// let config = ValidityConfig::new()
///     .invalid_class("has-error")
///     .pattern("zip", r"^[0-9]{5}$", "should be a valid zip code");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// Class added to a field that became valid.
    pub valid_class: String,

    /// Class added to a field or form that became invalid.
    pub invalid_class: String,

    /// Selector for the elements that get validated.
    pub controls: String,

    /// Extra input types, added on top of (or replacing) the built-ins.
    pub patterns: IndexMap<String, PatternConfig>,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            valid_class: "valid".to_string(),
            invalid_class: "invalid".to_string(),
            controls: DEFAULT_CONTROLS.to_string(),
            patterns: IndexMap::new(),
        }
    }
}

impl ValidityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class used for valid fields.
    pub fn valid_class(mut self, class: impl Into<String>) -> Self {
        self.valid_class = class.into();
        self
    }

    /// Set the class used for invalid fields and forms.
    pub fn invalid_class(mut self, class: impl Into<String>) -> Self {
        self.invalid_class = class.into();
        self
    }

    /// Restrict or widen the set of validated elements.
    pub fn controls(mut self, selector: impl Into<String>) -> Self {
        self.controls = selector.into();
        self
    }

    /// Register a pattern for an input type.
    pub fn pattern(
        mut self,
        kind: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.patterns.insert(
            kind.into(),
            PatternConfig {
                pattern: pattern.into(),
                message: message.into(),
                case_insensitive: false,
            },
        );
        self
    }

    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse the control selector.
    pub fn build_controls(&self) -> Result<Selector> {
        Ok(self.controls.parse()?)
    }

    /// Build the pattern table: built-ins plus every configured pattern.
    pub fn build_patterns(&self) -> Result<PatternTable> {
        let mut table = PatternTable::with_builtins();
        for (kind, config) in &self.patterns {
            let regex = RegexBuilder::new(&config.pattern)
                .case_insensitive(config.case_insensitive)
                .build()
                .map_err(|source| ValidityError::InvalidPattern {
                    kind: kind.clone(),
                    source,
                })?;
            table.define_regex(kind.clone(), regex, config.message.clone());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidityConfig::default();
        assert_eq!(config.valid_class, "valid");
        assert_eq!(config.invalid_class, "invalid");
        assert!(config.patterns.is_empty());
        assert_eq!(config.controls, DEFAULT_CONTROLS);
    }

    #[test]
    fn test_default_controls() {
        use formdom::Element;
        let sel = ValidityConfig::default().build_controls().unwrap();
        assert!(sel.matches(&Element::input("text").name("a")));
        assert!(sel.matches(&Element::select().name("a")));
        assert!(!sel.matches(&Element::input("text")));
        assert!(!sel.matches(&Element::button().name("a")));
    }

    #[test]
    fn test_bad_controls() {
        let config = ValidityConfig::new().controls("input[name");
        assert!(matches!(
            config.build_controls(),
            Err(ValidityError::Selector(_))
        ));
    }

    #[test]
    fn test_pattern_kind_case() {
        let config = ValidityConfig::from_json(
            r#"{ "patterns": { "Zip": { "pattern": "^[0-9]{5}$", "message": "bad zip" } } }"#,
        )
        .unwrap();
        let table = config.build_patterns().unwrap();
        assert!(table.builtin("zip").unwrap().is_match("12345"));
        assert_eq!(table.message("zip"), Some("bad zip"));
    }

    #[test]
    fn test_from_json_partial() {
        let config = ValidityConfig::from_json(
            r#"{
                "invalid_class": "has-error",
                "patterns": {
                    "zip": { "pattern": "^[0-9]{5}$", "message": "should be a valid zip code" },
                    "code": { "pattern": "^[a-z]{3}$", "message": "bad code", "case_insensitive": true }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.valid_class, "valid");
        assert_eq!(config.invalid_class, "has-error");

        let table = config.build_patterns().unwrap();
        assert!(table.builtin("zip").unwrap().is_match("12345"));
        assert!(table.builtin("code").unwrap().is_match("ABC"));
        assert!(table.builtin("email").is_some());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            ValidityConfig::from_json("{ nope"),
            Err(ValidityError::Config(_))
        ));
    }

    #[test]
    fn test_bad_pattern() {
        let config = ValidityConfig::new().pattern("zip", "(", "x");
        match config.build_patterns() {
            Err(ValidityError::InvalidPattern { kind, .. }) => assert_eq!(kind, "zip"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ValidityConfig::from_path("/definitely/not/here.json"),
            Err(ValidityError::Io(_))
        ));
    }
}
