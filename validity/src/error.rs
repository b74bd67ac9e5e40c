//! Error types for the validation engine.
//!
//! Failed user input is never an error here: it is reported as error lists
//! and notifications. These variants cover misuse and broken configuration.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ValidityError>;

/// Errors that can occur while configuring or driving the engine
#[derive(Debug, Error)]
pub enum ValidityError {
    /// A pattern supplied at initialization does not compile
    #[error("invalid pattern for '{kind}': {source}")]
    InvalidPattern { kind: String, source: regex::Error },

    /// A `pattern` attribute does not compile, or hit the backtracking limit
    #[error("invalid pattern attribute '{pattern}': {source}")]
    InvalidCustomPattern {
        pattern: String,
        source: Box<fancy_regex::Error>,
    },

    /// The configured control selector does not parse
    #[error(transparent)]
    Selector(#[from] formdom::SelectorError),

    /// No element with this ID exists in the document
    #[error("element not found: {id}")]
    UnknownElement { id: String },

    /// The element exists but is not a `<form>`
    #[error("element '{id}' is not a form")]
    NotAForm { id: String },

    /// The element exists but is not a validatable control
    #[error("element '{id}' is not a form control")]
    NotAField { id: String },

    /// Config file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidityError::NotAForm {
            id: "signup".into(),
        };
        assert_eq!(err.to_string(), "element 'signup' is not a form");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = ValidityError::InvalidPattern {
            kind: "zip".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern for 'zip':"));
    }

    #[test]
    fn test_invalid_custom_pattern_display() {
        let source = fancy_regex::Regex::new("(").unwrap_err();
        let err = ValidityError::InvalidCustomPattern {
            pattern: "(".into(),
            source: Box::new(source),
        };
        assert!(err.to_string().starts_with("invalid pattern attribute '(':"));
    }
}
