//! Input-type patterns and the cache of compiled `pattern` attributes.
//!
//! Input types use `regex`. `pattern` attributes are written for browsers,
//! which allow lookaround, so they compile with `fancy_regex` instead.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use fancy_regex::Regex as CustomRegex;
use regex::Regex;

use crate::error::{Result, ValidityError};

/// Built-in kinds: (type, expression, mismatch message).
const BUILTIN_SOURCES: [(&str, &str, &str); 4] = [
    (
        "email",
        r"(?i)^([a-z0-9_.+-]+)@([0-9a-z.-]+)\.([a-z.]{2,6})$",
        "should be a valid email",
    ),
    (
        "url",
        r"(?i)^(https?://)?[0-9a-z.-]+\.[a-z.]{2,6}[#&+_?/0-9a-z .=-]*$",
        "should be a valid URL",
    ),
    (
        "tel",
        r"^((\+[0-9]{1,3}(-| )?\(?[0-9]\)?(-| )?[0-9]{1,5})|(\(?[0-9]{2,6}\)?))(-| )?([0-9]{3,4})(-| )?([0-9]{4})(( x| ext)[0-9]{1,5}){0,1}$",
        "should be a valid phone number",
    ),
    (
        "number",
        r"^-?[0-9]*(\.[0-9]+)?$",
        "should be a numeric value",
    ),
];

static BUILTINS: LazyLock<Vec<(&'static str, Regex, &'static str)>> = LazyLock::new(|| {
    BUILTIN_SOURCES
        .iter()
        .map(|(kind, source, message)| {
            let regex = Regex::new(source).expect("built-in pattern must compile");
            (*kind, regex, *message)
        })
        .collect()
});

/// Wrap a `pattern` attribute so it must match the whole value.
pub fn anchor(source: &str) -> String {
    format!("^(?:{source})$")
}

/// Rewrite `\d`, `\w` and their negations to ASCII classes, which is what
/// they mean in a `pattern` attribute. Inside a bracket class only `\d` and
/// `\w` are rewritten.
pub fn ascii_classes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push(c);
                    break;
                };
                let ascii = match (next, in_class) {
                    ('d', false) => Some("[0-9]"),
                    ('D', false) => Some("[^0-9]"),
                    ('w', false) => Some("[0-9A-Za-z_]"),
                    ('W', false) => Some("[^0-9A-Za-z_]"),
                    ('d', true) => Some("0-9"),
                    ('w', true) => Some("0-9A-Za-z_"),
                    _ => None,
                };
                match ascii {
                    Some(class) => out.push_str(class),
                    None => {
                        out.push(c);
                        out.push(next);
                    }
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

/// A compiled input-type pattern or `pattern` attribute.
#[derive(Debug, Clone)]
pub enum Compiled {
    Kind(Regex),
    Custom(CustomRegex),
}

impl Compiled {
    pub fn is_match(&self, value: &str) -> Result<bool> {
        match self {
            Compiled::Kind(regex) => Ok(regex.is_match(value)),
            Compiled::Custom(regex) => regex
                .is_match(value)
                .map_err(|err| custom_error(regex.as_str(), err)),
        }
    }
}

/// Mapping from input type to its pattern and mismatch message, plus a cache
/// of compiled custom `pattern` attributes keyed by their anchored source.
///
/// Kinds are stored lowercased, matching how input types are read.
/// The cache never evicts; it is bounded by the number of distinct patterns
/// a page declares.
#[derive(Debug, Clone)]
pub struct PatternTable {
    kinds: HashMap<String, Regex>,
    messages: HashMap<String, String>,
    custom: RefCell<HashMap<String, CustomRegex>>,
}

impl PatternTable {
    /// A table with no built-in kinds at all.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
            messages: HashMap::new(),
            custom: RefCell::new(HashMap::new()),
        }
    }

    /// A table with the `email`, `url`, `tel` and `number` kinds.
    pub fn with_builtins() -> Self {
        let mut table = Self::empty();
        for (kind, regex, message) in BUILTINS.iter() {
            table.define_regex(*kind, regex.clone(), *message);
        }
        table
    }

    /// Add or replace a kind from an expression source.
    ///
    /// The expression is used as given; include `^...$` to match whole values.
    pub fn define(
        &mut self,
        kind: impl Into<String>,
        expr: &str,
        message: impl Into<String>,
    ) -> Result<()> {
        let kind = kind.into();
        let regex = Regex::new(expr).map_err(|source| ValidityError::InvalidPattern {
            kind: kind.clone(),
            source,
        })?;
        self.define_regex(kind, regex, message);
        Ok(())
    }

    /// Add or replace a kind from an already compiled expression.
    pub fn define_regex(
        &mut self,
        kind: impl Into<String>,
        regex: Regex,
        message: impl Into<String>,
    ) {
        let kind = kind.into().to_ascii_lowercase();
        self.messages.insert(kind.clone(), message.into());
        self.kinds.insert(kind, regex);
    }

    /// Replace the mismatch message of a kind (e.g. with a translated one).
    pub fn set_message(&mut self, kind: impl Into<String>, message: impl Into<String>) {
        self.messages
            .insert(kind.into().to_ascii_lowercase(), message.into());
    }

    /// The pattern registered for an input type, if any.
    pub fn builtin(&self, kind: &str) -> Option<&Regex> {
        self.kinds.get(kind.to_ascii_lowercase().as_str())
    }

    /// The mismatch message registered for an input type, if any.
    pub fn message(&self, kind: &str) -> Option<&str> {
        self.messages
            .get(kind.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    /// Compile (or fetch from cache) an anchored custom pattern.
    pub fn resolve_custom(&self, source: &str) -> Result<CustomRegex> {
        let anchored = anchor(&ascii_classes(source));

        if let Some(regex) = self.custom.borrow().get(&anchored) {
            return Ok(regex.clone());
        }

        let regex = CustomRegex::new(&anchored).map_err(|err| custom_error(source, err))?;
        log::trace!("[pattern] compiled {}", anchored);
        self.custom.borrow_mut().insert(anchored, regex.clone());
        Ok(regex)
    }

    /// Resolve either a registered kind or a literal pattern.
    pub fn resolve(&self, kind_or_pattern: &str) -> Result<Compiled> {
        match self.builtin(kind_or_pattern) {
            Some(regex) => Ok(Compiled::Kind(regex.clone())),
            None => self.resolve_custom(kind_or_pattern).map(Compiled::Custom),
        }
    }

    /// Test a value against a custom pattern, compiling it on first use.
    pub fn matches_custom(&self, source: &str, value: &str) -> Result<bool> {
        self.resolve_custom(source)?
            .is_match(value)
            .map_err(|err| custom_error(source, err))
    }

    /// Number of custom patterns compiled so far.
    pub fn cached_patterns(&self) -> usize {
        self.custom.borrow().len()
    }
}

fn custom_error(pattern: &str, err: fancy_regex::Error) -> ValidityError {
    ValidityError::InvalidCustomPattern {
        pattern: pattern.to_string(),
        source: Box::new(err),
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}
