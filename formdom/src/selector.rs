//! Minimal CSS-style selectors.
//!
//! Supports exactly what form handling needs: a tag name, attribute presence
//! (`[name]`), attribute equality (`[name=email]`, value optionally quoted),
//! compounds of those (`input[type=radio][name]`) and comma-separated
//! alternatives (`input,select,textarea`).

use std::fmt;
use std::str::FromStr;

use crate::element::Element;

/// Error returned when a selector string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    /// The full selector source.
    pub selector: String,
    /// What went wrong.
    pub reason: &'static str,
}

impl SelectorError {
    fn new(selector: &str, reason: &'static str) -> Self {
        Self {
            selector: selector.to_string(),
            reason,
        }
    }
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector '{}': {}", self.selector, self.reason)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Present(String),
    Equals(String, String),
}

impl AttrTest {
    fn matches(&self, element: &Element) -> bool {
        match self {
            AttrTest::Present(name) => element.has_attr(name),
            AttrTest::Equals(name, value) => element.get_attr(name) == Some(value.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if &element.tag != tag {
                return false;
            }
        }
        self.attrs.iter().all(|test| test.matches(element))
    }
}

/// A parsed selector: one or more alternatives, any of which may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Match elements by tag name.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: Some(tag.into().to_ascii_lowercase()),
                attrs: Vec::new(),
            }],
        }
    }

    /// Match elements carrying the attribute, whatever its value.
    pub fn attr(name: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: None,
                attrs: vec![AttrTest::Present(name.into().to_ascii_lowercase())],
            }],
        }
    }

    /// Match elements whose attribute equals `value` exactly.
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: None,
                attrs: vec![AttrTest::Equals(
                    name.into().to_ascii_lowercase(),
                    value.into(),
                )],
            }],
        }
    }

    /// Narrow every alternative with an attribute presence test.
    pub fn and_attr(mut self, name: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        for compound in &mut self.alternatives {
            compound.attrs.push(AttrTest::Present(name.clone()));
        }
        self
    }

    /// Narrow every alternative with an attribute equality test.
    pub fn and_attr_eq(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        for compound in &mut self.alternatives {
            compound
                .attrs
                .push(AttrTest::Equals(name.clone(), value.clone()));
        }
        self
    }

    /// Combine two selectors as alternatives (`a, b`).
    pub fn or(mut self, other: Selector) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let alternatives = source
            .split(',')
            .map(|part| parse_compound(part.trim(), source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }
}

fn parse_compound(part: &str, source: &str) -> Result<Compound, SelectorError> {
    if part.is_empty() {
        return Err(SelectorError::new(source, "empty selector"));
    }

    let (tag_part, mut rest) = match part.find('[') {
        Some(i) => (&part[..i], &part[i..]),
        None => (part, ""),
    };

    let tag = match tag_part {
        "" | "*" => None,
        t if t.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') => {
            Some(t.to_ascii_lowercase())
        }
        _ => return Err(SelectorError::new(source, "invalid tag name")),
    };

    let mut attrs = Vec::new();
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(SelectorError::new(source, "unexpected text after attribute"));
        }
        let end = rest
            .find(']')
            .ok_or_else(|| SelectorError::new(source, "unclosed attribute selector"))?;
        attrs.push(parse_attr(&rest[1..end], source)?);
        rest = &rest[end + 1..];
    }

    Ok(Compound { tag, attrs })
}

fn parse_attr(inner: &str, source: &str) -> Result<AttrTest, SelectorError> {
    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (inner.trim(), None),
    };

    if name.is_empty() {
        return Err(SelectorError::new(source, "missing attribute name"));
    }
    let name = name.to_ascii_lowercase();

    Ok(match value {
        None => AttrTest::Present(name),
        Some(value) => AttrTest::Equals(name, unquote(value).to_string()),
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        let sel: Selector = "form".parse().unwrap();
        assert!(sel.matches(&Element::form()));
        assert!(!sel.matches(&Element::div()));
    }

    #[test]
    fn test_parse_alternatives() {
        let sel: Selector = "input, select,textarea".parse().unwrap();
        assert!(sel.matches(&Element::input("text")));
        assert!(sel.matches(&Element::select()));
        assert!(sel.matches(&Element::textarea()));
        assert!(!sel.matches(&Element::button()));
    }

    #[test]
    fn test_parse_attr_value_quoted() {
        let sel: Selector = "input[name='email'][required]".parse().unwrap();
        let el = Element::input("email").name("email").required(true);
        assert!(sel.matches(&el));
        assert!(!sel.matches(&Element::input("email").name("email")));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "input[name".parse::<Selector>().unwrap_err().reason,
            "unclosed attribute selector"
        );
        assert_eq!(
            "input,".parse::<Selector>().unwrap_err().reason,
            "empty selector"
        );
        assert_eq!("[=x]".parse::<Selector>().unwrap_err().reason, "missing attribute name");
        assert_eq!("a.b".parse::<Selector>().unwrap_err().reason, "invalid tag name");
    }
}
