//! JSON description of a page and the interactions to replay on it.

use formdom::Element;
use indexmap::IndexMap;
use serde::Deserialize;
use validity::validator::FormOverride;

/// One element of the page, with its subtree.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDef {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub height: Option<u16>,
    #[serde(default)]
    pub z_index: i16,
    #[serde(default)]
    pub children: Vec<ElementDef>,
}

impl ElementDef {
    pub fn build(self) -> Element {
        let mut el = Element::new(self.tag);
        if let Some(id) = self.id {
            el = el.id(id);
        }
        for (name, value) in self.attrs {
            el = el.attr(name, value);
        }
        for class in self.classes {
            el = el.class(class);
        }
        if let Some(height) = self.height {
            el = el.height(height);
        }

        el.value(self.value)
            .checked(self.checked)
            .z_index(self.z_index)
            .children(self.children.into_iter().map(ElementDef::build))
    }
}

/// A user interaction, or the passage of time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase", deny_unknown_fields)]
pub enum Step {
    /// Replace a field's value, then fire `input`.
    Input { target: String, value: String },
    /// Activate a checkbox or radio, then fire `click`.
    Click { target: String },
    Submit { target: String },
    Reset { target: String },
    /// Dismiss a field's tooltip.
    Dismiss { target: String },
    /// Let time pass so pending tooltips can appear.
    Wait { ms: u64 },
}

/// Errors installed on a form: one message for the whole form, or messages
/// keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormErrorsDef {
    Message(String),
    Fields(IndexMap<String, Vec<String>>),
}

impl From<FormErrorsDef> for FormOverride {
    fn from(def: FormErrorsDef) -> Self {
        match def {
            FormErrorsDef::Message(message) => FormOverride::Single(message),
            FormErrorsDef::Fields(map) => FormOverride::Map(map),
        }
    }
}

/// A page, the custom errors to install on it, and what the user does.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub root: ElementDef,

    /// Custom validators keyed by field ID.
    #[serde(default)]
    pub field_errors: IndexMap<String, Vec<String>>,

    /// Error overrides keyed by form ID.
    #[serde(default)]
    pub form_errors: IndexMap<String, FormErrorsDef>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
