use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Markup
    pub attrs: IndexMap<String, String>,
    pub classes: Vec<String>,

    // Live properties (not reflected into attributes)
    pub value: String,
    pub checked: bool,

    // Geometry, used to place overlays next to the element
    pub height: u16,
    pub z_index: i16,

    // State (focused is owned by Document, not set by user)
    pub focused: bool,

    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with an arbitrary (lowercased) tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        Self {
            id: generate_id(&tag),
            tag,
            attrs: IndexMap::new(),
            classes: Vec::new(),
            value: String::new(),
            checked: false,
            height: 1,
            z_index: 0,
            focused: false,
            children: Vec::new(),
        }
    }

    pub fn form() -> Self {
        Self::new("form")
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn button() -> Self {
        Self::new("button")
    }

    /// Create an `<input>` with the given `type` attribute.
    pub fn input(input_type: impl Into<String>) -> Self {
        Self::new("input").attr("type", input_type)
    }

    pub fn textarea() -> Self {
        Self::new("textarea")
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.attr("name", name)
    }

    // Attributes
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn required(self, required: bool) -> Self {
        if required {
            self.attr("required", "required")
        } else {
            self
        }
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.attr("pattern", pattern)
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.attr("title", title)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    // Properties
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    // Geometry
    pub fn height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    pub fn z_index(mut self, z_index: i16) -> Self {
        self.z_index = z_index;
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    // Queries

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Returns true for the form controls that carry a value: input, select, textarea.
    pub fn is_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }

    /// The `type` property of a form control.
    ///
    /// Inputs report their (lowercased) `type` attribute, defaulting to `text`.
    /// Selects report `select-one` or `select-multiple`. Non-controls have no type.
    pub fn control_type(&self) -> Option<String> {
        match self.tag.as_str() {
            "input" => Some(
                self.get_attr("type")
                    .filter(|t| !t.is_empty())
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_else(|| "text".to_string()),
            ),
            "textarea" => Some("textarea".to_string()),
            "select" if self.has_attr("multiple") => Some("select-multiple".to_string()),
            "select" => Some("select-one".to_string()),
            _ => None,
        }
    }
}
