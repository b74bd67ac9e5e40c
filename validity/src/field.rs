//! Read-only views of fields and forms, captured from a document.

use formdom::{Document, Element, Selector};

/// The `type` of a form control, as far as validation cares.
///
/// Types with no special handling (`password`, `date`, ...) are kept as
/// `Other` so a caller-defined pattern can still be looked up by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Textarea,
    Checkbox,
    Radio,
    SelectOne,
    SelectMultiple,
    Submit,
    Button,
    Image,
    Email,
    Url,
    Tel,
    Number,
    Other(String),
}

impl InputType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "textarea" => Self::Textarea,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select-one" => Self::SelectOne,
            "select-multiple" => Self::SelectMultiple,
            "submit" => Self::Submit,
            "button" => Self::Button,
            "image" => Self::Image,
            "email" => Self::Email,
            "url" => Self::Url,
            "tel" => Self::Tel,
            "number" => Self::Number,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::SelectOne => "select-one",
            Self::SelectMultiple => "select-multiple",
            Self::Submit => "submit",
            Self::Button => "button",
            Self::Image => "image",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Other(other) => other,
        }
    }

    /// Types validated only through a custom validator.
    pub fn is_custom_only(&self) -> bool {
        matches!(
            self,
            Self::Image | Self::Submit | Self::Button | Self::SelectOne | Self::SelectMultiple
        )
    }

    /// Types that validate on click rather than on input.
    pub fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

impl From<&str> for InputType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the evaluator needs to know about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub id: String,
    pub name: String,
    pub input_type: InputType,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub pattern: Option<String>,
    pub title: Option<String>,
    /// For radios: whether any same-named element in the form is checked.
    pub group_checked: bool,
}

impl FieldSnapshot {
    /// A blank snapshot of the given type, for building fields by hand.
    pub fn new(input_type: impl Into<InputType>) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            input_type: input_type.into(),
            value: String::new(),
            checked: false,
            required: false,
            pattern: None,
            title: None,
            group_checked: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn group_checked(mut self, group_checked: bool) -> Self {
        self.group_checked = group_checked;
        self
    }

    /// Capture a form control from the document.
    ///
    /// Returns `None` for unknown IDs and for elements that are not
    /// `input`, `select` or `textarea`.
    pub fn capture(doc: &Document, id: &str) -> Option<Self> {
        let el = doc.get(id)?;
        let input_type = InputType::parse(&el.control_type()?);
        let name = el.get_attr("name").unwrap_or_default().to_string();

        let group_checked = if input_type == InputType::Radio {
            radio_group_checked(doc, el, &name)
        } else {
            false
        };

        Some(Self {
            id: el.id.clone(),
            name,
            input_type,
            value: el.value.clone(),
            checked: el.checked,
            required: el.has_attr("required"),
            pattern: el.get_attr("pattern").map(str::to_string),
            title: el.get_attr("title").map(str::to_string),
            group_checked,
        })
    }
}

/// Whether any named element sharing `name` in the radio's form is checked.
/// A radio outside any form is its own group.
fn radio_group_checked(doc: &Document, radio: &Element, name: &str) -> bool {
    match doc.ancestor(&radio.id, &Selector::tag("form")) {
        Some(form) => doc
            .query_all(&form, &Selector::attr_eq("name", name))
            .iter()
            .any(|id| doc.checked(id)),
        None => radio.checked,
    }
}

/// One named element inside a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub id: String,
    pub name: String,
    /// `None` for named elements that are not form controls.
    pub field: Option<FieldSnapshot>,
}

/// All named elements of a form, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub id: String,
    pub entries: Vec<FormEntry>,
}

impl FormSnapshot {
    /// Capture a form from the document. Returns `None` if the ID is unknown
    /// or the element is not a `<form>`.
    pub fn capture(doc: &Document, form_id: &str) -> Option<Self> {
        if !doc.matches(form_id, &Selector::tag("form")) {
            return None;
        }

        let entries = doc
            .query_all(form_id, &Selector::attr("name"))
            .into_iter()
            .map(|id| FormEntry {
                name: doc.attr(&id, "name").unwrap_or_default().to_string(),
                field: FieldSnapshot::capture(doc, &id),
                id,
            })
            .collect();

        Some(Self {
            id: form_id.to_string(),
            entries,
        })
    }

    /// The snapshot of the first control with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldSnapshot> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .find_map(|e| e.field.as_ref())
    }

    /// Snapshots of every control in the form.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSnapshot> {
        self.entries.iter().filter_map(|e| e.field.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(
            Element::div()
                .id("page")
                .child(
                    Element::form()
                        .id("f")
                        .child(
                            Element::input("email")
                                .id("email")
                                .name("email")
                                .required(true)
                                .pattern(".+@corp\\.com")
                                .title("corporate address")
                                .value("a@b.com"),
                        )
                        .child(Element::input("radio").id("r1").name("size"))
                        .child(Element::input("radio").id("r2").name("size").checked(true))
                        .child(Element::button().id("b").name("go")),
                )
                .child(Element::input("radio").id("loose").name("size")),
        )
    }

    #[test]
    fn test_input_type_round_trip_names() {
        for name in ["text", "textarea", "checkbox", "select-multiple", "tel", "password"] {
            assert_eq!(InputType::parse(name).as_str(), name);
        }
        assert_eq!(InputType::parse("EMAIL"), InputType::Email);
        assert_eq!(InputType::parse(""), InputType::Text);
    }

    #[test]
    fn test_capture_field() {
        let doc = doc();
        let field = FieldSnapshot::capture(&doc, "email").unwrap();
        assert_eq!(field.name, "email");
        assert_eq!(field.input_type, InputType::Email);
        assert!(field.required);
        assert_eq!(field.pattern.as_deref(), Some(".+@corp\\.com"));
        assert_eq!(field.title.as_deref(), Some("corporate address"));
        assert_eq!(field.value, "a@b.com");
    }

    #[test]
    fn test_capture_non_control() {
        let doc = doc();
        assert!(FieldSnapshot::capture(&doc, "b").is_none());
        assert!(FieldSnapshot::capture(&doc, "missing").is_none());
    }

    #[test]
    fn test_radio_group_checked_within_form() {
        let doc = doc();
        assert!(FieldSnapshot::capture(&doc, "r1").unwrap().group_checked);
        // Outside the form, the checked sibling does not count.
        assert!(!FieldSnapshot::capture(&doc, "loose").unwrap().group_checked);
    }

    #[test]
    fn test_capture_form() {
        let doc = doc();
        let form = FormSnapshot::capture(&doc, "f").unwrap();
        let names: Vec<_> = form.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["email", "size", "size", "go"]);
        assert_eq!(form.fields().count(), 3);
        assert_eq!(form.field("size").unwrap().id, "r1");
        assert!(FormSnapshot::capture(&doc, "email").is_none());
    }
}
