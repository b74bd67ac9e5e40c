use crate::element::{find_element, find_element_mut, find_parent_id, walk, Element};
use crate::selector::Selector;

/// An element tree plus the bits of live state a page keeps around it.
///
/// Elements are addressed by their string ID. Reads on unknown IDs return
/// `None`/`false`; writes on unknown IDs are no-ops that return `false`.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    focused: Option<String>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        let mut doc = Self {
            root,
            focused: None,
        };
        // Honour a focus flag set while building the tree.
        let mut initially_focused = None;
        walk(&doc.root, &mut |el| {
            if el.focused && initially_focused.is_none() {
                initially_focused = Some(el.id.clone());
            }
        });
        if let Some(id) = initially_focused {
            doc.focus(&id);
        }
        doc
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        find_element(&self.root, id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_element_mut(&mut self.root, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    // Attributes

    pub fn attr(&self, id: &str, name: &str) -> Option<&str> {
        self.get(id)?.get_attr(name)
    }

    pub fn set_attr(&mut self, id: &str, name: &str, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.attrs.insert(name.to_ascii_lowercase(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn remove_attr(&mut self, id: &str, name: &str) -> bool {
        self.get_mut(id)
            .map(|el| el.attrs.shift_remove(name).is_some())
            .unwrap_or(false)
    }

    // Properties

    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|el| el.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn checked(&self, id: &str) -> bool {
        self.get(id).map(|el| el.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Apply the default action of a click on a checkable control.
    ///
    /// Checkboxes toggle. Radios become checked and uncheck every other radio
    /// with the same name inside the same form (or the whole document when the
    /// radio has no form). Other elements are left untouched.
    pub fn activate(&mut self, id: &str) -> bool {
        let Some(el) = self.get(id) else {
            return false;
        };

        match el.control_type().as_deref() {
            Some("checkbox") => {
                let checked = el.checked;
                self.set_checked(id, !checked)
            }
            Some("radio") => {
                let name = el.get_attr("name").map(str::to_string);
                if let Some(name) = name {
                    let scope = self.ancestor(id, &Selector::tag("form"));
                    let group = Selector::tag("input").and_attr_eq("type", "radio");
                    let members = match &scope {
                        Some(form) => self.query_all(form, &group),
                        None => self.query_all_in_document(&group),
                    };
                    for member in members {
                        if member != id && self.attr(&member, "name") == Some(name.as_str()) {
                            self.set_checked(&member, false);
                        }
                    }
                }
                self.set_checked(id, true)
            }
            _ => false,
        }
    }

    // Classes

    pub fn add_class(&mut self, id: &str, class: &str) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                if !el.has_class(class) {
                    el.classes.push(class.to_string());
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_class(&mut self, id: &str, class: &str) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.classes.retain(|c| c != class);
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id).map(|el| el.has_class(class)).unwrap_or(false)
    }

    // Tree queries

    pub fn matches(&self, id: &str, selector: &Selector) -> bool {
        self.get(id).map(|el| selector.matches(el)).unwrap_or(false)
    }

    /// IDs of all descendants of `scope_id` matching `selector`, in document order.
    /// The scope element itself is never included.
    pub fn query_all(&self, scope_id: &str, selector: &Selector) -> Vec<String> {
        let Some(scope) = self.get(scope_id) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for child in &scope.children {
            walk(child, &mut |el| {
                if selector.matches(el) {
                    result.push(el.id.clone());
                }
            });
        }
        result
    }

    /// IDs of all elements in the document matching `selector`, root included.
    pub fn query_all_in_document(&self, selector: &Selector) -> Vec<String> {
        let mut result = Vec::new();
        walk(&self.root, &mut |el| {
            if selector.matches(el) {
                result.push(el.id.clone());
            }
        });
        result
    }

    pub fn parent(&self, id: &str) -> Option<String> {
        find_parent_id(&self.root, id)
    }

    /// Nearest ancestor of `id` (not `id` itself) matching `selector`.
    pub fn ancestor(&self, id: &str, selector: &Selector) -> Option<String> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if self.matches(&candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    // Focus

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Focus an element by ID.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        if self.focused.as_deref() == Some(id) || !self.contains(id) {
            return false;
        }

        if let Some(old) = self.focused.take() {
            if let Some(el) = self.get_mut(&old) {
                el.focused = false;
            }
        }
        if let Some(el) = self.get_mut(id) {
            el.focused = true;
        }
        log::debug!("[document] focus -> {}", id);
        self.focused = Some(id.to_string());
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        match self.focused.take() {
            Some(old) => {
                if let Some(el) = self.get_mut(&old) {
                    el.focused = false;
                }
                true
            }
            None => false,
        }
    }
}
