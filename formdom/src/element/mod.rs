mod node;

pub use node::Element;

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in &root.children {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    for child in &mut root.children {
        if let Some(found) = find_element_mut(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find the ID of the direct parent of the element with the given ID.
pub fn find_parent_id(root: &Element, id: &str) -> Option<String> {
    for child in &root.children {
        if child.id == id {
            return Some(root.id.clone());
        }
        if let Some(found) = find_parent_id(child, id) {
            return Some(found);
        }
    }

    None
}

/// Walk the tree in document order (pre-order), calling `f` for every element.
pub fn walk<'a>(root: &'a Element, f: &mut impl FnMut(&'a Element)) {
    f(root);
    for child in &root.children {
        walk(child, f);
    }
}
