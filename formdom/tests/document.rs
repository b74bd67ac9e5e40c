use formdom::{Document, Element, Selector};

fn signup_form() -> Document {
    Document::new(
        Element::div().id("page").child(
            Element::form()
                .id("signup")
                .child(Element::input("email").id("email").name("email").required(true))
                .child(
                    Element::div()
                        .id("plan-group")
                        .child(Element::input("radio").id("plan-a").name("plan"))
                        .child(Element::input("radio").id("plan-b").name("plan").checked(true)),
                )
                .child(Element::input("checkbox").id("terms").name("terms"))
                .child(Element::textarea().id("bio").name("bio"))
                .child(Element::button().id("go").name("go")),
        ),
    )
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_query_all_document_order() {
    let doc = signup_form();
    let named = doc.query_all("signup", &Selector::attr("name"));
    assert_eq!(
        named,
        vec!["email", "plan-a", "plan-b", "terms", "bio", "go"]
    );
}

#[test]
fn test_query_all_excludes_scope() {
    let doc = signup_form();
    let forms = doc.query_all("signup", &Selector::tag("form"));
    assert!(forms.is_empty());

    let forms = doc.query_all_in_document(&Selector::tag("form"));
    assert_eq!(forms, vec!["signup"]);
}

#[test]
fn test_query_unknown_scope() {
    let doc = signup_form();
    assert!(doc.query_all("nope", &Selector::attr("name")).is_empty());
}

#[test]
fn test_ancestor_skips_self() {
    let doc = signup_form();
    let form = Selector::tag("form");
    assert_eq!(doc.ancestor("plan-a", &form), Some("signup".to_string()));
    assert_eq!(doc.ancestor("signup", &form), None);
    assert_eq!(doc.parent("plan-a"), Some("plan-group".to_string()));
}

#[test]
fn test_control_type() {
    let doc = signup_form();
    assert_eq!(doc.get("email").unwrap().control_type().as_deref(), Some("email"));
    assert_eq!(doc.get("bio").unwrap().control_type().as_deref(), Some("textarea"));
    assert_eq!(doc.get("go").unwrap().control_type(), None);

    let select = Element::select().attr("multiple", "");
    assert_eq!(select.control_type().as_deref(), Some("select-multiple"));
    assert_eq!(Element::select().control_type().as_deref(), Some("select-one"));
    assert_eq!(Element::new("input").control_type().as_deref(), Some("text"));
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn test_classes() {
    let mut doc = signup_form();
    assert!(doc.add_class("email", "invalid"));
    assert!(doc.add_class("email", "invalid"));
    assert_eq!(doc.get("email").unwrap().classes, vec!["invalid"]);
    assert!(doc.has_class("email", "invalid"));

    assert!(doc.remove_class("email", "invalid"));
    assert!(!doc.has_class("email", "invalid"));

    assert!(!doc.add_class("missing", "x"));
}

#[test]
fn test_attributes() {
    let mut doc = signup_form();
    assert!(doc.set_attr("signup", "novalidate", "novalidate"));
    assert_eq!(doc.attr("signup", "novalidate"), Some("novalidate"));
    assert!(doc.remove_attr("signup", "novalidate"));
    assert!(!doc.remove_attr("signup", "novalidate"));
}

#[test]
fn test_activate_radio_unchecks_group() {
    let mut doc = signup_form();
    assert!(doc.activate("plan-a"));
    assert!(doc.checked("plan-a"));
    assert!(!doc.checked("plan-b"));
}

#[test]
fn test_activate_checkbox_toggles() {
    let mut doc = signup_form();
    doc.activate("terms");
    assert!(doc.checked("terms"));
    doc.activate("terms");
    assert!(!doc.checked("terms"));
    assert!(!doc.activate("email"));
}

// ============================================================================
// Focus
// ============================================================================

#[test]
fn test_focus_moves_flag() {
    let mut doc = signup_form();
    assert!(doc.focus("email"));
    assert!(!doc.focus("email"));
    assert!(doc.get("email").unwrap().focused);

    assert!(doc.focus("bio"));
    assert!(!doc.get("email").unwrap().focused);
    assert_eq!(doc.focused(), Some("bio"));

    assert!(doc.blur());
    assert_eq!(doc.focused(), None);
    assert!(!doc.focus("missing"));
}
