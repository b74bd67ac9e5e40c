//! Replays a scenario against the engine and reports the outcome.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use formdom::{Document, Event, Selector};
use serde::Serialize;
use validity::prelude::*;

use crate::scenario::{Scenario, Step};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub kind: &'static str,
    pub target: String,
    /// First error, for invalid notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Notification> for NotificationRecord {
    fn from(n: &Notification) -> Self {
        let message = match n {
            Notification::FieldValid { .. } => None,
            Notification::FieldInvalid { errors, .. } => errors.first().cloned(),
            Notification::FormInvalid {
                errors, messages, ..
            } => messages.first().cloned().or_else(|| {
                errors.first_error().map(|(name, e)| format!("{name}: {e}"))
            }),
        };
        Self {
            kind: match n.kind() {
                NotificationKind::Valid => "valid",
                NotificationKind::Invalid => "invalid",
            },
            target: n.target().to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormReport {
    pub form: String,
    pub valid: bool,
    pub errors: ValidationResult,
    /// Errors of the form itself, not tied to a field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipReport {
    pub field: String,
    pub message: String,
}

/// Final state after every step has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub forms: Vec<FormReport>,
    pub notifications: Vec<NotificationRecord>,
    pub tooltips: Vec<TooltipReport>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.forms.iter().all(|f| f.valid)
    }
}

pub fn run(scenario: Scenario, config: ValidityConfig) -> Result<Report> {
    let clock = ManualClock::new();
    let mut engine = FormValidity::new(config)
        .context("failed to build validation engine")?
        .with_clock(clock.clone());

    let mut doc = Document::new(scenario.root.build());
    let fields = engine.attach(&mut doc);
    log::info!("[cli] attached {} field(s)", fields);

    for (id, errors) in scenario.field_errors {
        engine.set_field_validity(&id, errors);
    }
    for (form, errors) in scenario.form_errors {
        engine.set_form_validity(&form, errors);
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [NotificationKind::Valid, NotificationKind::Invalid] {
        let seen = Rc::clone(&seen);
        engine.subscribe(kind, move |n, _| {
            seen.borrow_mut().push(NotificationRecord::from(n));
        });
    }

    for step in scenario.steps {
        log::debug!("[cli] step {:?}", step);
        match step {
            Step::Input { target, value } => {
                doc.set_value(&target, value);
                engine.handle_event(&mut doc, &Event::input(target));
            }
            Step::Click { target } => {
                doc.activate(&target);
                engine.handle_event(&mut doc, &Event::click(target));
            }
            Step::Submit { target } => {
                if engine.handle_event(&mut doc, &Event::submit(&target)) {
                    log::info!("[cli] submit of {} prevented", target);
                }
            }
            Step::Reset { target } => {
                engine.handle_event(&mut doc, &Event::reset(target));
            }
            Step::Dismiss { target } => {
                engine.dismiss_tooltip(&mut doc, &target);
            }
            Step::Wait { ms } => {
                clock.advance(Duration::from_millis(ms));
                engine.tick();
            }
        }
    }

    let mut forms = Vec::new();
    for form in doc.query_all_in_document(&Selector::tag("form")) {
        let errors = engine
            .form_validity(&doc, &form)
            .with_context(|| format!("failed to validate form '{form}'"))?;
        let messages = engine.form_messages(&form);
        forms.push(FormReport {
            valid: errors.is_valid() && messages.is_empty(),
            form,
            errors,
            messages,
        });
    }

    let tooltips = engine
        .visible_tooltips()
        .map(|t| TooltipReport {
            field: t.field_id().to_string(),
            message: t.message().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(Report {
        forms,
        notifications: seen.take(),
        tooltips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNUP: &str = r#"{
        "root": {
            "tag": "form",
            "id": "signup",
            "children": [
                { "tag": "input", "id": "email", "attrs": { "type": "email", "name": "email", "required": "" } },
                { "tag": "input", "id": "terms", "attrs": { "type": "checkbox", "name": "terms", "required": "" } },
                { "tag": "button", "id": "go", "attrs": { "name": "go" } }
            ]
        },
        "steps": [
            { "event": "input", "target": "email", "value": "bob@example.com" },
            { "event": "input", "target": "email", "value": "bob@" },
            { "event": "submit", "target": "signup" },
            { "event": "wait", "ms": 200 }
        ]
    }"#;

    fn run_json(json: &str) -> Report {
        run(Scenario::from_json(json).unwrap(), ValidityConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_scenario() {
        let report = run_json(SIGNUP);
        assert!(!report.is_valid());

        let form = &report.forms[0];
        assert_eq!(form.form, "signup");
        assert_eq!(form.errors.get("email").unwrap(), ["should be a valid email"]);
        assert_eq!(form.errors.get("terms").unwrap(), ["can't be empty"]);

        let targets: Vec<_> = report
            .notifications
            .iter()
            .map(|n| n.target.as_str())
            .collect();
        assert_eq!(targets, vec!["email", "email", "terms", "signup"]);
        assert_eq!(
            report.notifications[3].message.as_deref(),
            Some("email: should be a valid email")
        );

        // The resubmitted email tooltip is due at 200ms, terms not until 300ms.
        assert_eq!(
            report.tooltips,
            vec![TooltipReport {
                field: "email".into(),
                message: "should be a valid email".into()
            }]
        );
    }

    #[test]
    fn test_overrides_applied() {
        let report = run_json(
            r#"{
                "root": {
                    "tag": "form",
                    "id": "f",
                    "children": [
                        { "tag": "input", "id": "nick", "attrs": { "name": "nick" }, "value": "bob" },
                        { "tag": "button", "id": "go", "attrs": { "name": "go" } }
                    ]
                },
                "field_errors": { "nick": ["taken"] },
                "form_errors": { "f": { "go": ["later"] } }
            }"#,
        );

        let errors = &report.forms[0].errors;
        assert_eq!(errors.get("nick").unwrap(), ["taken"]);
        assert_eq!(errors.get("go").unwrap(), ["later"]);
        assert!(report.notifications.is_empty());
    }

    #[test]
    fn test_form_message_makes_form_invalid() {
        let report = run_json(
            r#"{
                "root": {
                    "tag": "form",
                    "id": "f",
                    "children": [
                        { "tag": "input", "id": "nick", "attrs": { "name": "nick" }, "value": "bob" }
                    ]
                },
                "form_errors": { "f": "server rejected the form" },
                "steps": [ { "event": "submit", "target": "f" } ]
            }"#,
        );

        assert!(!report.is_valid());
        assert!(report.forms[0].errors.is_valid());
        assert_eq!(report.forms[0].messages, vec!["server rejected the form"]);
        assert_eq!(
            report.notifications,
            vec![NotificationRecord {
                kind: "invalid",
                target: "f".into(),
                message: Some("server rejected the form".into()),
            }]
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = run_json(r#"{ "root": { "tag": "form", "id": "empty" } }"#);
        assert!(report.is_valid());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "forms": [ { "form": "empty", "valid": true, "errors": {} } ],
                "notifications": [],
                "tooltips": []
            })
        );
    }
}
