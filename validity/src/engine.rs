//! Binds validation to a document.
//!
//! `FormValidity` keeps per-element state in a side table keyed by element ID
//! (custom validator, last visual state, tooltip) instead of storing it on the
//! elements themselves. The document is passed in on every call.

use std::fmt;

use formdom::{Document, Event, Selector};
use indexmap::IndexMap;

use crate::aggregate::{ValidationResult, compute_errors};
use crate::clock::{Clock, SystemClock};
use crate::config::ValidityConfig;
use crate::error::{Result, ValidityError};
use crate::evaluate::evaluate;
use crate::events::{Cancel, EventBus, Notification, NotificationKind, SubscriptionId};
use crate::field::{FieldSnapshot, FormSnapshot, InputType};
use crate::pattern::PatternTable;
use crate::scheduler::TooltipScheduler;
use crate::tooltip::{Placement, Tooltip};
use crate::transition::{self, Transition, VisualState};
use crate::validator::{FormOverride, Validator};

#[derive(Debug, Default)]
struct FieldState {
    validator: Option<Validator>,
    visual: VisualState,
    tooltip: Option<Tooltip>,
}

#[derive(Debug, Default)]
struct FormState {
    overrides: Option<FormOverride>,
}

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No field has errors; the submission may proceed.
    Submitted,
    /// At least one field has errors, or the form carries errors of its own;
    /// the default action is suppressed.
    Prevented(ValidationResult),
}

impl SubmitOutcome {
    pub fn is_prevented(&self) -> bool {
        matches!(self, SubmitOutcome::Prevented(_))
    }
}

/// Parse a `maxlength` attribute the lenient way browsers read it.
fn parse_maxlength(raw: &str) -> Option<usize> {
    let max: f64 = raw.trim().parse().ok()?;
    (max.is_finite() && max > 0.0).then_some(max as usize)
}

/// Inline validation engine for the forms of a document.
pub struct FormValidity {
    config: ValidityConfig,
    patterns: PatternTable,
    controls: Selector,
    scheduler: TooltipScheduler,
    clock: Box<dyn Clock>,
    fields: IndexMap<String, FieldState>,
    forms: IndexMap<String, FormState>,
    bus: EventBus,
}

impl FormValidity {
    /// Create an engine. Fails if a configured pattern or the control
    /// selector does not parse.
    pub fn new(config: ValidityConfig) -> Result<Self> {
        let patterns = config.build_patterns()?;
        let controls = config.build_controls()?;
        Ok(Self {
            config,
            patterns,
            controls,
            scheduler: TooltipScheduler::new(),
            clock: Box::new(SystemClock),
            fields: IndexMap::new(),
            forms: IndexMap::new(),
            bus: EventBus::new(),
        })
    }

    /// Replace the clock used to schedule tooltips.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ValidityConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut PatternTable {
        &mut self.patterns
    }

    pub fn scheduler(&self) -> &TooltipScheduler {
        &self.scheduler
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Attach to every form and every named control in the document.
    ///
    /// Forms get `novalidate` so only this engine validates them. Each field
    /// starts neutral with a hidden tooltip. Returns the number of fields.
    /// Calling it again picks up newly added elements and keeps existing state.
    pub fn attach(&mut self, doc: &mut Document) -> usize {
        for form in doc.query_all_in_document(&Selector::tag("form")) {
            doc.set_attr(&form, "novalidate", "novalidate");
            self.forms.entry(form).or_default();
        }

        let ids = doc.query_all_in_document(&self.controls);
        for id in &ids {
            let placement = doc.get(id).map(Placement::below).unwrap_or_default();
            let state = self.fields.entry(id.clone()).or_default();
            state
                .tooltip
                .get_or_insert_with(|| Tooltip::new(id))
                .place(placement);
        }

        log::debug!(
            "[engine] attached forms={} fields={}",
            self.forms.len(),
            ids.len()
        );
        ids.len()
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    /// Last recorded visual state of a field (neutral if never seen).
    pub fn visual_state(&self, id: &str) -> VisualState {
        self.fields.get(id).map(|s| s.visual).unwrap_or_default()
    }

    pub fn tooltip(&self, id: &str) -> Option<&Tooltip> {
        self.fields.get(id)?.tooltip.as_ref()
    }

    /// Tooltips currently on screen, in attachment order.
    pub fn visible_tooltips(&self) -> impl Iterator<Item = &Tooltip> {
        self.fields
            .values()
            .filter_map(|s| s.tooltip.as_ref())
            .filter(|t| t.is_visible())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscribe<F>(&mut self, kind: NotificationKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Notification, &mut Cancel) + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // =========================================================================
    // Field validity
    // =========================================================================

    /// Compute the current errors of a field.
    pub fn field_validity(&self, doc: &Document, id: &str) -> Result<Vec<String>> {
        let field = self.capture_field(doc, id)?;
        Ok(evaluate(&field, self.validator(id), &self.patterns))
    }

    /// Install a custom validator on a field, replacing any previous one.
    pub fn set_field_validity(&mut self, id: &str, validator: impl Into<Validator>) {
        self.fields.entry(id.to_string()).or_default().validator = Some(validator.into());
    }

    /// Remove a field's custom validator, returning it.
    pub fn clear_field_validity(&mut self, id: &str) -> Option<Validator> {
        self.fields.get_mut(id)?.validator.take()
    }

    fn capture_field(&self, doc: &Document, id: &str) -> Result<FieldSnapshot> {
        if !doc.contains(id) {
            return Err(ValidityError::UnknownElement { id: id.to_string() });
        }
        FieldSnapshot::capture(doc, id).ok_or_else(|| ValidityError::NotAField { id: id.to_string() })
    }

    fn validator(&self, id: &str) -> Option<&Validator> {
        self.fields.get(id)?.validator.as_ref()
    }

    // =========================================================================
    // Form validity
    // =========================================================================

    /// Compute the errors of every named element in a form.
    pub fn form_validity(&self, doc: &Document, form_id: &str) -> Result<ValidationResult> {
        let form = self.capture_form(doc, form_id)?;
        let overrides = self.forms.get(form_id).and_then(|f| f.overrides.as_ref());
        Ok(compute_errors(&form, overrides, &self.patterns, |id| {
            self.validator(id)
        }))
    }

    /// Install errors on a form, replacing any previous override.
    pub fn set_form_validity(&mut self, form_id: &str, overrides: impl Into<FormOverride>) {
        self.forms.entry(form_id.to_string()).or_default().overrides = Some(overrides.into());
    }

    /// Form-level errors installed with a single-message override.
    pub fn form_messages(&self, form_id: &str) -> Vec<String> {
        self.forms
            .get(form_id)
            .and_then(|f| f.overrides.as_ref())
            .map(FormOverride::form_messages)
            .unwrap_or_default()
    }

    /// Remove a form's override, returning it.
    pub fn clear_form_validity(&mut self, form_id: &str) -> Option<FormOverride> {
        self.forms.get_mut(form_id)?.overrides.take()
    }

    fn capture_form(&self, doc: &Document, form_id: &str) -> Result<FormSnapshot> {
        if !doc.contains(form_id) {
            return Err(ValidityError::UnknownElement {
                id: form_id.to_string(),
            });
        }
        FormSnapshot::capture(doc, form_id).ok_or_else(|| ValidityError::NotAForm {
            id: form_id.to_string(),
        })
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Route a document event. Returns true if its default action must be
    /// suppressed (an invalid submission).
    pub fn handle_event(&mut self, doc: &mut Document, event: &Event) -> bool {
        match event {
            Event::Input { target } => {
                if self.is_attached(target) && !is_checkable(doc, target) {
                    truncate_textarea(doc, target);
                    self.check_field(doc, target);
                }
                false
            }
            Event::Click { target } => {
                if self.is_attached(target) && is_checkable(doc, target) {
                    self.check_field(doc, target);
                }
                false
            }
            Event::Submit { target } => match self.submit(doc, target) {
                Ok(outcome) => outcome.is_prevented(),
                Err(err) => {
                    log::debug!("[engine] submit ignored: {}", err);
                    false
                }
            },
            Event::Reset { target } => {
                if let Err(err) = self.reset(doc, target) {
                    log::debug!("[engine] reset ignored: {}", err);
                }
                false
            }
            Event::Focus { .. } | Event::Blur { .. } => false,
        }
    }

    /// Re-validate a field and publish a transition if its state reversed.
    pub fn check_field(&mut self, doc: &mut Document, id: &str) -> Option<Transition> {
        let errors = match self.field_validity(doc, id) {
            Ok(errors) => errors,
            Err(err) => {
                log::debug!("[engine] check skipped: {}", err);
                return None;
            }
        };

        let step = transition::step(self.visual_state(id), !errors.is_empty());
        self.fields.entry(id.to_string()).or_default().visual = step.state;

        match step.transition {
            Some(Transition::BecameInvalid) => self.notify(
                doc,
                Notification::FieldInvalid {
                    target: id.to_string(),
                    errors,
                },
            ),
            Some(Transition::BecameValid) => self.notify(
                doc,
                Notification::FieldValid {
                    target: id.to_string(),
                },
            ),
            None => {}
        }

        step.transition
    }

    /// Validate a whole form for submission.
    ///
    /// Every invalid field is notified regardless of its previous state (the
    /// first element carrying the name receives it), followed by one
    /// form-level notification. Form-level messages block the submission
    /// even when every field is valid.
    pub fn submit(&mut self, doc: &mut Document, form_id: &str) -> Result<SubmitOutcome> {
        let result = self.form_validity(doc, form_id)?;
        let messages = self.form_messages(form_id);

        for (name, errors) in result.iter() {
            let target = doc
                .query_all(form_id, &Selector::attr_eq("name", name))
                .into_iter()
                .next();
            if let Some(target) = target {
                self.notify(
                    doc,
                    Notification::FieldInvalid {
                        target,
                        errors: errors.to_vec(),
                    },
                );
            }
        }

        if result.is_valid() && messages.is_empty() {
            log::debug!("[engine] submit form={} ok", form_id);
            return Ok(SubmitOutcome::Submitted);
        }

        log::debug!(
            "[engine] submit form={} prevented, {} invalid field(s), {} form error(s)",
            form_id,
            result.len(),
            messages.len()
        );
        self.notify(
            doc,
            Notification::FormInvalid {
                target: form_id.to_string(),
                errors: result.clone(),
                messages,
            },
        );
        Ok(SubmitOutcome::Prevented(result))
    }

    /// Hide the tooltips of every named element in a form.
    /// Returns how many were visible or pending.
    pub fn reset(&mut self, doc: &Document, form_id: &str) -> Result<usize> {
        self.capture_form(doc, form_id)?;

        let mut hidden = 0;
        for id in doc.query_all(form_id, &Selector::attr("name")) {
            let tooltip = self.fields.get_mut(&id).and_then(|s| s.tooltip.as_mut());
            if tooltip.is_some_and(|t| t.hide()) {
                hidden += 1;
            }
        }
        log::debug!("[engine] reset form={} hid {} tooltip(s)", form_id, hidden);
        Ok(hidden)
    }

    /// The user dismissed a field's tooltip: hide it and focus the field.
    pub fn dismiss_tooltip(&mut self, doc: &mut Document, field_id: &str) -> bool {
        let Some(tooltip) = self.fields.get_mut(field_id).and_then(|s| s.tooltip.as_mut()) else {
            return false;
        };
        tooltip.hide();
        doc.focus(field_id);
        true
    }

    /// Reveal every pending tooltip whose delay has elapsed.
    /// Returns the IDs of the fields whose tooltips just appeared.
    pub fn tick(&mut self) -> Vec<String> {
        let now = self.clock.now();
        self.fields
            .iter_mut()
            .filter_map(|(id, state)| {
                let tooltip = state.tooltip.as_mut()?;
                tooltip.tick(now).then(|| id.clone())
            })
            .collect()
    }

    // =========================================================================
    // Default reactions
    // =========================================================================

    fn notify(&mut self, doc: &mut Document, notification: Notification) {
        let canceled = self.bus.publish(&notification);

        match &notification {
            Notification::FieldValid { target } => {
                doc.remove_class(target, &self.config.invalid_class);
                doc.add_class(target, &self.config.valid_class);

                let state = self.fields.entry(target.clone()).or_default();
                state.visual = VisualState::Valid;
                if !canceled {
                    if let Some(tooltip) = state.tooltip.as_mut() {
                        tooltip.hide();
                    }
                }
            }
            Notification::FieldInvalid { target, errors } => {
                doc.remove_class(target, &self.config.valid_class);
                doc.add_class(target, &self.config.invalid_class);

                self.fields.entry(target.clone()).or_default().visual = VisualState::Invalid;
                if !canceled {
                    if let Some(first) = errors.first() {
                        self.show_tooltip(doc, target, first);
                    }
                }
            }
            Notification::FormInvalid { target, .. } => {
                doc.remove_class(target, &self.config.valid_class);
                doc.add_class(target, &self.config.invalid_class);
            }
        }
    }

    fn show_tooltip(&mut self, doc: &Document, field_id: &str, message: &str) {
        let now = self.clock.now();
        let placement = doc.get(field_id).map(Placement::below).unwrap_or_default();
        let delay = self.scheduler.next_delay(now);

        let tooltip = self
            .fields
            .entry(field_id.to_string())
            .or_default()
            .tooltip
            .get_or_insert_with(|| Tooltip::new(field_id));
        tooltip.place(placement);
        tooltip.show(message, delay, now);
    }
}

impl fmt::Debug for FormValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidity")
            .field("config", &self.config)
            .field("fields", &self.fields.len())
            .field("forms", &self.forms.len())
            .field("bus", &self.bus)
            .finish()
    }
}

fn is_checkable(doc: &Document, id: &str) -> bool {
    doc.get(id)
        .and_then(|el| el.control_type())
        .is_some_and(|t| InputType::parse(&t).is_checkable())
}

/// Enforce `maxlength` on a textarea by cutting the value down to size.
fn truncate_textarea(doc: &mut Document, id: &str) {
    let Some(el) = doc.get(id) else {
        return;
    };
    if el.tag != "textarea" {
        return;
    }
    let Some(max) = el.get_attr("maxlength").and_then(parse_maxlength) else {
        return;
    };
    if el.value.chars().count() <= max {
        return;
    }

    let truncated: String = el.value.chars().take(max).collect();
    log::trace!("[engine] textarea {} truncated to {} chars", id, max);
    doc.set_value(id, truncated);
}
