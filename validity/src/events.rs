//! Observer bus for validity notifications.

use std::fmt;

use crate::aggregate::ValidationResult;

/// Which notifications a handler wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A field became valid.
    Valid,
    /// A field or form became invalid.
    Invalid,
}

/// A published validity change.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A field became valid.
    FieldValid { target: String },
    /// A field became invalid.
    FieldInvalid { target: String, errors: Vec<String> },
    /// A submitted form has invalid fields, or errors of its own.
    FormInvalid {
        target: String,
        errors: ValidationResult,
        /// Form-level messages not tied to any field.
        messages: Vec<String>,
    },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::FieldValid { .. } => NotificationKind::Valid,
            Notification::FieldInvalid { .. } | Notification::FormInvalid { .. } => {
                NotificationKind::Invalid
            }
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Notification::FieldValid { target }
            | Notification::FieldInvalid { target, .. }
            | Notification::FormInvalid { target, .. } => target,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Notification::FormInvalid { .. })
    }
}

/// Handed to every handler; cancelling suppresses the default tooltip
/// reaction but not delivery to the remaining handlers.
#[derive(Debug, Default)]
pub struct Cancel {
    canceled: bool,
}

impl Cancel {
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }
}

/// Type alias for notification handlers.
pub type Handler = Box<dyn FnMut(&Notification, &mut Cancel)>;

/// Returned by `subscribe`; pass to `unsubscribe` to remove the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// Delivers notifications to subscribers in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: usize,
    handlers: Vec<(SubscriptionId, NotificationKind, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: NotificationKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Notification, &mut Cancel) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, kind, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns true if it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _, _)| *sub != id);
        self.handlers.len() != before
    }

    /// Deliver a notification. Returns true if any handler cancelled it.
    pub fn publish(&mut self, notification: &Notification) -> bool {
        let kind = notification.kind();
        let mut cancel = Cancel::default();

        for (_, _, handler) in self.handlers.iter_mut().filter(|(_, k, _)| *k == kind) {
            handler(notification, &mut cancel);
        }

        log::debug!(
            "[events] {:?} target={} canceled={}",
            kind,
            notification.target(),
            cancel.is_canceled()
        );
        cancel.is_canceled()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn valid(target: &str) -> Notification {
        Notification::FieldValid {
            target: target.into(),
        }
    }

    #[test]
    fn test_delivers_by_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let sink = seen.clone();
        bus.subscribe(NotificationKind::Valid, move |n, _| {
            sink.borrow_mut().push(n.target().to_string());
        });

        bus.publish(&valid("email"));
        bus.publish(&Notification::FieldInvalid {
            target: "nick".into(),
            errors: vec!["x".into()],
        });

        assert_eq!(*seen.borrow(), vec!["email"]);
    }

    #[test]
    fn test_cancel_does_not_stop_delivery() {
        let calls = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        bus.subscribe(NotificationKind::Valid, |_, cancel| cancel.cancel());
        let counter = calls.clone();
        bus.subscribe(NotificationKind::Valid, move |_, cancel| {
            assert!(cancel.is_canceled());
            *counter.borrow_mut() += 1;
        });

        assert!(bus.publish(&valid("email")));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(NotificationKind::Valid, |_, cancel| cancel.cancel());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
        assert!(!bus.publish(&valid("email")));
    }

    #[test]
    fn test_notification_accessors() {
        let n = Notification::FormInvalid {
            target: "signup".into(),
            errors: ValidationResult::new(),
            messages: vec!["rejected".into()],
        };
        assert_eq!(n.kind(), NotificationKind::Invalid);
        assert_eq!(n.target(), "signup");
        assert!(n.is_form());
    }
}
