//! Per-field tooltip lifecycle.

use std::time::{Duration, Instant};

use formdom::Element;

/// Where a tooltip sits relative to its field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    /// Offset from the field's top edge (the field's height).
    pub margin_top: u16,
    /// One above the field's z-index.
    pub z_index: i16,
}

impl Placement {
    pub fn below(field: &Element) -> Self {
        Self {
            margin_top: field.height,
            z_index: field.z_index.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Hidden,
    /// Will appear once `show_at` is reached. Hiding before then cancels it.
    Pending { show_at: Instant },
    Visible,
}

/// A notification surface attached to one field. Shows a single message.
#[derive(Debug, Clone)]
pub struct Tooltip {
    field_id: String,
    message: Option<String>,
    phase: TooltipPhase,
    placement: Placement,
}

impl Tooltip {
    /// Create a hidden tooltip for the given field.
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            message: None,
            phase: TooltipPhase::Hidden,
            placement: Placement::default(),
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_visible(&self) -> bool {
        self.phase == TooltipPhase::Visible
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, TooltipPhase::Pending { .. })
    }

    pub fn place(&mut self, placement: Placement) {
        self.placement = placement;
    }

    /// Hide (cancelling any pending show), then show `message` after `delay`.
    pub fn show(&mut self, message: impl Into<String>, delay: Duration, now: Instant) {
        self.hide();
        self.message = Some(message.into());
        self.phase = if delay.is_zero() {
            TooltipPhase::Visible
        } else {
            TooltipPhase::Pending {
                show_at: now + delay,
            }
        };
    }

    /// Hide the tooltip. Returns true if it was visible or pending.
    pub fn hide(&mut self) -> bool {
        let was_shown = self.phase != TooltipPhase::Hidden;
        self.phase = TooltipPhase::Hidden;
        was_shown
    }

    /// Reveal a pending tooltip whose time has come.
    /// Returns true if it became visible on this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            TooltipPhase::Pending { show_at } if now >= show_at => {
                self.phase = TooltipPhase::Visible;
                true
            }
            _ => false,
        }
    }
}
