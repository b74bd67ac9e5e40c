//! Inline form validation.
//!
//! Computes per-field error lists from control state (required, type
//! patterns, custom `pattern` attributes, custom validators), aggregates them
//! per form, and drives the visual layer: edge-triggered valid/invalid
//! notifications, CSS classes and staggered tooltips.

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod events;
pub mod field;
pub mod pattern;
pub mod scheduler;
pub mod tooltip;
pub mod transition;
pub mod validator;

pub use aggregate::{ValidationResult, compute_errors};
pub use config::{PatternConfig, ValidityConfig};
pub use engine::{FormValidity, SubmitOutcome};
pub use error::{Result, ValidityError};
pub use evaluate::{Violation, evaluate};

pub mod prelude {
    pub use crate::aggregate::ValidationResult;
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::ValidityConfig;
    pub use crate::engine::{FormValidity, SubmitOutcome};
    pub use crate::error::{Result, ValidityError};
    pub use crate::events::{Cancel, Notification, NotificationKind, SubscriptionId};
    pub use crate::field::{FieldSnapshot, FormSnapshot, InputType};
    pub use crate::tooltip::{Placement, Tooltip, TooltipPhase};
    pub use crate::transition::{Transition, VisualState};
    pub use crate::validator::{FormOverride, Validator};
}
