//! Edge-triggered valid/invalid transitions.

/// The last visual state recorded for a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Nothing has been decided yet.
    #[default]
    Neutral,
    Valid,
    Invalid,
}

/// A change worth telling subscribers about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    BecameValid,
    BecameInvalid,
}

/// Outcome of feeding a fresh validity result into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: VisualState,
    pub transition: Option<Transition>,
}

/// Advance a field's visual state.
///
/// Only a reversal (valid -> invalid, invalid -> valid) produces a
/// transition. The first result after neutral and repeats of the current
/// state are recorded silently.
pub fn step(current: VisualState, has_errors: bool) -> Step {
    match (current, has_errors) {
        (VisualState::Valid, true) => Step {
            state: VisualState::Invalid,
            transition: Some(Transition::BecameInvalid),
        },
        (VisualState::Invalid, false) => Step {
            state: VisualState::Valid,
            transition: Some(Transition::BecameValid),
        },
        (_, true) => Step {
            state: VisualState::Invalid,
            transition: None,
        },
        (_, false) => Step {
            state: VisualState::Valid,
            transition: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_result_is_silent() {
        assert_eq!(
            step(VisualState::Neutral, true),
            Step {
                state: VisualState::Invalid,
                transition: None
            }
        );
        assert_eq!(
            step(VisualState::Neutral, false),
            Step {
                state: VisualState::Valid,
                transition: None
            }
        );
    }

    #[test]
    fn test_reversals_fire() {
        assert_eq!(
            step(VisualState::Valid, true).transition,
            Some(Transition::BecameInvalid)
        );
        assert_eq!(
            step(VisualState::Invalid, false).transition,
            Some(Transition::BecameValid)
        );
    }

    #[test]
    fn test_repeats_are_silent() {
        assert_eq!(step(VisualState::Invalid, true).transition, None);
        assert_eq!(step(VisualState::Valid, false).transition, None);
    }

    #[test]
    fn test_never_returns_to_neutral() {
        for state in [VisualState::Neutral, VisualState::Valid, VisualState::Invalid] {
            for has_errors in [true, false] {
                assert_ne!(step(state, has_errors).state, VisualState::Neutral);
            }
        }
    }
}
