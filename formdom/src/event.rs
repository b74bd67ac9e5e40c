/// High-level events with element targeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The value of a text-like control changed
    Input { target: String },
    /// An element was clicked (checkbox and radio state already applied)
    Click { target: String },
    /// A form is about to be submitted
    Submit { target: String },
    /// A form was reset
    Reset { target: String },
    /// Element gained focus
    Focus { target: String },
    /// Element lost focus
    Blur { target: String },
}

impl Event {
    pub fn input(target: impl Into<String>) -> Self {
        Event::Input {
            target: target.into(),
        }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Event::Click {
            target: target.into(),
        }
    }

    pub fn submit(target: impl Into<String>) -> Self {
        Event::Submit {
            target: target.into(),
        }
    }

    pub fn reset(target: impl Into<String>) -> Self {
        Event::Reset {
            target: target.into(),
        }
    }

    /// The ID of the element the event is aimed at.
    pub fn target(&self) -> &str {
        match self {
            Event::Input { target }
            | Event::Click { target }
            | Event::Submit { target }
            | Event::Reset { target }
            | Event::Focus { target }
            | Event::Blur { target } => target,
        }
    }
}
