//! Messages shown by the presenter.

use clap::ValueEnum;

/// Vertical anchor of the wrapped message block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Alignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// A message and where to anchor it. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMessage {
    pub text: String,
    pub alignment: Alignment,
}

impl DisplayMessage {
    pub fn new(text: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            text: text.into(),
            alignment,
        }
    }
}

/// Ordered messages plus the index of the one on screen.
///
/// The CLI only ever fills a single slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDeck {
    messages: Vec<DisplayMessage>,
    current: usize,
}

impl MessageDeck {
    pub fn single(message: DisplayMessage) -> Self {
        Self {
            messages: vec![message],
            current: 0,
        }
    }

    pub fn current(&self) -> &DisplayMessage {
        &self.messages[self.current]
    }
}
