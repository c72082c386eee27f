//! When evaluation runs.

use serde::Deserialize;

/// Keys the engine distinguishes; everything else is a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    Tab,
    Backspace,
    Delete,
    Enter,
    Char(char),
}

/// An occurrence that may cause a field to be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Focus left the field (value commit).
    Blur,
    Key(Key),
    /// A composite picker drop-down changed the canonical value.
    PickerChange,
}

impl Trigger {
    /// Whether this trigger evaluates a field holding `value`.
    ///
    /// Deletions only evaluate once the field has been emptied; other
    /// keystrokes never evaluate.
    pub fn evaluates(self, value: &str) -> bool {
        match self {
            Trigger::Blur | Trigger::PickerChange | Trigger::Key(Key::Tab) => true,
            Trigger::Key(Key::Backspace | Key::Delete) => value.is_empty(),
            Trigger::Key(Key::Enter | Key::Char(_)) => false,
        }
    }
}
