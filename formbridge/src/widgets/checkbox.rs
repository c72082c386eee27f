//! Checkbox state.

/// Value submitted by a checked checkbox without an explicit value.
pub const DEFAULT_CHECKED_VALUE: &str = "on";

/// A single boolean toggle with its own inline label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkbox {
    pub value: Option<String>,
    pub checked: bool,
    pub label: Option<String>,
}

impl Checkbox {
    pub fn new(value: Option<&str>, checked: bool, label: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            checked,
            label: label.map(str::to_string),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.checked = !self.checked;
        self.checked
    }

    /// The submitted value while checked.
    pub fn checked_value(&self) -> &str {
        self.value.as_deref().unwrap_or(DEFAULT_CHECKED_VALUE)
    }

    /// What a validator sees: the value when checked, empty otherwise.
    pub fn current(&self) -> &str {
        if self.checked {
            self.checked_value()
        } else {
            ""
        }
    }
}
