//! Drop-down select state.

use crate::schema::Choice;

/// A single-choice drop-down.
///
/// `selected` is the explicit selection. When nothing is explicitly selected
/// the host shows its default, the first option, and that is what submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    options: Vec<Choice>,
    selected: Option<usize>,
}

impl Select {
    /// Build a select, selecting the option equal to `preset`, or the first
    /// option when there is no preset.
    pub fn new(options: Vec<Choice>, preset: Option<&str>) -> Self {
        let selected = match preset {
            Some(preset) => options.iter().position(|c| c.value == preset),
            None if options.is_empty() => None,
            None => Some(0),
        };
        Self { options, selected }
    }

    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    /// The explicit selection, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The selection the host displays (explicit, else the first option).
    pub fn effective(&self) -> Option<usize> {
        self.selected
            .or_else(|| (!self.options.is_empty()).then_some(0))
    }

    pub fn value(&self) -> Option<&str> {
        self.effective()
            .and_then(|i| self.options.get(i))
            .map(|c| c.value.as_str())
    }

    /// Select by index; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Select the option whose value equals `value`.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|c| c.value == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }
}
