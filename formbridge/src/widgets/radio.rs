//! Radio group state.

use crate::schema::Choice;

/// Mutually exclusive options sharing one submission name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioGroup {
    options: Vec<Choice>,
    checked: Option<usize>,
}

impl RadioGroup {
    /// Build a group, pre-checking the option equal to `preset`.
    pub fn new(options: Vec<Choice>, preset: Option<&str>) -> Self {
        let checked = preset.and_then(|p| options.iter().position(|c| c.value == p));
        Self { options, checked }
    }

    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    pub fn checked(&self) -> Option<usize> {
        self.checked
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked == Some(index)
    }

    pub fn value(&self) -> Option<&str> {
        self.checked
            .and_then(|i| self.options.get(i))
            .map(|c| c.value.as_str())
    }

    pub fn check(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.checked = Some(index);
            true
        } else {
            false
        }
    }

    pub fn check_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|c| c.value == value) {
            Some(index) => {
                self.checked = Some(index);
                true
            }
            None => false,
        }
    }
}
