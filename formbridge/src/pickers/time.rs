use serde::Deserialize;

use crate::validation::{char_slice, parse_int};

/// One drop-down of a composite time picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimePart {
    Hour,
    Minute,
}

/// Hour/minute drop-downs bound to a canonical 24-hour `HH:MM` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimePicker {
    canonical: String,
    hour: Option<u32>,
    minute: Option<u32>,
    /// Error styling on the drop-downs, mirrored from the field.
    pub errored: bool,
}

impl TimePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonical(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.set_canonical(value);
        }
        self
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    /// Change one drop-down (`None` is the placeholder). Hours run 0-23 and
    /// minutes 0-59; anything else is not an option and is rejected.
    pub fn select(&mut self, part: TimePart, value: Option<u32>) -> bool {
        match (part, value) {
            (TimePart::Hour, None) => self.hour = None,
            (TimePart::Hour, Some(h)) if h <= 23 => self.hour = Some(h),
            (TimePart::Minute, None) => self.minute = None,
            (TimePart::Minute, Some(m)) if m <= 59 => self.minute = Some(m),
            _ => return false,
        }
        self.canonical = match (self.hour, self.minute) {
            (Some(h), Some(m)) => format!("{:02}:{:02}", h, m),
            _ => String::new(),
        };
        true
    }

    /// Set the canonical value directly, back-deriving the drop-downs when
    /// it holds an in-range hour and minute.
    pub fn set_canonical(&mut self, value: &str) {
        self.canonical = value.to_string();
        let hour = parse_int(&char_slice(value, 0, 2));
        let minute = parse_int(&char_slice(value, 3, 5));
        if let (Some(h @ 0..=23), Some(m @ 0..=59)) = (hour, minute) {
            self.hour = Some(h as u32);
            self.minute = Some(m as u32);
        }
    }
}
