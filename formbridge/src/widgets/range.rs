//! Range inputs: sliders, or numeric inputs on hosts without one.

/// How a range field is realized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeMode {
    /// Native slider with a live readout of the current value.
    Slider { readout: String },
    /// Downgraded numeric input.
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeInput {
    pub mode: RangeMode,
    pub value: String,
    pub min: Option<String>,
    pub max: Option<String>,
    pub step: Option<String>,
}

impl RangeInput {
    /// The initial value is the preset, else `min`, else `0`. The slider
    /// readout starts at the preset only.
    pub fn new(
        slider: bool,
        preset: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
        step: Option<&str>,
    ) -> Self {
        let value = preset.or(min).unwrap_or("0").to_string();
        let mode = if slider {
            RangeMode::Slider {
                readout: preset.unwrap_or_default().to_string(),
            }
        } else {
            RangeMode::Number
        };
        Self {
            mode,
            value,
            min: min.map(str::to_string),
            max: max.map(str::to_string),
            step: if slider { step.map(str::to_string) } else { None },
        }
    }

    pub fn is_slider(&self) -> bool {
        matches!(self.mode, RangeMode::Slider { .. })
    }

    pub fn readout(&self) -> Option<&str> {
        match &self.mode {
            RangeMode::Slider { readout } => Some(readout),
            RangeMode::Number => None,
        }
    }

    /// Set the value; the slider readout follows synchronously.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        if let RangeMode::Slider { readout } = &mut self.mode {
            *readout = self.value.clone();
        }
    }
}
