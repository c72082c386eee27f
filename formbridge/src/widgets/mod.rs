//! Widget state for every field variant.
//!
//! Widgets are plain state holders. They know their value, how to show a
//! populated datum and how to serialize themselves; focus, validation and
//! events are driven by the owning [`FieldInstance`].
//!
//! [`FieldInstance`]: crate::form::FieldInstance

mod checkbox;
mod input;
mod link;
mod phone;
mod radio;
mod range;
mod select;

pub use checkbox::{Checkbox, DEFAULT_CHECKED_VALUE};
pub use input::{FileInput, InputAttrs, InputKind, TextInput};
pub use link::Link;
pub use phone::{DEFAULT_SUB_KEY, PhoneItem};
pub use radio::RadioGroup;
pub use range::{RangeInput, RangeMode};
pub use select::Select;

use serde_json::Value;

use crate::pickers::{DatePicker, TimePicker};

/// Widgets that expose a value to the validator.
pub trait Validatable {
    /// The current value as the validator sees it.
    fn validation_value(&self) -> String;

    /// Controls that opt out of validation regardless of their rules.
    fn ignores_validation(&self) -> bool {
        false
    }
}

impl Validatable for TextInput {
    fn validation_value(&self) -> String {
        self.value.clone()
    }
}

impl Validatable for Select {
    fn validation_value(&self) -> String {
        self.value().unwrap_or_default().to_string()
    }
}

impl Validatable for RadioGroup {
    fn validation_value(&self) -> String {
        self.value().unwrap_or_default().to_string()
    }
}

impl Validatable for Checkbox {
    fn validation_value(&self) -> String {
        self.current().to_string()
    }
}

impl Validatable for RangeInput {
    fn validation_value(&self) -> String {
        self.value.clone()
    }
}

impl Validatable for FileInput {
    fn validation_value(&self) -> String {
        self.value().to_string()
    }
}

impl Validatable for Link {
    fn validation_value(&self) -> String {
        String::new()
    }

    fn ignores_validation(&self) -> bool {
        true
    }
}

impl Validatable for DatePicker {
    fn validation_value(&self) -> String {
        self.canonical().to_string()
    }
}

impl Validatable for TimePicker {
    fn validation_value(&self) -> String {
        self.canonical().to_string()
    }
}

/// The number is validated; the type selector never is.
impl Validatable for PhoneItem {
    fn validation_value(&self) -> String {
        self.number.value.clone()
    }
}

/// The live control behind one field instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Input(TextInput),
    Select(Select),
    Radio(RadioGroup),
    Checkbox(Checkbox),
    Range(RangeInput),
    File(FileInput),
    Link(Link),
    Date(DatePicker),
    Time(TimePicker),
    Phone(PhoneItem),
}

impl Validatable for Widget {
    fn validation_value(&self) -> String {
        self.as_validatable().validation_value()
    }

    fn ignores_validation(&self) -> bool {
        self.as_validatable().ignores_validation()
    }
}

impl Widget {
    fn as_validatable(&self) -> &dyn Validatable {
        match self {
            Self::Input(w) => w,
            Self::Select(w) => w,
            Self::Radio(w) => w,
            Self::Checkbox(w) => w,
            Self::Range(w) => w,
            Self::File(w) => w,
            Self::Link(w) => w,
            Self::Date(w) => w,
            Self::Time(w) => w,
            Self::Phone(w) => w,
        }
    }

    /// Value carried by outbound focus/change events. Checkboxes report
    /// their checked state rather than their value.
    pub fn event_value(&self) -> String {
        match self {
            Self::Checkbox(checkbox) => checkbox.checked.to_string(),
            other => other.validation_value(),
        }
    }

    /// Name/value pairs this widget contributes to the form data, in the
    /// order a browser would serialize them. `name` is the field's full name.
    pub fn entries(&self, name: &str) -> Vec<(String, String)> {
        let single = |value: &str| vec![(name.to_string(), value.to_string())];
        match self {
            Self::Input(input) => single(&input.value),
            Self::Range(range) => single(&range.value),
            Self::Select(select) => select.value().map(single).unwrap_or_default(),
            Self::Radio(radio) => radio.value().map(single).unwrap_or_default(),
            Self::Checkbox(checkbox) if checkbox.checked => single(checkbox.checked_value()),
            Self::Date(picker) => single(picker.canonical()),
            Self::Time(picker) => single(picker.canonical()),
            Self::Phone(phone) => {
                let mut entries = Vec::with_capacity(2);
                if let Some(kind) = phone.type_select.value() {
                    entries.push((phone.type_name(name), kind.to_string()));
                }
                entries.push((phone.phone_name(name), phone.number.value.clone()));
                entries
            }
            Self::Checkbox(_) | Self::File(_) | Self::Link(_) => Vec::new(),
        }
    }

    /// Show a populated datum. Returns `false` for widgets that can never
    /// be populated.
    pub fn set_value(&mut self, datum: &Value) -> bool {
        match self {
            Self::File(_) | Self::Link(_) => return false,
            Self::Checkbox(checkbox) => {
                checkbox.checked = match datum {
                    Value::Bool(b) => *b,
                    other => {
                        let text = scalar_text(other);
                        text == "true" || text == checkbox.checked_value()
                    }
                };
            }
            Self::Phone(phone) => match datum {
                Value::Object(map) => {
                    if let Some(kind) = map.get(&phone.type_key) {
                        phone.type_select.select_value(&scalar_text(kind));
                    }
                    if let Some(number) = map.get(&phone.phone_key) {
                        phone.number.value = scalar_text(number);
                    }
                }
                other => phone.number.value = scalar_text(other),
            },
            Self::Input(input) => input.value = scalar_text(datum),
            Self::Range(range) => range.set(&scalar_text(datum)),
            Self::Select(select) => {
                select.select_value(&scalar_text(datum));
            }
            Self::Radio(radio) => {
                radio.check_value(&scalar_text(datum));
            }
            Self::Date(picker) => picker.set_canonical(&scalar_text(datum)),
            Self::Time(picker) => picker.set_canonical(&scalar_text(datum)),
        }
        true
    }

    /// Whether the control takes part in tab order.
    pub fn is_focusable(&self) -> bool {
        !matches!(
            self,
            Self::Input(TextInput {
                kind: InputKind::Hidden,
                ..
            })
        )
    }

    /// URI scheme of the tap-to-call/tap-to-email affordance offered by
    /// disabled contact fields.
    pub fn contact_scheme(&self) -> Option<&'static str> {
        match self {
            Self::Input(TextInput {
                kind: InputKind::Tel,
                ..
            })
            | Self::Phone(_) => Some("tel:"),
            Self::Input(TextInput {
                kind: InputKind::Email,
                ..
            }) => Some("mailto:"),
            _ => None,
        }
    }

    /// Native or composite date/time controls.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date(_)
                | Self::Time(_)
                | Self::Input(TextInput {
                    kind: InputKind::Date | InputKind::Time,
                    ..
                })
        )
    }

    /// Mirror the field's error state onto composite picker drop-downs.
    pub fn set_picker_errored(&mut self, errored: bool) {
        match self {
            Self::Date(picker) => picker.errored = errored,
            Self::Time(picker) => picker.errored = errored,
            _ => {}
        }
    }
}

/// Textual form of a populated JSON datum.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
