//! Phone item: a type selector linked to a telephone number input.

use super::input::{InputAttrs, InputKind, TextInput};
use super::select::Select;

/// Sub-key used for either part when the schema does not override it.
pub const DEFAULT_SUB_KEY: &str = "type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneItem {
    /// Phone type selector; always excluded from validation.
    pub type_select: Select,
    pub number: TextInput,
    pub type_key: String,
    pub phone_key: String,
}

impl PhoneItem {
    pub fn new(
        type_select: Select,
        number_value: Option<&str>,
        attrs: InputAttrs,
        type_key: Option<&str>,
        phone_key: Option<&str>,
    ) -> Self {
        Self {
            type_select,
            number: TextInput::new(InputKind::Tel)
                .with_value(number_value)
                .with_attrs(attrs),
            type_key: type_key.unwrap_or(DEFAULT_SUB_KEY).to_string(),
            phone_key: phone_key.unwrap_or(DEFAULT_SUB_KEY).to_string(),
        }
    }

    pub fn type_name(&self, base: &str) -> String {
        format!("{}[{}]", base, self.type_key)
    }

    pub fn phone_name(&self, base: &str) -> String {
        format!("{}[{}]", base, self.phone_key)
    }
}
