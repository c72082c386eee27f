//! Aggregate error state and the submit button it drives.

use serde::{Deserialize, Serialize};

use super::tree::Form;

/// One field currently showing an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub element: String,
    pub message: String,
}

/// Reply to an errors query. Empty lists serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    pub required_errors: Option<Vec<String>>,
    pub validation_errors: Option<Vec<ValidationFailure>>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.required_errors.is_none() && self.validation_errors.is_none()
    }
}

/// True if any instance is required and empty, or is flagged in error.
pub fn errors_exist(form: &Form) -> bool {
    form.instances().any(|i| i.is_missing() || i.errored)
}

/// Disable the submit affordance iff errors exist. Returns the new state.
pub fn set_button_state(form: &mut Form) -> bool {
    let disabled = errors_exist(form);
    if let Some(button) = &mut form.submit {
        button.disabled = disabled;
    }
    disabled
}

/// Names of required-but-empty instances, and every shown message with the
/// field it belongs to.
pub fn form_errors(form: &Form) -> FormErrors {
    let required: Vec<String> = form
        .instances()
        .filter(|i| i.is_missing())
        .map(|i| i.name().to_string())
        .collect();
    let validation: Vec<ValidationFailure> = form
        .instances()
        .filter_map(|i| {
            i.shown_message().map(|message| ValidationFailure {
                element: i.name().to_string(),
                message: message.to_string(),
            })
        })
        .collect();

    FormErrors {
        required_errors: (!required.is_empty()).then_some(required),
        validation_errors: (!validation.is_empty()).then_some(validation),
    }
}
