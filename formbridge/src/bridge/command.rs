//! Inbound commands and their replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{PostRequest, UiEvent};
use crate::form::{FormErrors, POPULATE_PLACEHOLDER};

/// A host-invoked command.
///
/// JSON form: `{"command": "setReadOnly", "args": true}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum Command {
    Init,
    SetJsonForm(Value),
    SetJsonPopulateData(Value),
    PopulateWithData(Value),
    SetReadOnly(Value),
    GetFormData,
    GetFormErrors,
    IsFormValid,
    GetFormDataValidated,
    /// A UI occurrence forwarded by the host view.
    Ui(UiEvent),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SetJsonForm(_) => "setJsonForm",
            Self::SetJsonPopulateData(_) => "setJsonPopulateData",
            Self::PopulateWithData(_) => "populateWithData",
            Self::SetReadOnly(_) => "setReadOnly",
            Self::GetFormData => "getFormData",
            Self::GetFormErrors => "getFormErrors",
            Self::IsFormValid => "isFormValid",
            Self::GetFormDataValidated => "getFormDataValidated",
            Self::Ui(_) => "ui",
        }
    }
}

/// Answer to a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", content = "value", rename_all = "camelCase")]
pub enum Reply {
    FormData(Value),
    FormErrors(FormErrors),
    Valid(bool),
    Validated(Option<Value>),
    /// A submit without a success callback, to be posted by the shell.
    Posted(PostRequest),
    Done,
}

/// `true`, `"true"`, `"True"` and `"TRUE"` mean read-only.
pub fn read_only_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "true" | "True" | "TRUE"),
        _ => false,
    }
}

/// Hosts often pass JSON documents as strings; decode those. The population
/// placeholder and non-JSON strings are kept as they are.
pub fn json_argument(value: Value) -> Value {
    match value {
        Value::String(text) if text != POPULATE_PLACEHOLDER => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        other => other,
    }
}
