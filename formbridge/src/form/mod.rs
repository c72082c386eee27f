//! Form assembly, aggregate state, data exchange and read-only projection.

mod assemble;
mod data;
mod readonly;
mod state;
mod tree;

pub use assemble::FormAssembler;
pub use data::{POPULATE_PLACEHOLDER, populate, serialize};
pub use readonly::{set_editable, set_read_only};
pub use state::{FormErrors, ValidationFailure, errors_exist, form_errors, set_button_state};
pub use tree::{
    FieldBody, FieldId, FieldInstance, FieldNode, Form, InstanceId, LabelState, Presentation,
    RepeatGroup, Section, SubmitButton,
};
