//! Read-only projection.
//!
//! Every mutation is recorded on the tree ([`Presentation`] and the
//! `read_only_hidden` flags), so [`set_editable`] is an exact inverse of
//! [`set_read_only`].
//!
//! [`Presentation`]: super::tree::Presentation

use log::{debug, warn};

use super::tree::{FieldBody, FieldInstance, Form};
use crate::error::HostProtocolError;
use crate::schema::FieldKind;
use crate::widgets::{InputKind, TextInput, Widget};

/// Project the form read-only. Requires population to have happened.
pub fn set_read_only(form: &mut Form) -> Result<(), HostProtocolError> {
    if !form.populated {
        warn!("{}", HostProtocolError::NotPopulated);
        return Err(HostProtocolError::NotPopulated);
    }
    if form.read_only {
        set_editable(form);
    }

    for instance in form.instances_mut() {
        project(instance);
    }
    let collapsed = collapse(form);
    form.read_only = true;
    debug!("Read-only projection applied, {} containers collapsed", collapsed);
    Ok(())
}

/// Undo the read-only projection.
pub fn set_editable(form: &mut Form) {
    for section in &mut form.sections {
        section.read_only_hidden = false;
        for node in &mut section.fields {
            node.read_only_hidden = false;
            if let FieldBody::Repeated(group) = &mut node.body {
                group.read_only_hidden = false;
            }
            for instance in node.body.instances_mut() {
                instance.presentation = Default::default();
            }
        }
    }
    form.read_only = false;
}

fn project(instance: &mut FieldInstance) {
    if instance.kind == FieldKind::Link {
        return;
    }
    let value = instance.value();
    let presentation = &mut instance.presentation;
    presentation.read_only = true;

    match &instance.widget {
        Widget::Checkbox(checkbox) => presentation.hidden_unselected = !checkbox.checked,
        Widget::Radio(radio) => {
            presentation.hidden_options = (0..radio.options().len())
                .filter(|&i| !radio.is_checked(i))
                .collect();
            presentation.hidden_unselected = radio.checked().is_none();
        }
        _ => {}
    }

    let hidden_input = matches!(
        instance.widget,
        Widget::Input(TextInput {
            kind: InputKind::Hidden,
            ..
        })
    );
    if !instance.populated && !hidden_input {
        presentation.hidden = true;
    }

    if !value.is_empty() {
        presentation.contact = instance
            .widget
            .contact_scheme()
            .map(|scheme| format!("{}{}", scheme, value));
    }
    presentation.blanked = instance.widget.is_temporal() && value.is_empty();
}

/// Hide containers left without visible children, repeating until nothing
/// changes so arbitrarily deep empty structure collapses.
fn collapse(form: &mut Form) -> usize {
    let mut collapsed = 0;
    loop {
        let before = collapsed;
        for section in &mut form.sections {
            for node in &mut section.fields {
                if let FieldBody::Repeated(group) = &mut node.body {
                    let empty = !group.instances.iter().any(|i| i.presentation.is_visible());
                    if empty && !group.read_only_hidden {
                        group.read_only_hidden = true;
                        collapsed += 1;
                    }
                }
                let visible = match &node.body {
                    FieldBody::Single(instance) => instance.presentation.is_visible(),
                    FieldBody::Repeated(group) => !group.read_only_hidden,
                };
                if !visible && !node.read_only_hidden {
                    node.read_only_hidden = true;
                    collapsed += 1;
                }
            }
            if !section.read_only_hidden && section.fields.iter().all(|n| n.read_only_hidden) {
                section.read_only_hidden = true;
                collapsed += 1;
            }
        }
        if collapsed == before {
            return collapsed;
        }
    }
}
