use log::{debug, warn};

use super::state::set_button_state;
use super::tree::{FieldBody, FieldId, Form, InstanceId, Section, SubmitButton};
use crate::error::HostProtocolError;
use crate::render::FieldRenderer;
use crate::schema::FormDefinition;
use crate::validation::ValidationEngine;

/// Builds the section tree and manages repeatable siblings.
pub struct FormAssembler<'a> {
    renderer: &'a mut FieldRenderer,
    validation: &'a mut ValidationEngine,
}

impl<'a> FormAssembler<'a> {
    pub fn new(renderer: &'a mut FieldRenderer, validation: &'a mut ValidationEngine) -> Self {
        Self {
            renderer,
            validation,
        }
    }

    /// Compile a schema into a form. Fields that fail to render are logged
    /// and left out; the rest of the form is unaffected.
    pub fn assemble(&mut self, definition: &FormDefinition, form_id: &str) -> Form {
        let mut form = Form {
            id: form_id.to_string(),
            action: definition.action.clone(),
            hidden: definition.hidden_params(),
            submit: definition.submit_label().map(|label| SubmitButton {
                label: label.to_string(),
                disabled: false,
            }),
            ..Default::default()
        };

        for section_def in definition.sections() {
            let mut section = Section {
                title: section_def.title.clone(),
                grouped: !section_def.is_metadata_only(),
                ..Default::default()
            };
            for rejected in &section_def.rejected {
                warn!("{}; field skipped", rejected.to_error());
            }
            for field_def in &section_def.fields {
                match self.renderer.render(field_def) {
                    Ok(Some(mut node)) => {
                        for instance in node.body.instances_mut() {
                            self.validation.attach(instance, node.rule.clone());
                        }
                        section.fields.push(node);
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{}; field skipped", e),
                }
            }
            form.sections.push(section);
        }

        form.recompute_tab_order();
        set_button_state(&mut form);
        debug!(
            "Assembled form `{}` with {} instances",
            form.id,
            form.instances().count()
        );
        form
    }

    /// Append a new sibling to a repeatable field.
    pub fn add(&mut self, form: &mut Form, field: FieldId) -> Result<InstanceId, HostProtocolError> {
        let node = form
            .node_mut(field)
            .ok_or_else(|| HostProtocolError::UnknownTarget(field.to_string()))?;
        let FieldBody::Repeated(group) = &mut node.body else {
            return Err(HostProtocolError::Unsupported {
                action: "add",
                name: node.definition.name().to_string(),
            });
        };
        let mut instance = self
            .renderer
            .render_instance(&node.definition, node.kind)
            .ok_or_else(|| HostProtocolError::UnknownTarget(field.to_string()))?;
        self.validation.attach(&mut instance, node.rule.clone());
        instance.removable = true;
        let id = instance.id;
        group.instances.push(instance);

        form.recompute_tab_order();
        set_button_state(form);
        Ok(id)
    }

    /// Detach a clone and start fading out its message.
    pub fn remove(&mut self, form: &mut Form, id: InstanceId) -> Result<(), HostProtocolError> {
        let unknown = || HostProtocolError::UnknownTarget(id.to_string());
        let node = form
            .nodes_mut()
            .find(|n| n.body.instances().iter().any(|i| i.id == id))
            .ok_or_else(unknown)?;
        let name = node.definition.name().to_string();
        let FieldBody::Repeated(group) = &mut node.body else {
            return Err(HostProtocolError::Unsupported {
                action: "remove",
                name,
            });
        };
        let position = group
            .instances
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(unknown)?;
        if !group.instances[position].removable {
            return Err(HostProtocolError::Unsupported {
                action: "remove",
                name,
            });
        }

        let removed = group.instances.remove(position);
        if let Some(message) = removed.message {
            group.leaving.push(self.validation.detach_message(message));
        }

        form.recompute_tab_order();
        set_button_state(form);
        Ok(())
    }
}
