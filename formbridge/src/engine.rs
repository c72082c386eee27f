//! The form engine: one compiled form and everything that drives it.
//!
//! UI events come in through [`FormEngine::handle`] (or the matching
//! methods), outbound events leave through the [`EventSink`] passed at
//! construction. All mutation is synchronous; message transitions are data
//! advanced by [`FormEngine::tick`].

use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bridge::{EventKind, EventSink, FormEvent};
use crate::config::EngineConfig;
use crate::error::HostProtocolError;
use crate::form::{
    self, FieldBody, FieldId, Form, FormAssembler, FormErrors, InstanceId,
};
use crate::pickers::{DatePart, TimePart};
use crate::render::FieldRenderer;
use crate::schema::{FieldKind, FormDefinition};
use crate::transition::{Settled, settle};
use crate::validation::{Key, Trigger, ValidationEngine};
use crate::widgets::{Validatable, Widget};

/// Called with the data snapshot of every accepted submit.
pub type SuccessCallback = Box<dyn FnMut(&Value) + Send>;

/// A discrete input occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    Focus { target: InstanceId },
    /// Focus leaves whatever holds it.
    Blur,
    /// Key released in a field. Value edits arrive separately as `Input`.
    Key { target: InstanceId, key: Key },
    /// Value edited (typed text, slider moved, file chosen).
    Input { target: InstanceId, value: String },
    /// Value committed.
    Change { target: InstanceId },
    Toggle { target: InstanceId },
    Choose { target: InstanceId, index: usize },
    DatePart {
        target: InstanceId,
        part: DatePart,
        value: Option<i32>,
    },
    TimePart {
        target: InstanceId,
        part: TimePart,
        value: Option<u32>,
    },
    Add { field: FieldId },
    Remove { target: InstanceId },
    Click { field: FieldId },
    Submit,
}

/// Native submission the embedding shell should perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRequest {
    pub action: Option<String>,
    pub method: &'static str,
    pub enctype: &'static str,
    pub body: Value,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The schema asked for no submit affordance.
    NotWired,
    /// Errors exist; nothing was submitted.
    Rejected,
    /// The success callback received this snapshot.
    Accepted(Value),
    /// No callback is registered; the shell should post natively.
    Posted(PostRequest),
}

pub struct FormEngine {
    form: Form,
    renderer: FieldRenderer,
    validation: ValidationEngine,
    sink: Box<dyn EventSink>,
    on_success: Option<SuccessCallback>,
    focused: Option<InstanceId>,
    validated_result: Option<Value>,
}

impl FormEngine {
    /// Compile `definition` and wire it to `sink`.
    pub fn new(
        definition: &FormDefinition,
        form_id: &str,
        config: EngineConfig,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self::with_renderer(definition, form_id, FieldRenderer::new(config), sink)
    }

    /// Compile with a preconfigured renderer.
    pub fn with_renderer(
        definition: &FormDefinition,
        form_id: &str,
        mut renderer: FieldRenderer,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let mut validation = ValidationEngine::new(renderer.config());
        let form = FormAssembler::new(&mut renderer, &mut validation).assemble(definition, form_id);
        Self {
            form,
            renderer,
            validation,
            sink,
            on_success: None,
            focused: None,
            validated_result: None,
        }
    }

    pub fn with_success_callback(mut self, callback: SuccessCallback) -> Self {
        self.on_success = Some(callback);
        self
    }

    pub fn set_success_callback(&mut self, callback: Option<SuccessCallback>) {
        self.on_success = callback;
    }

    /// Give back the sink and callback, dropping the form.
    pub fn into_parts(self) -> (Box<dyn EventSink>, Option<SuccessCallback>) {
        (self.sink, self.on_success)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn sink_mut(&mut self) -> &mut dyn EventSink {
        self.sink.as_mut()
    }

    pub fn focused(&self) -> Option<InstanceId> {
        self.focused
    }

    /// Node declared under `name`.
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.form.node_by_name(name).map(|n| n.id)
    }

    /// Instances of the node declared under `name`, in order.
    pub fn instances_of(&self, name: &str) -> Vec<InstanceId> {
        self.form
            .node_by_name(name)
            .map(|n| n.body.instances().iter().map(|i| i.id).collect())
            .unwrap_or_default()
    }

    /// First instance of the node declared under `name`.
    pub fn instance_id(&self, name: &str) -> Option<InstanceId> {
        self.instances_of(name).first().copied()
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<Option<SubmitOutcome>, HostProtocolError> {
        match event {
            UiEvent::Focus { target } => self.focus(target)?,
            UiEvent::Blur => self.blur(),
            UiEvent::Key { target, key } => self.key(target, key)?,
            UiEvent::Input { target, value } => self.input(target, &value)?,
            UiEvent::Change { target } => self.change(target)?,
            UiEvent::Toggle { target } => self.toggle(target)?,
            UiEvent::Choose { target, index } => self.choose(target, index)?,
            UiEvent::DatePart {
                target,
                part,
                value,
            } => self.date_part(target, part, value)?,
            UiEvent::TimePart {
                target,
                part,
                value,
            } => self.time_part(target, part, value)?,
            UiEvent::Add { field } => {
                self.add(field)?;
            }
            UiEvent::Remove { target } => self.remove(target)?,
            UiEvent::Click { field } => self.click(field)?,
            UiEvent::Submit => return Ok(Some(self.submit())),
        }
        Ok(None)
    }

    // ====================================================================
    // Focus and keys
    // ====================================================================

    pub fn focus(&mut self, target: InstanceId) -> Result<(), HostProtocolError> {
        self.editable(target, "focus")?;
        if self.focused == Some(target) {
            return Ok(());
        }
        self.blur();
        self.focused = Some(target);
        let Some(instance) = self.form.instance_mut(target) else {
            return Ok(());
        };
        instance.label.focused = true;
        if instance.kind != FieldKind::Link {
            let event = FormEvent::new(EventKind::FocusIn, instance.name(), instance.widget.event_value());
            self.emit(event);
        }
        Ok(())
    }

    /// Commit the focused field: focus-out event, then evaluation and the
    /// button state.
    pub fn blur(&mut self) {
        let Some(target) = self.focused.take() else {
            return;
        };
        if let Some(instance) = self.form.instance_mut(target) {
            instance.label.focused = false;
            if instance.kind != FieldKind::Link {
                let event =
                    FormEvent::new(EventKind::FocusOut, instance.name(), instance.widget.event_value());
                self.emit(event);
            }
        }
        self.evaluate(target, Trigger::Blur);
        form::set_button_state(&mut self.form);
    }

    pub fn key(&mut self, target: InstanceId, key: Key) -> Result<(), HostProtocolError> {
        self.editable(target, "key")?;
        if key == Key::Enter {
            return self.advance_focus(target);
        }
        self.evaluate(target, Trigger::Key(key));
        form::set_button_state(&mut self.form);
        Ok(())
    }

    /// Move focus to the next tab index, if any.
    fn advance_focus(&mut self, from: InstanceId) -> Result<(), HostProtocolError> {
        let next = self
            .form
            .instance(from)
            .and_then(|i| i.tab_index)
            .and_then(|t| self.form.instance_at_tab(t + 1))
            .map(|i| i.id);
        match next {
            Some(next) => self.focus(next),
            None => Ok(()),
        }
    }

    // ====================================================================
    // Value changes
    // ====================================================================

    pub fn input(&mut self, target: InstanceId, value: &str) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "input")?;
        match &mut instance.widget {
            Widget::Input(input) => input.value = value.to_string(),
            Widget::Range(range) => range.set(value),
            Widget::Phone(phone) => phone.number.value = value.to_string(),
            Widget::File(file) => file.choose(value),
            _ => {
                return Err(HostProtocolError::Unsupported {
                    action: "input",
                    name: instance.definition.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn change(&mut self, target: InstanceId) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "change")?;
        if instance.kind == FieldKind::Link {
            return Ok(());
        }
        let event = FormEvent::new(EventKind::Change, instance.name(), instance.widget.event_value());
        self.emit(event);
        Ok(())
    }

    pub fn toggle(&mut self, target: InstanceId) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "toggle")?;
        let Widget::Checkbox(checkbox) = &mut instance.widget else {
            return Err(HostProtocolError::Unsupported {
                action: "toggle",
                name: instance.definition.name().to_string(),
            });
        };
        checkbox.toggle();
        self.change(target)?;
        form::set_button_state(&mut self.form);
        Ok(())
    }

    pub fn choose(&mut self, target: InstanceId, index: usize) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "choose")?;
        let chosen = match &mut instance.widget {
            Widget::Select(select) => select.select(index),
            Widget::Radio(radio) => radio.check(index),
            Widget::Phone(phone) => phone.type_select.select(index),
            _ => false,
        };
        if !chosen {
            return Err(HostProtocolError::Unsupported {
                action: "choose",
                name: instance.name().to_string(),
            });
        }
        self.change(target)?;
        form::set_button_state(&mut self.form);
        Ok(())
    }

    pub fn date_part(
        &mut self,
        target: InstanceId,
        part: DatePart,
        value: Option<i32>,
    ) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "datePart")?;
        let accepted = match &mut instance.widget {
            Widget::Date(picker) => picker.select(part, value),
            _ => false,
        };
        self.picker_changed(target, accepted, "datePart")
    }

    pub fn time_part(
        &mut self,
        target: InstanceId,
        part: TimePart,
        value: Option<u32>,
    ) -> Result<(), HostProtocolError> {
        let instance = self.editable(target, "timePart")?;
        let accepted = match &mut instance.widget {
            Widget::Time(picker) => picker.select(part, value),
            _ => false,
        };
        self.picker_changed(target, accepted, "timePart")
    }

    fn picker_changed(
        &mut self,
        target: InstanceId,
        accepted: bool,
        action: &'static str,
    ) -> Result<(), HostProtocolError> {
        if !accepted {
            let name = self.instance_name(target);
            return Err(HostProtocolError::Unsupported { action, name });
        }
        self.evaluate(target, Trigger::PickerChange);
        form::set_button_state(&mut self.form);
        Ok(())
    }

    // ====================================================================
    // Structure
    // ====================================================================

    /// Append a sibling to a repeatable field.
    pub fn add(&mut self, field: FieldId) -> Result<InstanceId, HostProtocolError> {
        if self.form.read_only {
            return Err(self.unsupported_field(field, "add"));
        }
        FormAssembler::new(&mut self.renderer, &mut self.validation).add(&mut self.form, field)
    }

    /// Remove a repeatable clone.
    pub fn remove(&mut self, target: InstanceId) -> Result<(), HostProtocolError> {
        self.editable(target, "remove")?;
        if self.focused == Some(target) {
            self.focused = None;
        }
        FormAssembler::new(&mut self.renderer, &mut self.validation).remove(&mut self.form, target)
    }

    /// Activate a link.
    pub fn click(&mut self, field: FieldId) -> Result<(), HostProtocolError> {
        let node = self
            .form
            .node(field)
            .ok_or_else(|| HostProtocolError::UnknownTarget(field.to_string()))?;
        let Some(Widget::Link(link)) = node.body.instances().first().map(|i| &i.widget) else {
            return Err(self.unsupported_field(field, "click"));
        };
        if let Some(tag) = link.event.clone() {
            let event = FormEvent::new(EventKind::Link, node.name(), tag);
            self.emit(event);
        }
        Ok(())
    }

    // ====================================================================
    // Submit and queries
    // ====================================================================

    /// Submit the form. Only accepted submits reach the success callback.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.form.submit.is_none() {
            return SubmitOutcome::NotWired;
        }
        self.blur();
        if form::set_button_state(&mut self.form) {
            let event = FormEvent::new(EventKind::SubmitInvalid, self.form.id.clone(), "invalid");
            self.emit(event);
            return SubmitOutcome::Rejected;
        }

        let snapshot = form::serialize(&self.form);
        let Some(callback) = self.on_success.as_mut() else {
            debug!("No success callback; falling back to native post");
            return SubmitOutcome::Posted(PostRequest {
                action: self.form.action.clone(),
                method: "POST",
                enctype: "application/json",
                body: snapshot,
            });
        };
        self.validated_result = Some(snapshot.clone());
        callback(&snapshot);
        let event = FormEvent::new(EventKind::Submit, self.form.id.clone(), "valid");
        self.emit(event);
        SubmitOutcome::Accepted(snapshot)
    }

    /// Snapshot of the last accepted submit.
    pub fn validated_result(&self) -> Option<&Value> {
        self.validated_result.as_ref()
    }

    /// Current values, without validation.
    pub fn form_data(&self) -> Value {
        form::serialize(&self.form)
    }

    /// Required and validation errors. Commits the focused field first.
    pub fn form_errors(&mut self) -> FormErrors {
        self.blur();
        form::form_errors(&self.form)
    }

    /// Evaluate every instance, refresh the button, and report whether the
    /// form could be submitted.
    pub fn is_form_valid(&mut self) -> bool {
        self.blur();
        let ids: Vec<InstanceId> = self.form.instances().map(|i| i.id).collect();
        for id in ids {
            self.evaluate(id, Trigger::Blur);
        }
        !form::set_button_state(&mut self.form)
    }

    pub fn errors_exist(&self) -> bool {
        form::errors_exist(&self.form)
    }

    // ====================================================================
    // Population and projection
    // ====================================================================

    /// Apply population data. Returns the number of populated instances.
    pub fn populate(&mut self, data: &Value) -> usize {
        let mut assembler = FormAssembler::new(&mut self.renderer, &mut self.validation);
        form::populate(&mut self.form, data, &mut assembler)
    }

    pub fn set_read_only(&mut self, read_only: bool) -> Result<(), HostProtocolError> {
        if read_only {
            self.blur();
            form::set_read_only(&mut self.form)
        } else {
            form::set_editable(&mut self.form);
            Ok(())
        }
    }

    // ====================================================================
    // Transitions
    // ====================================================================

    /// Advance message transitions to `now`. Returns how many messages
    /// finished fading out and were dropped.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        for node in self.form.nodes_mut() {
            if let FieldBody::Repeated(group) = &mut node.body {
                let before = group.leaving.len();
                group.leaving.retain_mut(|message| {
                    let seq = message.transition.as_ref().map_or(0, |t| t.seq);
                    settle(message, now, seq) != Settled::Removed
                });
                removed += before - group.leaving.len();
            }
            for instance in node.body.instances_mut() {
                let Some(message) = &mut instance.message else {
                    continue;
                };
                if settle(message, now, instance.message_seq) == Settled::Removed {
                    instance.message = None;
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Eased opacity of an instance's message, if it has one.
    pub fn message_opacity(&self, target: InstanceId, now: Instant) -> Option<f32> {
        self.form
            .instance(target)?
            .message
            .as_ref()
            .map(|m| m.opacity(now))
    }

    // ====================================================================
    // Internals
    // ====================================================================

    fn evaluate(&mut self, target: InstanceId, trigger: Trigger) {
        let Some(instance) = self.form.instance_mut(target) else {
            return;
        };
        if !trigger.evaluates(&instance.widget.validation_value()) {
            return;
        }
        let verdict = self.validation.evaluate(instance);
        if verdict.is_invalid() {
            let event = FormEvent::new(EventKind::ValidateError, instance.name(), instance.value());
            self.emit(event);
        }
    }

    /// The instance, unless it is unknown or projected read-only.
    fn editable(
        &mut self,
        target: InstanceId,
        action: &'static str,
    ) -> Result<&mut form::FieldInstance, HostProtocolError> {
        let instance = self
            .form
            .instance_mut(target)
            .ok_or_else(|| HostProtocolError::UnknownTarget(target.to_string()))?;
        if instance.presentation.read_only {
            return Err(HostProtocolError::Unsupported {
                action,
                name: instance.name().to_string(),
            });
        }
        Ok(instance)
    }

    fn instance_name(&self, target: InstanceId) -> String {
        self.form
            .instance(target)
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| target.to_string())
    }

    fn unsupported_field(&self, field: FieldId, action: &'static str) -> HostProtocolError {
        match self.form.node(field) {
            Some(node) => HostProtocolError::Unsupported {
                action,
                name: node.name().to_string(),
            },
            None => HostProtocolError::UnknownTarget(field.to_string()),
        }
    }

    fn emit(&mut self, event: FormEvent) {
        debug!(
            "Emitting {} for `{}` ({})",
            event.kind.wire(),
            event.element,
            event.value
        );
        self.sink.emit(&event);
    }
}
