//! Field renderer: schema definitions to live instances.
//!
//! One constructor per variant, selected by an exhaustive match on
//! [`FieldKind`]. Date, time and range fields consult the [`HostProfile`]
//! to choose between native and fallback controls.
//!
//! [`HostProfile`]: crate::host::HostProfile

use std::sync::Arc;

use chrono::{Datelike, Local};
use log::warn;

use crate::config::EngineConfig;
use crate::error::ConfigurationError;
use crate::form::{FieldBody, FieldId, FieldInstance, FieldNode, InstanceId, RepeatGroup};
use crate::pickers::{DateOrder, DatePicker, TimePicker};
use crate::schema::{FieldDefinition, FieldKind};
use crate::validation::ValidationRule;
use crate::widgets::{
    Checkbox, FileInput, InputAttrs, InputKind, Link, PhoneItem, RadioGroup, RangeInput, Select,
    TextInput, Widget,
};

/// Turns field definitions into nodes and instances.
///
/// The renderer also hands out node and instance identities, so every clone
/// of a repeatable field must be rendered through the same renderer.
#[derive(Debug, Clone)]
pub struct FieldRenderer {
    config: EngineConfig,
    current_year: i32,
    next_field: u32,
    next_instance: u32,
}

impl FieldRenderer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            current_year: Local::now().year(),
            next_field: 0,
            next_instance: 0,
        }
    }

    /// Pin the year composite date pickers are centered on.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render a node for `def`. Name-only markers render nothing.
    pub fn render(&mut self, def: &FieldDefinition) -> Result<Option<FieldNode>, ConfigurationError> {
        let kind = def.kind()?;
        if kind == FieldKind::NameOnly {
            return Ok(None);
        }
        if def.name().is_empty() {
            return Err(ConfigurationError::MissingName {
                field_type: kind.tag().to_string(),
            });
        }

        let definition = Arc::new(def.clone());
        let rule = ValidationRule::derive(def, kind).map(Arc::new);
        let Some(instance) = self.render_instance(&definition, kind) else {
            return Ok(None);
        };
        let body = if def.is_repeatable() && kind != FieldKind::Link {
            FieldBody::Repeated(RepeatGroup {
                instances: vec![instance],
                ..Default::default()
            })
        } else {
            FieldBody::Single(instance)
        };

        self.next_field += 1;
        Ok(Some(FieldNode {
            id: FieldId(self.next_field),
            definition,
            kind,
            rule,
            body,
            read_only_hidden: false,
        }))
    }

    /// Render a fresh instance of an already-rendered definition. Used for
    /// the first instance of every node and for repeatable clones.
    pub fn render_instance(
        &mut self,
        definition: &Arc<FieldDefinition>,
        kind: FieldKind,
    ) -> Option<FieldInstance> {
        let widget = self.widget(definition, kind)?;
        self.next_instance += 1;
        Some(FieldInstance::new(
            InstanceId(self.next_instance),
            Arc::clone(definition),
            kind,
            widget,
        ))
    }

    fn widget(&self, def: &FieldDefinition, kind: FieldKind) -> Option<Widget> {
        let host = &self.config.host;
        let widget = match kind {
            FieldKind::Text => plain_input(def, InputKind::Text),
            FieldKind::Password => plain_input(def, InputKind::Password),
            FieldKind::Number => plain_input(def, InputKind::Number),
            FieldKind::Tel => plain_input(def, InputKind::Tel),
            FieldKind::Email => plain_input(def, InputKind::Email),
            FieldKind::Hidden => plain_input(def, InputKind::Hidden),
            FieldKind::Textarea => textarea(def),
            FieldKind::Date if host.uses_date_picker() => self.date_picker(def),
            FieldKind::Date => plain_input(def, InputKind::Date),
            FieldKind::Time if host.uses_time_picker() => time_picker(def),
            FieldKind::Time => plain_input(def, InputKind::Time),
            FieldKind::File => file(def),
            FieldKind::Range => range(def, host.uses_slider()),
            FieldKind::Select => select(def),
            FieldKind::Radio => radio(def),
            FieldKind::Checkbox => checkbox(def),
            FieldKind::PhoneItem => phone_item(def),
            FieldKind::Link => link(def),
            FieldKind::NameOnly => return None,
        };
        Some(widget)
    }

    fn date_picker(&self, def: &FieldDefinition) -> Widget {
        let format = def
            .dateformat
            .as_deref()
            .unwrap_or(&self.config.date_format);
        let years_diff = match def.years_diff() {
            Ok(diff) => diff.unwrap_or(self.config.years_diff),
            Err(e) => {
                warn!("{}; using {}", e, self.config.years_diff);
                self.config.years_diff
            }
        };
        Widget::Date(
            DatePicker::new(DateOrder::from_format(format), self.current_year, years_diff)
                .with_canonical(def.value()),
        )
    }
}

fn attrs(def: &FieldDefinition, numeric_hints: bool) -> InputAttrs {
    let owned = |value: Option<&str>| value.map(str::to_string);
    InputAttrs {
        placeholder: def.placeholder.clone(),
        maxlength: owned(def.maxlength()),
        min: owned(def.min()).filter(|_| numeric_hints),
        max: owned(def.max()).filter(|_| numeric_hints),
        text_align: def.textalign.clone(),
    }
}

fn plain_input(def: &FieldDefinition, kind: InputKind) -> Widget {
    Widget::Input(
        TextInput::new(kind)
            .with_value(def.value())
            .with_attrs(attrs(def, kind != InputKind::Textarea)),
    )
}

fn textarea(def: &FieldDefinition) -> Widget {
    plain_input(def, InputKind::Textarea)
}

fn time_picker(def: &FieldDefinition) -> Widget {
    Widget::Time(TimePicker::new().with_canonical(def.value()))
}

fn file(def: &FieldDefinition) -> Widget {
    Widget::File(FileInput::new(def.maxlength()))
}

fn range(def: &FieldDefinition, slider: bool) -> Widget {
    Widget::Range(RangeInput::new(
        slider,
        def.value(),
        def.min(),
        def.max(),
        def.step(),
    ))
}

fn select(def: &FieldDefinition) -> Widget {
    Widget::Select(Select::new(def.choices(), def.value()))
}

fn radio(def: &FieldDefinition) -> Widget {
    Widget::Radio(RadioGroup::new(def.choices(), def.value()))
}

fn checkbox(def: &FieldDefinition) -> Widget {
    Widget::Checkbox(Checkbox::new(
        def.value(),
        def.is_checked(),
        def.label.as_deref(),
    ))
}

fn phone_item(def: &FieldDefinition) -> Widget {
    Widget::Phone(PhoneItem::new(
        Select::new(def.phone_type_choices(), None),
        def.value(),
        attrs(def, false),
        def.nametype.as_deref(),
        def.namephone.as_deref(),
    ))
}

fn link(def: &FieldDefinition) -> Widget {
    Widget::Link(Link {
        text: def.value().unwrap_or_default().to_string(),
        event: def.event.clone(),
        onclick: def.onclick.clone(),
    })
}
