//! The rendered form tree.
//!
//! Form → Section → FieldNode → FieldBody → FieldInstance. Every instance
//! owns its label state, message slot and error flag, so nothing is found by
//! position.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldDefinition, FieldKind};
use crate::transition::ErrorMessage;
use crate::validation::ValidationRule;
use crate::widgets::{Validatable, Widget};

/// Identity of a field node (stable across add/remove).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

/// Identity of a live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance#{}", self.0)
    }
}

/// The submit affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: String,
    /// Styled and treated as disabled while errors exist.
    pub disabled: bool,
}

/// A compiled form.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub id: String,
    pub action: Option<String>,
    /// Hidden name/value pairs submitted ahead of every field.
    pub hidden: Vec<(String, String)>,
    pub sections: Vec<Section>,
    pub submit: Option<SubmitButton>,
    /// Set once population data has been applied.
    pub populated: bool,
    /// Set while the read-only projection is in place.
    pub read_only: bool,
}

impl Form {
    pub fn nodes(&self) -> impl Iterator<Item = &FieldNode> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut FieldNode> {
        self.sections.iter_mut().flat_map(|s| s.fields.iter_mut())
    }

    /// Every live instance in tree order.
    pub fn instances(&self) -> impl Iterator<Item = &FieldInstance> {
        self.nodes().flat_map(|n| n.body.instances())
    }

    pub fn instances_mut(&mut self) -> impl Iterator<Item = &mut FieldInstance> {
        self.nodes_mut().flat_map(|n| n.body.instances_mut())
    }

    pub fn node(&self, id: FieldId) -> Option<&FieldNode> {
        self.nodes().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: FieldId) -> Option<&mut FieldNode> {
        self.nodes_mut().find(|n| n.id == id)
    }

    /// First node declared under `name`.
    pub fn node_by_name(&self, name: &str) -> Option<&FieldNode> {
        self.nodes().find(|n| n.name() == name)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&FieldInstance> {
        self.instances().find(|i| i.id == id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut FieldInstance> {
        self.instances_mut().find(|i| i.id == id)
    }

    /// Give every focusable instance a 1-based tab index in tree order.
    pub fn recompute_tab_order(&mut self) {
        let mut next = 1;
        for instance in self.instances_mut() {
            instance.tab_index = if instance.widget.is_focusable() {
                next += 1;
                Some(next - 1)
            } else {
                None
            };
        }
    }

    /// Instance holding a given tab index.
    pub fn instance_at_tab(&self, tab_index: u32) -> Option<&FieldInstance> {
        self.instances().find(|i| i.tab_index == Some(tab_index))
    }
}

/// An ordered group of field nodes.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: Option<String>,
    /// False for metadata-only sections, which get no grouping wrapper.
    pub grouped: bool,
    pub fields: Vec<FieldNode>,
    /// Collapsed by the read-only projection.
    pub read_only_hidden: bool,
}

/// One declared field and everything rendered for it.
#[derive(Debug, Clone)]
pub struct FieldNode {
    pub id: FieldId,
    pub definition: Arc<FieldDefinition>,
    pub kind: FieldKind,
    /// Shared by every instance of the node.
    pub rule: Option<Arc<ValidationRule>>,
    pub body: FieldBody,
    /// Collapsed by the read-only projection.
    pub read_only_hidden: bool,
}

impl FieldNode {
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self.body, FieldBody::Repeated(_))
    }
}

/// A single instance, or a repeatable group of siblings.
#[derive(Debug, Clone)]
pub enum FieldBody {
    Single(FieldInstance),
    Repeated(RepeatGroup),
}

impl FieldBody {
    pub fn instances(&self) -> &[FieldInstance] {
        match self {
            FieldBody::Single(instance) => std::slice::from_ref(instance),
            FieldBody::Repeated(group) => &group.instances,
        }
    }

    pub fn instances_mut(&mut self) -> &mut [FieldInstance] {
        match self {
            FieldBody::Single(instance) => std::slice::from_mut(instance),
            FieldBody::Repeated(group) => &mut group.instances,
        }
    }
}

/// Siblings sharing one repeatable definition, plus the messages of removed
/// siblings that are still fading out.
#[derive(Debug, Clone, Default)]
pub struct RepeatGroup {
    pub instances: Vec<FieldInstance>,
    pub leaving: Vec<ErrorMessage>,
    /// Collapsed by the read-only projection.
    pub read_only_hidden: bool,
}

/// Label state driven by focus and validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelState {
    pub focused: bool,
    pub errored: bool,
}

/// Mutations applied by the read-only projection, tracked so they can be
/// reversed exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Disabled and styled read-only.
    pub read_only: bool,
    /// Suppressed because it never received data.
    pub hidden: bool,
    /// Radio options hidden because they are not the checked one.
    pub hidden_options: Vec<usize>,
    /// Checkbox or radio group hidden because nothing in it is selected.
    pub hidden_unselected: bool,
    /// Tap-to-call/tap-to-email target.
    pub contact: Option<String>,
    /// Empty date/time control blanked so no placeholder shows.
    pub blanked: bool,
}

impl Presentation {
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    /// Visible in the projection at all.
    pub fn is_visible(&self) -> bool {
        !self.hidden && !self.hidden_unselected
    }
}

/// The live realization of a field definition.
#[derive(Debug, Clone)]
pub struct FieldInstance {
    pub id: InstanceId,
    pub definition: Arc<FieldDefinition>,
    pub kind: FieldKind,
    pub widget: Widget,
    pub validator: Option<Arc<ValidationRule>>,
    pub errored: bool,
    pub message: Option<ErrorMessage>,
    /// Sequence number of the last evaluation that wrote `message`.
    pub message_seq: u64,
    pub label: LabelState,
    /// Received population data.
    pub populated: bool,
    pub tab_index: Option<u32>,
    /// Clones carry a remove affordance; the first instance never does.
    pub removable: bool,
    pub presentation: Presentation,
}

impl FieldInstance {
    pub fn new(id: InstanceId, definition: Arc<FieldDefinition>, kind: FieldKind, widget: Widget) -> Self {
        Self {
            id,
            definition,
            kind,
            widget,
            validator: None,
            errored: false,
            message: None,
            message_seq: 0,
            label: LabelState::default(),
            populated: false,
            tab_index: None,
            removable: false,
            presentation: Presentation::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn value(&self) -> String {
        self.widget.validation_value()
    }

    /// Required and currently empty.
    pub fn is_missing(&self) -> bool {
        self.kind != FieldKind::Link && self.definition.is_required() && self.value().is_empty()
    }

    /// Flip the error flag along with every style that mirrors it.
    pub fn set_errored(&mut self, errored: bool) {
        self.errored = errored;
        self.label.errored = errored;
        self.widget.set_picker_errored(errored);
    }

    /// Text of the message currently shown (not on its way out).
    pub fn shown_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| !m.is_leaving())
            .map(|m| m.text.as_str())
    }
}
