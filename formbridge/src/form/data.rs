//! Form data serialization and population.
//!
//! Names are read bracket-wise: `a` is a key, `a[]` appends to an array,
//! `a[k]` is a nested key and `a[][k]` fills an array of objects.

use log::{debug, warn};
use serde_json::{Map, Value};

use super::assemble::FormAssembler;
use super::state::set_button_state;
use super::tree::{FieldId, Form};
use crate::schema::REPEAT_SUFFIX;

/// What an unconfigured host passes instead of population data.
pub const POPULATE_PLACEHOLDER: &str = "JSON_POPULATE_DATA";

/// Current values as a JSON object: hidden params first, then every
/// submittable control in tree order.
pub fn serialize(form: &Form) -> Value {
    let mut root = Map::new();
    for (name, value) in &form.hidden {
        insert(&mut root, name, Value::String(value.clone()));
    }
    for instance in form.instances() {
        for (name, value) in instance.widget.entries(instance.name()) {
            insert(&mut root, &name, Value::String(value));
        }
    }
    Value::Object(root)
}

fn insert(root: &mut Map<String, Value>, name: &str, value: Value) {
    let (base, segments) = split_name(name);
    let slot = root.entry(base.to_string()).or_insert(Value::Null);
    assign(slot, &segments, value);
}

/// `a[][k]` → (`a`, [``, `k`]). Unbalanced brackets leave the name whole.
fn split_name(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('[') else {
        return (name, Vec::new());
    };
    if open == 0 || !name.ends_with(']') {
        return (name, Vec::new());
    }
    let segments: Vec<&str> = name[open + 1..name.len() - 1].split("][").collect();
    if segments.iter().any(|s| s.contains(['[', ']'])) {
        return (name, Vec::new());
    }
    (&name[..open], segments)
}

fn assign(slot: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };

    if head.is_empty() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        let Value::Array(items) = slot else {
            return;
        };
        let reuse_last = match rest.first() {
            Some(key) if !key.is_empty() => items
                .last()
                .and_then(Value::as_object)
                .is_some_and(|last| !last.contains_key(*key)),
            _ => false,
        };
        if !reuse_last {
            items.push(Value::Null);
        }
        if let Some(last) = items.last_mut() {
            assign(last, rest, value);
        }
    } else {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            assign(child, rest, value);
        }
    }
}

/// Write population data into the form.
///
/// Keys match a field's name with or without the repeat marker. Arrays fill
/// repeatable fields, adding siblings as needed. Every instance that
/// receives a datum is marked populated. No validation runs.
///
/// Returns the number of populated instances.
pub fn populate(form: &mut Form, data: &Value, assembler: &mut FormAssembler<'_>) -> usize {
    let entries = match data {
        Value::Object(entries) => entries,
        Value::String(s) if s == POPULATE_PLACEHOLDER => {
            debug!("Population placeholder ignored");
            return 0;
        }
        Value::Null => return 0,
        other => {
            warn!("Population data must be an object, got {}", other);
            return 0;
        }
    };

    let mut populated = 0;
    for (key, datum) in entries {
        let targets: Vec<FieldId> = form
            .nodes()
            .filter(|n| matches_key(n.name(), key))
            .map(|n| n.id)
            .collect();
        if targets.is_empty() {
            debug!("No field for population key `{}`", key);
        }
        for id in targets {
            populated += populate_node(form, id, datum, assembler);
        }
    }

    form.populated = true;
    set_button_state(form);
    populated
}

fn matches_key(name: &str, key: &str) -> bool {
    name == key || name.strip_suffix(REPEAT_SUFFIX) == Some(key)
}

fn populate_node(
    form: &mut Form,
    id: FieldId,
    datum: &Value,
    assembler: &mut FormAssembler<'_>,
) -> usize {
    let Some(node) = form.node(id) else {
        return 0;
    };
    let repeated = node.is_repeatable();

    let items: Vec<&Value> = match datum {
        Value::Array(items) if repeated => {
            let present = node.body.instances().len();
            for _ in present..items.len() {
                if let Err(e) = assembler.add(form, id) {
                    warn!("Cannot grow `{}` for population: {}", key_of(form, id), e);
                    break;
                }
            }
            items.iter().collect()
        }
        Value::Array(items) => items.first().into_iter().collect(),
        other => vec![other],
    };

    let Some(node) = form.node_mut(id) else {
        return 0;
    };
    let mut populated = 0;
    for (instance, item) in node.body.instances_mut().iter_mut().zip(items) {
        if instance.widget.set_value(item) {
            instance.populated = true;
            populated += 1;
        }
    }
    if node.is_repeatable() {
        debug!("Populated {} instances of `{}`", populated, node.name());
    }
    populated
}

fn key_of(form: &Form, id: FieldId) -> String {
    form.node(id)
        .map(|n| n.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
