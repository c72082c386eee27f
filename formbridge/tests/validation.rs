//! Tests for field validation driven through the engine.

use std::time::{Duration, Instant};

use formbridge::bridge::{ChannelSink, EventKind, FormEvent, Outbound};
use formbridge::form::InstanceId;
use formbridge::schema::FormDefinition;
use formbridge::validation::Key;
use formbridge::{EngineConfig, FormEngine};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

fn engine(fields: Value) -> (FormEngine, UnboundedReceiver<Outbound>) {
    let definition = FormDefinition::from_value(json!({
        "id": "profile",
        "fields": {"submit": "Save", "sections": [{"fields": fields}]}
    }))
    .unwrap();
    let (sink, rx) = ChannelSink::new();
    let engine = FormEngine::new(&definition, "profile", EngineConfig::default(), Box::new(sink));
    (engine, rx)
}

fn events(rx: &mut UnboundedReceiver<Outbound>) -> Vec<FormEvent> {
    let mut events = Vec::new();
    while let Ok(outbound) = rx.try_recv() {
        if let Outbound::Event(event) = outbound {
            events.push(event);
        }
    }
    events
}

/// Focus, type, and leave the field.
fn commit(engine: &mut FormEngine, id: InstanceId, value: &str) {
    engine.focus(id).unwrap();
    engine.input(id, value).unwrap();
    engine.blur();
}

fn button_disabled(engine: &FormEngine) -> bool {
    engine.form().submit.as_ref().unwrap().disabled
}

// =============================================================================
// Required fields
// =============================================================================

#[test]
fn test_required_empty_field_means_errors_exist() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "name"},
        {"type": "email", "name": "email", "required": "true"}
    ]));
    assert!(engine.errors_exist());
    assert!(button_disabled(&engine));

    let name = engine.instance_id("name").unwrap();
    commit(&mut engine, name, "Ann");
    assert!(engine.errors_exist());

    let email = engine.instance_id("email").unwrap();
    commit(&mut engine, email, "ann@example.com");
    assert!(!engine.errors_exist());
    assert!(!button_disabled(&engine));
}

#[test]
fn test_required_errors_report() {
    let (mut engine, _rx) = engine(json!([
        {"type": "email", "name": "email", "required": "true"}
    ]));
    let errors = serde_json::to_value(engine.form_errors()).unwrap();
    assert_eq!(
        errors,
        json!({"requiredErrors": ["email"], "validationErrors": null})
    );
}

#[test]
fn test_missing_does_not_flag_field() {
    let (mut engine, mut rx) = engine(json!([
        {"type": "text", "name": "name", "required": true, "error": "Needed"}
    ]));
    let id = engine.instance_id("name").unwrap();
    commit(&mut engine, id, "");

    let instance = engine.form().instance(id).unwrap();
    assert!(!instance.errored);
    assert!(instance.message.is_none());
    assert!(
        events(&mut rx)
            .iter()
            .all(|e| e.kind != EventKind::ValidateError)
    );
}

// =============================================================================
// Patterns
// =============================================================================

#[test]
fn test_filter_error_sets_then_clears() {
    let (mut engine, mut rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[A-Z]{3}", "error": "Three capitals"}
    ]));
    let id = engine.instance_id("code").unwrap();

    commit(&mut engine, id, "ab");
    let instance = engine.form().instance(id).unwrap();
    assert!(instance.errored);
    assert!(instance.label.errored);
    assert_eq!(instance.shown_message(), Some("Three capitals"));
    assert!(button_disabled(&engine));

    let emitted = events(&mut rx);
    assert_eq!(
        emitted,
        vec![
            FormEvent::new(EventKind::FocusIn, "code", ""),
            FormEvent::new(EventKind::FocusOut, "code", "ab"),
            FormEvent::new(EventKind::ValidateError, "code", "ab"),
        ]
    );

    let errors = engine.form_errors();
    let failures = errors.validation_errors.unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].element, "code");
    assert_eq!(failures[0].message, "Three capitals");

    commit(&mut engine, id, "ABC");
    let instance = engine.form().instance(id).unwrap();
    assert!(!instance.errored);
    assert!(!instance.label.errored);
    assert_eq!(instance.shown_message(), None);
    assert!(instance.message.as_ref().unwrap().is_leaving());
    assert!(engine.form_errors().is_empty());
    assert!(!button_disabled(&engine));
}

#[test]
fn test_emptying_field_clears_error() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[0-9]+", "error": "Digits"}
    ]));
    let id = engine.instance_id("code").unwrap();
    commit(&mut engine, id, "x");
    assert!(engine.form().instance(id).unwrap().errored);

    engine.input(id, "").unwrap();
    engine.key(id, Key::Backspace).unwrap();
    assert!(!engine.form().instance(id).unwrap().errored);
}

#[test]
fn test_typing_does_not_evaluate() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[0-9]+"}
    ]));
    let id = engine.instance_id("code").unwrap();
    engine.input(id, "x").unwrap();
    engine.key(id, Key::Char('x')).unwrap();
    engine.key(id, Key::Backspace).unwrap();
    assert!(!engine.form().instance(id).unwrap().errored);

    engine.key(id, Key::Tab).unwrap();
    assert!(engine.form().instance(id).unwrap().errored);
}

#[test]
fn test_invalid_pattern_is_ignored() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "([a-z", "required": true}
    ]));
    let id = engine.instance_id("code").unwrap();
    commit(&mut engine, id, "anything");
    assert!(!engine.form().instance(id).unwrap().errored);
    assert!(!engine.errors_exist());
}

// =============================================================================
// Bounds
// =============================================================================

#[test]
fn test_numeric_bounds() {
    let (mut engine, _rx) = engine(json!([
        {"type": "number", "name": "qty", "min": 5, "max": "10", "error": "5 to 10"}
    ]));
    let id = engine.instance_id("qty").unwrap();

    for (value, errored) in [("4", true), ("5", false), ("10", false), ("11", true), ("7", false)] {
        engine.input(id, value).unwrap();
        engine.key(id, Key::Tab).unwrap();
        assert_eq!(
            engine.form().instance(id).unwrap().errored,
            errored,
            "value {}",
            value
        );
    }
}

#[test]
fn test_time_bounds() {
    let (mut engine, _rx) = engine(json!([
        {"type": "time", "name": "at", "min": "09:00", "max": "17:30"}
    ]));
    let id = engine.instance_id("at").unwrap();

    for (value, errored) in [("08:59", true), ("09:00", false), ("17:31", true), ("24:00", true)] {
        engine.input(id, value).unwrap();
        engine.key(id, Key::Tab).unwrap();
        assert_eq!(
            engine.form().instance(id).unwrap().errored,
            errored,
            "value {}",
            value
        );
    }
}

#[test]
fn test_native_date_is_checked_for_calendar_validity() {
    let (mut engine, _rx) = engine(json!([{"type": "date", "name": "day"}]));
    let id = engine.instance_id("day").unwrap();
    engine.populate(&json!({"day": "2023-02-29"}));
    assert!(!engine.is_form_valid());

    engine.populate(&json!({"day": "2024-02-29"}));
    assert!(engine.is_form_valid());
    assert!(!engine.form().instance(id).unwrap().errored);
}

// =============================================================================
// Message transitions
// =============================================================================

#[test]
fn test_message_fades_in_then_out() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[0-9]+", "error": "Digits"}
    ]));
    let id = engine.instance_id("code").unwrap();
    let later = || Instant::now() + Duration::from_secs(5);

    commit(&mut engine, id, "x");
    assert!(engine.message_opacity(id, Instant::now()).unwrap() < 1.0);
    assert_eq!(engine.tick(later()), 0);
    assert_eq!(engine.message_opacity(id, later()), Some(1.0));

    commit(&mut engine, id, "1");
    assert_eq!(engine.tick(later()), 1);
    assert!(engine.form().instance(id).unwrap().message.is_none());
}

#[test]
fn test_late_fade_out_does_not_undo_newer_error() {
    let (mut engine, _rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[0-9]+", "error": "Digits"}
    ]));
    let id = engine.instance_id("code").unwrap();

    commit(&mut engine, id, "x");
    commit(&mut engine, id, "1");
    commit(&mut engine, id, "y");

    let later = Instant::now() + Duration::from_secs(5);
    assert_eq!(engine.tick(later), 0);
    let instance = engine.form().instance(id).unwrap();
    assert!(instance.errored);
    assert_eq!(instance.shown_message(), Some("Digits"));
}

#[test]
fn test_repeated_evaluation_keeps_single_message() {
    let (mut engine, mut rx) = engine(json!([
        {"type": "text", "name": "code", "filter": "[0-9]+", "error": "Digits"}
    ]));
    let id = engine.instance_id("code").unwrap();
    commit(&mut engine, id, "x");
    engine.key(id, Key::Tab).unwrap();
    engine.key(id, Key::Tab).unwrap();

    let validate_errors = events(&mut rx)
        .into_iter()
        .filter(|e| e.kind == EventKind::ValidateError)
        .count();
    assert_eq!(validate_errors, 3);
    assert_eq!(engine.form_errors().validation_errors.unwrap().len(), 1);
}
