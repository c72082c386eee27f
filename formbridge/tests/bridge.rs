//! Tests for the host command bridge.

use std::sync::{Arc, Mutex};

use formbridge::bridge::{Command, EventKind, FormEvent, Outbound, Reply, UrlSink};
use formbridge::error::{FormError, HostProtocolError};
use formbridge::{Bridge, ChannelSink, EngineConfig, FormParams, UiEvent};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

fn schema() -> Value {
    json!({
        "id": "survey",
        "fields": {"submit": "Send", "sections": [{"fields": [
            {"type": "text", "name": "name", "required": true},
            {"type": "text", "name": "city"}
        ]}]}
    })
}

fn new_bridge(params: FormParams) -> (Bridge, UnboundedReceiver<Outbound>) {
    let (sink, rx) = ChannelSink::new();
    (Bridge::new(params, EngineConfig::default(), Box::new(sink)), rx)
}

fn with_form() -> FormParams {
    FormParams {
        json_form: Some(schema()),
        ..Default::default()
    }
}

fn drain(rx: &mut UnboundedReceiver<Outbound>) -> Vec<Outbound> {
    let mut outbound = Vec::new();
    while let Ok(message) = rx.try_recv() {
        outbound.push(message);
    }
    outbound
}

// =============================================================================
// Queueing
// =============================================================================

#[test]
fn test_commands_before_init_are_queued_and_replayed_once() {
    let (mut bridge, mut rx) = new_bridge(FormParams::default());

    assert!(bridge.dispatch(Command::GetFormData).unwrap().is_none());
    assert!(bridge.dispatch(Command::IsFormValid).unwrap().is_none());
    assert_eq!(bridge.pending(), 2);
    assert!(!bridge.is_initialized());

    let form = Value::String(schema().to_string());
    assert_eq!(bridge.dispatch(Command::SetJsonForm(form)).unwrap(), Some(Reply::Done));
    assert_eq!(bridge.dispatch(Command::Init).unwrap(), Some(Reply::Done));
    assert_eq!(bridge.pending(), 0);

    assert_eq!(
        drain(&mut rx),
        vec![
            Outbound::Reply(Reply::FormData(json!({"name": "", "city": ""}))),
            Outbound::Reply(Reply::Valid(false)),
        ]
    );

    assert_eq!(
        bridge.dispatch(Command::GetFormData).unwrap(),
        Some(Reply::FormData(json!({"name": "", "city": ""})))
    );
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_init_without_form_fails() {
    let (mut bridge, _rx) = new_bridge(FormParams::default());
    assert!(matches!(
        bridge.dispatch(Command::Init),
        Err(FormError::Protocol(HostProtocolError::NoForm))
    ));
    assert!(!bridge.is_initialized());
}

#[test]
fn test_init_populates_then_projects() {
    let (mut bridge, _rx) = new_bridge(FormParams {
        read_only: true,
        json_populate_data: Some(json!({"name": "Ann"})),
        ..with_form()
    });
    bridge.dispatch(Command::Init).unwrap();
    let engine = bridge.engine().unwrap();
    assert!(engine.form().read_only);
    assert_eq!(engine.form_data()["name"], json!("Ann"));
}

#[test]
fn test_read_only_without_data_is_skipped() {
    let (mut bridge, _rx) = new_bridge(FormParams {
        read_only: true,
        json_populate_data: Some(json!("JSON_POPULATE_DATA")),
        ..with_form()
    });
    bridge.dispatch(Command::Init).unwrap();
    assert!(!bridge.engine().unwrap().form().read_only);
}

#[test]
fn test_form_id_resolution() {
    let (mut bridge, _rx) = new_bridge(with_form());
    bridge.dispatch(Command::Init).unwrap();
    assert_eq!(bridge.engine().unwrap().form().id, "survey");

    let (mut bridge, _rx) = new_bridge(FormParams {
        form_id: Some("embedded".to_string()),
        ..with_form()
    });
    bridge.dispatch(Command::Init).unwrap();
    assert_eq!(bridge.engine().unwrap().form().id, "embedded");
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_json_commands() {
    let (mut bridge, _rx) = new_bridge(with_form());
    bridge.dispatch_json(r#"{"command": "init"}"#).unwrap();

    let name = bridge.engine().unwrap().instance_id("name").unwrap();
    let input = format!(
        r#"{{"command": "ui", "args": {{"event": "input", "target": {}, "value": "Ann"}}}}"#,
        name.0
    );
    assert_eq!(bridge.dispatch_json(&input).unwrap(), Some(Reply::Done));
    assert_eq!(
        bridge.dispatch_json(r#"{"command": "isFormValid"}"#).unwrap(),
        Some(Reply::Valid(true))
    );

    let errors = bridge.dispatch_json(r#"{"command": "getFormErrors"}"#).unwrap();
    let Some(Reply::FormErrors(errors)) = errors else {
        panic!("expected form errors, got {:?}", errors);
    };
    assert!(errors.is_empty());
}

#[test]
fn test_invalid_command_text() {
    let (mut bridge, _rx) = new_bridge(with_form());
    assert!(matches!(
        bridge.dispatch_json(r#"{"command": "launchRockets"}"#),
        Err(FormError::Protocol(HostProtocolError::InvalidCommand(_)))
    ));
}

#[test]
fn test_set_read_only_flag_forms() {
    let (mut bridge, _rx) = new_bridge(FormParams {
        json_populate_data: Some(json!({"name": "Ann"})),
        ..with_form()
    });
    bridge.dispatch(Command::Init).unwrap();

    bridge.dispatch(Command::SetReadOnly(json!("True"))).unwrap();
    assert!(bridge.engine().unwrap().form().read_only);
    bridge.dispatch(Command::SetReadOnly(json!("no"))).unwrap();
    assert!(!bridge.engine().unwrap().form().read_only);
    bridge.dispatch(Command::SetReadOnly(json!(true))).unwrap();
    assert!(bridge.engine().unwrap().form().read_only);
}

#[test]
fn test_validated_snapshot_through_bridge() {
    let (bridge, mut rx) = new_bridge(with_form());
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let mut bridge = bridge.with_success_callback(Box::new(move |data: &Value| {
        seen.lock().unwrap().push(data.clone())
    }));
    bridge.dispatch(Command::Init).unwrap();
    assert_eq!(
        bridge.dispatch(Command::GetFormDataValidated).unwrap(),
        Some(Reply::Validated(None))
    );

    let name = bridge.engine().unwrap().instance_id("name").unwrap();
    bridge
        .dispatch(Command::Ui(UiEvent::Input {
            target: name,
            value: "Ann".to_string(),
        }))
        .unwrap();
    bridge.dispatch(Command::Ui(UiEvent::Submit)).unwrap();

    let snapshot = json!({"name": "Ann", "city": ""});
    assert_eq!(calls.lock().unwrap().as_slice(), &[snapshot.clone()]);
    assert_eq!(
        bridge.dispatch(Command::GetFormDataValidated).unwrap(),
        Some(Reply::Validated(Some(snapshot)))
    );
    assert!(drain(&mut rx).contains(&Outbound::Event(FormEvent::new(
        EventKind::Submit,
        "survey",
        "valid"
    ))));
}

#[test]
fn test_reinit_keeps_sink() {
    let (mut bridge, mut rx) = new_bridge(with_form());
    bridge.dispatch(Command::Init).unwrap();
    bridge.dispatch(Command::Init).unwrap();

    let name = bridge.engine().unwrap().instance_id("name").unwrap();
    bridge.dispatch(Command::Ui(UiEvent::Focus { target: name })).unwrap();
    assert_eq!(
        drain(&mut rx),
        vec![Outbound::Event(FormEvent::new(EventKind::FocusIn, "name", ""))]
    );
}

// =============================================================================
// Event delivery
// =============================================================================

#[test]
fn test_url_sink_delivers_event_urls() {
    let urls = Arc::new(Mutex::new(Vec::new()));
    let delivered = Arc::clone(&urls);
    let sink = UrlSink::new(move |url: String| delivered.lock().unwrap().push(url));
    let mut bridge = Bridge::new(with_form(), EngineConfig::default(), Box::new(sink));
    bridge.dispatch(Command::Init).unwrap();

    bridge.dispatch(Command::Ui(UiEvent::Submit)).unwrap();
    let urls = urls.lock().unwrap();
    assert_eq!(
        urls.as_slice(),
        &["mobileforms://event/?type=submit&element=survey&value=invalid".to_string()]
    );
    let event = FormEvent::from_url(&urls[0]).unwrap();
    assert_eq!(event.kind, EventKind::SubmitInvalid);
}

#[tokio::test]
async fn test_channel_sink_delivers_in_order() {
    let (mut bridge, mut rx) = new_bridge(with_form());
    bridge.dispatch(Command::Init).unwrap();
    let city = bridge.engine().unwrap().instance_id("city").unwrap();

    bridge.dispatch(Command::Ui(UiEvent::Focus { target: city })).unwrap();
    bridge
        .dispatch(Command::Ui(UiEvent::Input {
            target: city,
            value: "Oslo".to_string(),
        }))
        .unwrap();
    bridge.dispatch(Command::Ui(UiEvent::Change { target: city })).unwrap();
    bridge.dispatch(Command::Ui(UiEvent::Blur)).unwrap();
    drop(bridge);

    let mut received = Vec::new();
    while let Some(Outbound::Event(event)) = rx.recv().await {
        received.push((event.kind, event.value));
    }
    assert_eq!(
        received,
        vec![
            (EventKind::FocusIn, String::new()),
            (EventKind::Change, "Oslo".to_string()),
            (EventKind::FocusOut, "Oslo".to_string()),
        ]
    );
}
