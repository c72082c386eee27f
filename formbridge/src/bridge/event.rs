//! Outbound events and the sinks that carry them.

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use url::Url;

use super::command::Reply;

/// URL scheme of event URLs.
pub const EVENT_SCHEME: &str = "mobileforms";
/// URL host of event URLs.
pub const EVENT_HOST: &str = "event";

/// What happened, as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Submit,
    SubmitInvalid,
    FocusIn,
    FocusOut,
    Change,
    ValidateError,
    Link,
    Other,
}

impl EventKind {
    /// Type tag on the wire. Both submit outcomes share `submit` and are
    /// told apart by the value.
    pub fn wire(self) -> &'static str {
        match self {
            Self::Submit | Self::SubmitInvalid => "submit",
            Self::FocusIn => "focus",
            Self::FocusOut => "focusout",
            Self::Change => "change",
            Self::ValidateError => "validateerror",
            Self::Link => "link",
            Self::Other => "other",
        }
    }

    /// Host-side mapping from a wire type and value.
    pub fn classify(wire: &str, value: &str) -> Self {
        match (wire, value) {
            ("submit", "valid") => Self::Submit,
            ("submit", "invalid") => Self::SubmitInvalid,
            ("focus", _) => Self::FocusIn,
            ("focusout", _) => Self::FocusOut,
            ("change", _) => Self::Change,
            ("validateerror", _) => Self::ValidateError,
            ("link", _) => Self::Link,
            _ => Self::Other,
        }
    }
}

/// One outbound occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub element: String,
    pub value: String,
}

impl FormEvent {
    pub fn new(kind: EventKind, element: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            element: element.into(),
            value: value.into(),
        }
    }

    /// `mobileforms://event/?type=..&element=..&value=..`
    pub fn to_url(&self) -> String {
        format!(
            "{}://{}/?type={}&element={}&value={}",
            EVENT_SCHEME,
            EVENT_HOST,
            urlencoding::encode(self.kind.wire()),
            urlencoding::encode(&self.element),
            urlencoding::encode(&self.value),
        )
    }

    /// Parse an event URL. Anything that is not an event URL yields `None`.
    pub fn from_url(text: &str) -> Option<Self> {
        let url = Url::parse(text).ok()?;
        if url.scheme() != EVENT_SCHEME || url.host_str() != Some(EVENT_HOST) {
            return None;
        }
        let (mut wire, mut element, mut value) = (None, String::new(), String::new());
        for (key, v) in url.query_pairs() {
            match key.as_ref() {
                "type" => wire = Some(v.into_owned()),
                "element" => element = v.into_owned(),
                "value" => value = v.into_owned(),
                _ => {}
            }
        }
        let kind = EventKind::classify(&wire?, &value);
        Some(Self {
            kind,
            element,
            value,
        })
    }
}

/// Anything the host receives: events, and replies that have no caller to
/// return to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum Outbound {
    Event(FormEvent),
    Reply(Reply),
}

/// The host-facing side of the bridge. Delivery is fire-and-forget.
pub trait EventSink: Send {
    fn emit(&mut self, event: &FormEvent);

    /// Replies to commands replayed after initialization.
    fn reply(&mut self, _reply: &Reply) {}
}

/// Forwards everything over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, outbound: Outbound) {
        if self.tx.send(outbound).is_err() {
            debug!("Host channel closed; outbound message dropped");
        }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &FormEvent) {
        self.send(Outbound::Event(event.clone()));
    }

    fn reply(&mut self, reply: &Reply) {
        self.send(Outbound::Reply(reply.clone()));
    }
}

/// Hands each event to a closure as an encoded event URL, the way
/// navigation-intercepting hosts receive them.
pub struct UrlSink<F> {
    deliver: F,
}

impl<F: FnMut(String) + Send> UrlSink<F> {
    pub fn new(deliver: F) -> Self {
        Self { deliver }
    }
}

impl<F: FnMut(String) + Send> EventSink for UrlSink<F> {
    fn emit(&mut self, event: &FormEvent) {
        (self.deliver)(event.to_url());
    }
}

/// Calls a closure with each event.
pub struct FnSink<F> {
    callback: F,
}

impl<F: FnMut(&FormEvent) + Send> FnSink<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&FormEvent) + Send> EventSink for FnSink<F> {
    fn emit(&mut self, event: &FormEvent) {
        (self.callback)(event);
    }
}

/// Logs events and drops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &FormEvent) {
        debug!(
            "event {} element={} value={}",
            event.kind.wire(),
            event.element,
            event.value
        );
    }

    fn reply(&mut self, reply: &Reply) {
        debug!("reply {:?}", reply);
    }
}
