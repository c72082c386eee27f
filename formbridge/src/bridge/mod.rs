//! Event bridge between the engine and its host.
//!
//! Commands issued before `init` are queued in order and replayed exactly
//! once right after initialization. Outbound events are fire-and-forget.

mod command;
mod event;

pub use command::{Command, Reply, json_argument, read_only_flag};
pub use event::{
    ChannelSink, EVENT_HOST, EVENT_SCHEME, EventKind, EventSink, FnSink, FormEvent, LogSink,
    Outbound, UrlSink,
};

use std::collections::VecDeque;

use log::{debug, warn};

use crate::config::{EngineConfig, FormParams};
use crate::engine::{FormEngine, SubmitOutcome, SuccessCallback};
use crate::error::{FormError, HostProtocolError};
use crate::render::FieldRenderer;
use crate::schema::FormDefinition;

/// Owns the engine once it exists, and the commands waiting for it.
pub struct Bridge {
    params: FormParams,
    renderer: FieldRenderer,
    engine: Option<FormEngine>,
    pending: VecDeque<Command>,
    sink: Option<Box<dyn EventSink>>,
    on_success: Option<SuccessCallback>,
}

impl Bridge {
    pub fn new(params: FormParams, config: EngineConfig, sink: Box<dyn EventSink>) -> Self {
        Self::with_renderer(params, FieldRenderer::new(config), sink)
    }

    /// Build engines through a preconfigured renderer.
    pub fn with_renderer(params: FormParams, renderer: FieldRenderer, sink: Box<dyn EventSink>) -> Self {
        Self {
            params,
            renderer,
            engine: None,
            pending: VecDeque::new(),
            sink: Some(sink),
            on_success: None,
        }
    }

    pub fn with_success_callback(mut self, callback: SuccessCallback) -> Self {
        self.on_success = Some(callback);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Commands waiting for `init`.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn engine(&self) -> Option<&FormEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut FormEngine> {
        self.engine.as_mut()
    }

    /// Decode and dispatch a JSON command.
    pub fn dispatch_json(&mut self, text: &str) -> Result<Option<Reply>, FormError> {
        let command: Command =
            serde_json::from_str(text).map_err(HostProtocolError::InvalidCommand)?;
        self.dispatch(command)
    }

    /// Run a command now, or queue it until `init`. Queued commands return
    /// `Ok(None)`; their replies later go to the sink.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<Reply>, FormError> {
        match command {
            Command::SetJsonForm(form) => {
                self.params.json_form = Some(json_argument(form));
                Ok(Some(Reply::Done))
            }
            Command::SetJsonPopulateData(data) => {
                self.params.json_populate_data = Some(json_argument(data));
                Ok(Some(Reply::Done))
            }
            Command::Init => {
                self.init()?;
                Ok(Some(Reply::Done))
            }
            command => match self.engine.as_mut() {
                Some(engine) => execute(engine, command).map(Some),
                None => {
                    debug!(
                        "{}; queued",
                        HostProtocolError::NotInitialized {
                            command: command.name()
                        }
                    );
                    self.pending.push_back(command);
                    Ok(None)
                }
            },
        }
    }

    /// Build the engine, populate, project, then replay the queue.
    fn init(&mut self) -> Result<(), FormError> {
        let Some(json_form) = self.params.json_form.clone() else {
            warn!("{}", HostProtocolError::NoForm);
            return Err(HostProtocolError::NoForm.into());
        };
        let definition = FormDefinition::from_value(json_form)?;
        let form_id = definition
            .id
            .clone()
            .filter(|_| self.params.form_id.is_none())
            .unwrap_or_else(|| self.params.form_id().to_string());

        let (sink, on_success) = match self.engine.take() {
            Some(previous) => previous.into_parts(),
            None => (
                self.sink.take().unwrap_or_else(|| Box::new(LogSink)),
                self.on_success.take(),
            ),
        };
        let mut engine =
            FormEngine::with_renderer(&definition, &form_id, self.renderer.clone(), sink);
        engine.set_success_callback(on_success);

        if let Some(data) = &self.params.json_populate_data {
            engine.populate(data);
        }
        if self.params.read_only {
            if let Err(e) = engine.set_read_only(true) {
                warn!("Read-only mode not applied: {}", e);
            }
        }

        let replay: Vec<Command> = self.pending.drain(..).collect();
        if !replay.is_empty() {
            debug!("Replaying {} queued commands", replay.len());
        }
        for command in replay {
            let name = command.name();
            match execute(&mut engine, command) {
                Ok(reply) => engine.sink_mut().reply(&reply),
                Err(e) => warn!("Replayed `{}` failed: {}", name, e),
            }
        }

        self.engine = Some(engine);
        Ok(())
    }
}

fn execute(engine: &mut FormEngine, command: Command) -> Result<Reply, FormError> {
    let reply = match command {
        Command::PopulateWithData(data) => {
            engine.populate(&json_argument(data));
            Reply::Done
        }
        Command::SetReadOnly(flag) => {
            engine.set_read_only(read_only_flag(&flag))?;
            Reply::Done
        }
        Command::GetFormData => Reply::FormData(engine.form_data()),
        Command::GetFormErrors => Reply::FormErrors(engine.form_errors()),
        Command::IsFormValid => Reply::Valid(engine.is_form_valid()),
        Command::GetFormDataValidated => Reply::Validated(engine.validated_result().cloned()),
        Command::Ui(event) => match engine.handle(event)? {
            Some(SubmitOutcome::Posted(request)) => Reply::Posted(request),
            _ => Reply::Done,
        },
        Command::Init | Command::SetJsonForm(_) | Command::SetJsonPopulateData(_) => {
            return Ok(Reply::Done);
        }
    };
    Ok(reply)
}
