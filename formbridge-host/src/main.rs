//! Reference host shell.
//!
//! Embeds the form engine behind the event bridge. Commands are read from
//! stdin as JSON lines; events and replies are written to stdout as JSON
//! lines (or event URLs with `--urls`). Logs go to a file so stdout stays
//! reserved for the protocol.

mod error;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use formbridge::bridge::{ChannelSink, EventSink, Outbound};
use formbridge::host::HostProfile;
use formbridge::{Bridge, Command, EngineConfig, FormParams};
use log::{debug, info, warn};
use serde_json::Value;
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::error::HostError;

#[derive(Parser, Debug)]
#[command(name = "formbridge-host", about = "Drive a form engine over JSON lines")]
struct Args {
    /// Path to the form schema (JSON)
    schema: PathBuf,
    /// Path to population data (JSON)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Path to an engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Form identity override
    #[arg(long)]
    form_id: Option<String>,
    /// Log file path
    #[arg(long, default_value = "formbridge-host.log")]
    log_file: PathBuf,
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
    /// Project the form read-only after population
    #[arg(long)]
    read_only: bool,
    /// User agent used to detect the host platform
    #[arg(long)]
    user_agent: Option<String>,
    /// Write events as event URLs instead of JSON
    #[arg(long)]
    urls: bool,
    /// Wait for an explicit init command instead of initializing at startup
    #[arg(long)]
    manual_init: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), HostError> {
    let log_file = File::create(&args.log_file)?;
    WriteLogger::init(args.log_level, Config::default(), log_file)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(user_agent) = &args.user_agent {
        config.host.platform = HostProfile::from_user_agent(user_agent).platform;
    }

    let params = FormParams {
        form_id: args.form_id.clone(),
        read_only: args.read_only,
        json_form: Some(read_json(&args.schema)?),
        json_populate_data: args.data.as_deref().map(read_json).transpose()?,
        is_mobile: args.urls,
    };

    let (sink, rx) = ChannelSink::new();
    let mut replies = sink.clone();
    let writer = tokio::spawn(write_outbound(rx, params.is_mobile));

    let mut bridge = Bridge::new(params, config, Box::new(sink)).with_success_callback(Box::new(
        |snapshot: &Value| info!("Form accepted: {}", snapshot),
    ));

    if !args.manual_init {
        dispatch(&mut bridge, &mut replies, Command::Init);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(line) {
            Ok(command) => dispatch(&mut bridge, &mut replies, command),
            Err(e) => warn!("Ignoring malformed command `{}`: {}", line, e),
        }
        if let Some(engine) = bridge.engine_mut() {
            engine.tick(Instant::now());
        }
    }

    debug!("stdin closed, shutting down");
    drop(bridge);
    drop(replies);
    if let Err(e) = writer.await {
        warn!("Writer task failed: {}", e);
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, HostError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn dispatch(bridge: &mut Bridge, replies: &mut ChannelSink, command: Command) {
    let name = command.name();
    match bridge.dispatch(command) {
        Ok(Some(reply)) => replies.reply(&reply),
        Ok(None) => debug!("`{}` queued until init", name),
        Err(e) => warn!("`{}` failed: {}", name, e),
    }
}

async fn write_outbound(mut rx: mpsc::UnboundedReceiver<Outbound>, urls: bool) {
    while let Some(outbound) = rx.recv().await {
        match (&outbound, urls) {
            (Outbound::Event(event), true) => println!("{}", event.to_url()),
            _ => match serde_json::to_string(&outbound) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Cannot encode outbound message: {}", e),
            },
        }
    }
}
