mod channel;
mod config;

use anyhow::{anyhow, Result};
use clap::Parser;
use config::AppConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use voxgate_bridge::engines::{NoOpEngine, ScriptedConfig, ScriptedEngine};
use voxgate_bridge::{RecognizerEngine, RecognizerEvent, SessionBridge};
use voxgate_foundation::locale::{
    parse_locale_tag, AmbientLocaleProvider, FixedLocaleProvider, SystemLocaleProvider,
};

#[derive(Parser, Debug)]
#[command(
    name = "voxgate",
    about = "Speech recognition session bridge over a stdio JSON-lines channel"
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "VOXGATE_CONFIG")]
    config: Option<String>,

    /// Recognizer engine to wire ("noop" or "scripted").
    #[arg(long)]
    engine: Option<String>,
}

fn init_logging() -> Result<()> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "voxgate.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        // stdout carries the protocol channel; logs go everywhere else.
        .with_writer(std::io::stderr.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(guard);
    Ok(())
}

/// Demo recognition run replayed by the scripted engine on every listen.
fn demo_script() -> Vec<RecognizerEvent> {
    vec![
        RecognizerEvent::ReadyForSpeech,
        RecognizerEvent::BeginningOfSpeech,
        RecognizerEvent::PartialResults {
            candidates: vec!["hello".to_string()],
        },
        RecognizerEvent::PartialResults {
            candidates: vec!["hello world".to_string()],
        },
        RecognizerEvent::Results {
            candidates: vec!["hello world".to_string()],
        },
        RecognizerEvent::EndOfSpeech,
    ]
}

fn build_engine(
    kind: &str,
    engine_tx: mpsc::Sender<RecognizerEvent>,
) -> Result<Box<dyn RecognizerEngine>> {
    match kind {
        "noop" => Ok(Box::new(NoOpEngine::new())),
        "scripted" => Ok(Box::new(ScriptedEngine::new(
            ScriptedConfig {
                script: demo_script(),
                event_gap_ms: 150,
                fail_start: None,
            },
            engine_tx,
        ))),
        other => Err(anyhow!("unknown engine '{other}' (expected noop or scripted)")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    tracing::info!("starting voxgate bridge");

    let mut app_config = AppConfig::load(cli.config.as_deref())?;
    if let Some(engine) = cli.engine {
        app_config.engine = engine;
    }

    let (engine_tx, engine_rx) = mpsc::channel(app_config.channel_capacity);
    let (event_tx, event_rx) = mpsc::channel(app_config.channel_capacity);

    let engine = build_engine(&app_config.engine, engine_tx.clone())?;
    tracing::info!("recognizer engine: {}", engine.info().name);

    let ambient: Arc<dyn AmbientLocaleProvider> = match &app_config.locale {
        Some(tag) => Arc::new(FixedLocaleProvider::new(parse_locale_tag(tag))),
        None => Arc::new(SystemLocaleProvider::new()),
    };

    let bridge = SessionBridge::new(engine, ambient, event_tx);
    let pump = bridge.spawn_event_pump(engine_rx);

    channel::run(bridge, event_rx).await?;

    // Held open so the pump survives engines that drop their sender.
    drop(engine_tx);
    pump.abort();
    tracing::info!("voxgate bridge stopped");
    Ok(())
}
