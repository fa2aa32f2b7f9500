//! Session bridge: protocol commands in, normalized events out
//!
//! Owns the recognition session lifecycle. Commands execute on the
//! caller's task; raw engine events are consumed by a spawned pump task;
//! both paths serialize on the session mutex. Locks are never held
//! across an await.

use crate::engine::{ListenRequest, RecognizerEngine, RecognizerEvent};
use crate::protocol::{error_name, BridgeEvent, Command, CommandReply};
use crate::session::Session;
use crate::types::{BridgeMetrics, ListenConfig};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use voxgate_foundation::error::BridgeError;
use voxgate_foundation::locale::{parse_locale_tag, AmbientLocaleProvider};
use voxgate_foundation::state::SessionState;

const SEND_TIMEOUT_SECS: u64 = 5;

/// Sends bridge events and keeps the metrics ledger.
#[derive(Clone)]
struct EventEmitter {
    event_tx: mpsc::Sender<BridgeEvent>,
    metrics: Arc<RwLock<BridgeMetrics>>,
}

impl EventEmitter {
    fn new(event_tx: mpsc::Sender<BridgeEvent>, metrics: Arc<RwLock<BridgeMetrics>>) -> Self {
        Self { event_tx, metrics }
    }

    async fn emit(&self, event: BridgeEvent) {
        self.update_metrics(&event);
        self.log_event(&event);

        match tokio::time::timeout(
            Duration::from_secs(SEND_TIMEOUT_SECS),
            self.event_tx.send(event),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                debug!(target: "bridge", "event channel closed");
            }
            Err(_) => {
                warn!(
                    target: "bridge",
                    "event channel send timed out after {}s - consumer too slow", SEND_TIMEOUT_SECS
                );
            }
        }
    }

    fn update_metrics(&self, event: &BridgeEvent) {
        let mut metrics = self.metrics.write();
        metrics.events_out += 1;
        metrics.last_event_time = Some(Instant::now());
        match event {
            BridgeEvent::Speech(_) => metrics.partial_count += 1,
            BridgeEvent::RecognitionComplete(_) => metrics.final_count += 1,
            BridgeEvent::Error(_) => metrics.error_count += 1,
            _ => {}
        }
    }

    fn log_event(&self, event: &BridgeEvent) {
        match event {
            BridgeEvent::Speech(text) => info!(target: "bridge", "Partial: {}", text),
            BridgeEvent::RecognitionComplete(text) => info!(target: "bridge", "Complete: {}", text),
            BridgeEvent::Error(name) => error!(target: "bridge", "Error: {}", name),
            other => debug!(target: "bridge", "{}", other.name()),
        }
    }
}

/// Drives the session state machine and translates native recognition
/// callbacks into protocol events.
#[derive(Clone)]
pub struct SessionBridge {
    session: Arc<Mutex<Session>>,
    engine: Arc<tokio::sync::Mutex<Box<dyn RecognizerEngine>>>,
    ambient: Arc<dyn AmbientLocaleProvider>,
    emitter: EventEmitter,
    metrics: Arc<RwLock<BridgeMetrics>>,
}

impl SessionBridge {
    pub fn new(
        engine: Box<dyn RecognizerEngine>,
        ambient: Arc<dyn AmbientLocaleProvider>,
        event_tx: mpsc::Sender<BridgeEvent>,
    ) -> Self {
        let metrics = Arc::new(RwLock::new(BridgeMetrics::default()));
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            engine: Arc::new(tokio::sync::Mutex::new(engine)),
            ambient,
            emitter: EventEmitter::new(event_tx, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Current metrics snapshot.
    pub fn metrics(&self) -> BridgeMetrics {
        self.metrics.read().clone()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.session.lock().state()
    }

    /// Spawn the task that consumes raw engine events until the engine
    /// drops its sender.
    pub fn spawn_event_pump(&self, mut engine_rx: mpsc::Receiver<RecognizerEvent>) -> JoinHandle<()> {
        let bridge = self.clone();
        tokio::spawn(async move {
            debug!(target: "bridge", "engine event pump started");
            while let Some(event) = engine_rx.recv().await {
                bridge.handle_engine_event(event).await;
            }
            info!(target: "bridge", "engine event pump stopped: engine channel closed");
        })
    }

    /// Dispatch one protocol command and return its reply. Commands are
    /// fire-and-forget relative to recognition: they return on
    /// successful dispatch, never awaiting a terminal event.
    pub async fn dispatch(&self, command: Command) -> Result<CommandReply, BridgeError> {
        self.metrics.write().commands_in += 1;
        debug!(target: "bridge", "command: {}", command.method());
        match command {
            Command::Activate => self.activate().await,
            Command::Listen {
                locale,
                complete_delay_millis,
            } => self.listen(&locale, complete_delay_millis).await,
            Command::Cancel | Command::Stop => self.stop_listening().await,
        }
    }

    /// Idempotent capability check. Permission is assumed granted at
    /// install time, so this always succeeds and reports the ambient
    /// locale.
    async fn activate(&self) -> Result<CommandReply, BridgeError> {
        {
            let session = self.session.lock();
            if session.state() == SessionState::Uninitialized {
                session.machine.transition(SessionState::Ready)?;
            }
        }

        let locale = self.ambient.ambient_locale();
        self.emitter
            .emit(BridgeEvent::CurrentLocale(locale.to_string()))
            .await;
        Ok(CommandReply::Success(true))
    }

    /// Arm and start the native engine. The transition into `Listening`
    /// is driven by the engine's own readiness events, not by this call.
    async fn listen(
        &self,
        locale_tag: &str,
        complete_delay_millis: u64,
    ) -> Result<CommandReply, BridgeError> {
        let locale = parse_locale_tag(locale_tag);
        let request = ListenRequest::with_complete_delay(locale.clone(), complete_delay_millis);

        {
            let mut session = self.session.lock();
            let state = session.state();
            if state.is_active() {
                return Err(BridgeError::InvalidTransition {
                    from: state,
                    to: SessionState::Recognizing,
                });
            }
            session.arm(locale, ListenConfig {
                complete_delay_millis,
            });
        }

        self.engine.lock().await.start_listening(request).await?;
        self.session
            .lock()
            .machine
            .transition(SessionState::Recognizing)?;

        info!(
            target: "bridge",
            "listening armed (locale: {}, delay: {}ms)", locale_tag, complete_delay_millis
        );
        Ok(CommandReply::Success(true))
    }

    /// Stop the engine's active listening. `cancel` and `stop` both land
    /// here; no semantic distinction is exposed. Idempotent from any
    /// state.
    async fn stop_listening(&self) -> Result<CommandReply, BridgeError> {
        self.engine.lock().await.stop_listening().await?;

        {
            let session = self.session.lock();
            if session.state().is_active() {
                // Returning to Ready emits no completion or error event
                // of its own; the engine's own callbacks, if any, still
                // fire independently.
                session.machine.transition(SessionState::Ready)?;
            }
        }
        Ok(CommandReply::Success(true))
    }

    /// Normalize one raw engine event into protocol events.
    async fn handle_engine_event(&self, event: RecognizerEvent) {
        match event {
            RecognizerEvent::ReadyForSpeech => {
                self.emitter
                    .emit(BridgeEvent::SpeechAvailability(true))
                    .await;
            }
            RecognizerEvent::BeginningOfSpeech => {
                {
                    let mut session = self.session.lock();
                    session.begin_utterance();
                    if let Err(e) = session.machine.transition(SessionState::Listening) {
                        warn!(target: "bridge", "unexpected beginning of speech: {}", e);
                    }
                }
                self.emitter.emit(BridgeEvent::RecognitionStarted).await;
            }
            RecognizerEvent::PartialResults { candidates } => {
                let update = self.session.lock().accept_candidate(&candidates);
                match update {
                    Some(text) => self.emitter.emit(BridgeEvent::Speech(text)).await,
                    None => self.metrics.write().suppressed_count += 1,
                }
            }
            RecognizerEvent::Results { candidates } => {
                let (update, transcription) = {
                    let mut session = self.session.lock();
                    let update = session.accept_candidate(&candidates);
                    (update, session.current_transcription().to_string())
                };
                match update {
                    Some(text) => self.emitter.emit(BridgeEvent::Speech(text)).await,
                    None => self.metrics.write().suppressed_count += 1,
                }
                self.emitter
                    .emit(BridgeEvent::RecognitionComplete(transcription))
                    .await;
                self.complete();
            }
            RecognizerEvent::EndOfSpeech => {
                // May duplicate the completion emitted on Results. The
                // wire carries both, faithfully reproducing the native
                // lifecycle; only the state transition is deduplicated.
                let transcription = self.session.lock().current_transcription().to_string();
                self.emitter
                    .emit(BridgeEvent::RecognitionComplete(transcription))
                    .await;
                self.complete();
            }
            RecognizerEvent::Error { code } => {
                self.emitter
                    .emit(BridgeEvent::SpeechAvailability(false))
                    .await;
                self.emitter.emit(BridgeEvent::Error(error_name(code))).await;

                let session = self.session.lock();
                if let Err(e) = session.machine.transition(SessionState::Errored) {
                    warn!(target: "bridge", "error event outside a listen request: {}", e);
                }
            }
            RecognizerEvent::BufferReceived { bytes } => {
                trace!(target: "bridge", "buffer received: {} bytes", bytes);
            }
            RecognizerEvent::RmsChanged { level_db } => {
                trace!(target: "bridge", "rms changed: {:.1} dB", level_db);
            }
            RecognizerEvent::Event { event_type } => {
                debug!(target: "bridge", "engine event: type={}", event_type);
            }
        }
    }

    /// Guarded completion: a second terminal signal for the same listen
    /// request is a state-level no-op.
    fn complete(&self) {
        let session = self.session.lock();
        if let Err(e) = session.machine.transition(SessionState::Completed) {
            warn!(target: "bridge", "completion outside a listen request: {}", e);
        }
    }
}
