//! Recognizer engine seam
//!
//! This module defines the interface a native recognition backend
//! implements, and the raw callback set such a backend delivers. The
//! bridge consumes these events and never touches audio itself.

use async_trait::async_trait;
use std::fmt::Debug;
use voxgate_foundation::error::EngineError;
use voxgate_foundation::locale::LocaleId;

/// Raw callback set of a native recognizer, delivered asynchronously on
/// the engine's event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerEvent {
    /// The engine is ready to receive speech.
    ReadyForSpeech,
    /// The user started speaking.
    BeginningOfSpeech,
    /// In-progress transcription candidates, best first.
    PartialResults { candidates: Vec<String> },
    /// Terminal transcription candidates, best first.
    Results { candidates: Vec<String> },
    /// The user stopped speaking.
    EndOfSpeech,
    /// Recognition failed with a native error code.
    Error { code: i32 },
    /// Raw audio notification; accepted for parity, never surfaced.
    BufferReceived { bytes: usize },
    /// Input level change.
    RmsChanged { level_db: f32 },
    /// Engine-specific event outside the normalized set.
    Event { event_type: i32 },
}

/// Locale and silence/completion timing for one listen request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenRequest {
    pub locale: LocaleId,
    pub possibly_complete_silence_ms: u64,
    pub complete_silence_ms: u64,
    pub minimum_input_ms: u64,
}

impl ListenRequest {
    /// The host protocol exposes a single delay knob; all three engine
    /// timing extras are set from it.
    pub fn with_complete_delay(locale: LocaleId, complete_delay_millis: u64) -> Self {
        Self {
            locale,
            possibly_complete_silence_ms: complete_delay_millis,
            complete_silence_ms: complete_delay_millis,
            minimum_input_ms: complete_delay_millis,
        }
    }
}

/// Metadata about a recognizer engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    /// Unique identifier (e.g. "noop", "scripted").
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Whether recognition runs on-device.
    pub is_local: bool,
}

/// The interface any native recognition backend implements.
///
/// Engines push [`RecognizerEvent`]s into the mpsc sender handed to them
/// at construction; the bridge owns the receiving half. `stop_listening`
/// must be idempotent: stopping an idle engine is not an error.
#[async_trait]
pub trait RecognizerEngine: Send + Sync + Debug {
    /// Get engine metadata.
    fn info(&self) -> EngineInfo;

    /// Arm the recognizer and begin listening. Returns as soon as the
    /// request is dispatched; recognition progress arrives on the event
    /// channel.
    async fn start_listening(&mut self, request: ListenRequest) -> Result<(), EngineError>;

    /// Stop the active listening session, if any.
    async fn stop_listening(&mut self) -> Result<(), EngineError>;
}
