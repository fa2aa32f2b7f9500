//! Session state machine and event-normalization bridge for Voxgate
//!
//! This crate maps a noisy, callback-driven native recognition lifecycle
//! onto a small, stable, deduplicated, locale-aware command/event
//! protocol. The recognizer itself lives behind the [`RecognizerEngine`]
//! trait; the bridge owns the session lifecycle and the normalization
//! rules.

pub mod bridge;
pub mod engine;
pub mod engines;
pub mod protocol;
pub mod session;
pub mod types;

pub use bridge::SessionBridge;
pub use engine::{EngineInfo, ListenRequest, RecognizerEngine, RecognizerEvent};
pub use protocol::{error_name, BridgeEvent, Command, CommandReply};
pub use session::Session;
pub use types::{BridgeMetrics, ListenConfig};
