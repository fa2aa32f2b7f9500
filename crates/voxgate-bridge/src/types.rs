//! Core types for the session bridge

use std::time::Instant;

/// Bridge metrics snapshot
#[derive(Debug, Clone, Default)]
pub struct BridgeMetrics {
    /// Commands received over the protocol
    pub commands_in: u64,
    /// Events emitted toward the caller
    pub events_out: u64,
    /// Partial transcription events emitted
    pub partial_count: u64,
    /// Completion events emitted
    pub final_count: u64,
    /// Error events emitted
    pub error_count: u64,
    /// Empty or duplicate candidates suppressed by deduplication
    pub suppressed_count: u64,
    /// Time of last emitted event
    pub last_event_time: Option<Instant>,
}

/// Timing parameters supplied with one listen request.
///
/// The protocol exposes a single delay value; the engine-facing request
/// fans it out into the three silence/length extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenConfig {
    pub complete_delay_millis: u64,
}
