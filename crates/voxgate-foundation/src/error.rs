use crate::state::SessionState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Recognizer engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
}

/// Errors raised by a native recognizer engine behind the
/// `RecognizerEngine` seam. Recognition-time failures do not use this
/// type; they arrive as numeric codes on the event channel.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine not available: {reason}")]
    NotAvailable { reason: String },

    #[error("Failed to start listening: {0}")]
    StartFailed(String),

    #[error("Failed to stop listening: {0}")]
    StopFailed(String),

    #[error("Backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Method not implemented: {method}")]
    NotImplemented { method: String },

    #[error("Bad arguments for {method}: {reason}")]
    BadArguments { method: String, reason: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for EngineError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        EngineError::Backend(error)
    }
}
