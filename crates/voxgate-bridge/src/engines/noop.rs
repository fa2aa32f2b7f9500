//! No-operation recognizer engine for wiring tests and fallback

use crate::engine::{EngineInfo, ListenRequest, RecognizerEngine};
use async_trait::async_trait;
use voxgate_foundation::error::EngineError;

/// An engine that accepts every command and never hears anything.
/// Useful for exercising the command path without a recognizer.
#[derive(Debug, Clone, Default)]
pub struct NoOpEngine {
    listening: bool,
}

impl NoOpEngine {
    pub fn new() -> Self {
        Self { listening: false }
    }
}

#[async_trait]
impl RecognizerEngine for NoOpEngine {
    fn info(&self) -> EngineInfo {
        EngineInfo {
            id: "noop".to_string(),
            name: "No-Op Recognizer".to_string(),
            is_local: true,
        }
    }

    async fn start_listening(&mut self, request: ListenRequest) -> Result<(), EngineError> {
        tracing::debug!(target: "engine", "noop engine armed for {}", request.locale);
        self.listening = true;
        Ok(())
    }

    async fn stop_listening(&mut self) -> Result<(), EngineError> {
        self.listening = false;
        Ok(())
    }
}
