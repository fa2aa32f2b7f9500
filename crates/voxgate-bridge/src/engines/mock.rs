//! Scripted recognizer engine for testing the bridge

use crate::engine::{EngineInfo, ListenRequest, RecognizerEngine, RecognizerEvent};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::debug;
use voxgate_foundation::error::EngineError;

/// Configuration for scripted recognition runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfig {
    /// Events replayed, in order, each time listening starts.
    pub script: Vec<RecognizerEvent>,

    /// Gap between replayed events in ms.
    pub event_gap_ms: u64,

    /// Fail every `start_listening` call with this reason.
    pub fail_start: Option<String>,
}

/// Replays a configured event script whenever listening starts, and
/// records every request it receives so tests can assert on them.
#[derive(Debug)]
pub struct ScriptedEngine {
    config: ScriptedConfig,
    event_tx: mpsc::Sender<RecognizerEvent>,
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    start_calls: usize,
    stop_calls: usize,
    last_request: Option<ListenRequest>,
}

impl ScriptedEngine {
    pub fn new(config: ScriptedConfig, event_tx: mpsc::Sender<RecognizerEvent>) -> Self {
        Self {
            config,
            event_tx,
            state: Arc::new(Mutex::new(ScriptedState::default())),
        }
    }

    pub fn with_script(
        script: Vec<RecognizerEvent>,
        event_tx: mpsc::Sender<RecognizerEvent>,
    ) -> Self {
        Self::new(
            ScriptedConfig {
                script,
                ..Default::default()
            },
            event_tx,
        )
    }

    pub fn failing(reason: impl Into<String>, event_tx: mpsc::Sender<RecognizerEvent>) -> Self {
        Self::new(
            ScriptedConfig {
                fail_start: Some(reason.into()),
                ..Default::default()
            },
            event_tx,
        )
    }

    pub fn start_calls(&self) -> usize {
        self.state.lock().unwrap().start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.state.lock().unwrap().stop_calls
    }

    pub fn last_request(&self) -> Option<ListenRequest> {
        self.state.lock().unwrap().last_request.clone()
    }

    /// Shared observation window onto this engine's call history; clones
    /// stay valid after the engine is boxed and handed to a bridge.
    pub fn observer(&self) -> ScriptedObserver {
        ScriptedObserver {
            state: Arc::clone(&self.state),
        }
    }
}

/// Test-side handle for asserting on a [`ScriptedEngine`] the bridge owns.
#[derive(Debug, Clone)]
pub struct ScriptedObserver {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedObserver {
    pub fn start_calls(&self) -> usize {
        self.state.lock().unwrap().start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.state.lock().unwrap().stop_calls
    }

    pub fn last_request(&self) -> Option<ListenRequest> {
        self.state.lock().unwrap().last_request.clone()
    }
}

#[async_trait]
impl RecognizerEngine for ScriptedEngine {
    fn info(&self) -> EngineInfo {
        EngineInfo {
            id: "scripted".to_string(),
            name: "Scripted Recognizer".to_string(),
            is_local: true,
        }
    }

    async fn start_listening(&mut self, request: ListenRequest) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock().unwrap();
            state.start_calls += 1;
            state.last_request = Some(request.clone());
        }

        if let Some(reason) = &self.config.fail_start {
            return Err(EngineError::StartFailed(reason.clone()));
        }

        debug!(
            target: "engine",
            "scripted engine replaying {} events for {}",
            self.config.script.len(),
            request.locale
        );

        let script = self.config.script.clone();
        let gap_ms = self.config.event_gap_ms;
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            for event in script {
                if gap_ms > 0 {
                    tokio::time::sleep(tokio::time::Duration::from_millis(gap_ms)).await;
                }
                if event_tx.send(event).await.is_err() {
                    // Bridge dropped its receiver; nothing left to replay to.
                    break;
                }
            }
        });

        Ok(())
    }

    async fn stop_listening(&mut self) -> Result<(), EngineError> {
        self.state.lock().unwrap().stop_calls += 1;
        Ok(())
    }
}
