use crate::error::BridgeError;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Lifecycle of the single process-wide recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Listening,
    Recognizing,
    Completed,
    Errored,
}

impl SessionState {
    /// A listen request is in flight (armed or actively hearing speech).
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Listening | SessionState::Recognizing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Errored)
    }
}

pub struct SessionStateMachine {
    state: Arc<RwLock<SessionState>>,
    state_tx: Sender<SessionState>,
    state_rx: Receiver<SessionState>,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    pub fn new() -> Self {
        let (state_tx, state_rx) = crossbeam_channel::unbounded();
        Self {
            state: Arc::new(RwLock::new(SessionState::Uninitialized)),
            state_tx,
            state_rx,
        }
    }

    /// Apply a transition, enforcing the session lifecycle.
    ///
    /// Re-entering the current state is a no-op: the native engine may
    /// deliver a second terminal signal for one listen request, and the
    /// state machine absorbs it here rather than failing.
    pub fn transition(&self, new_state: SessionState) -> Result<(), BridgeError> {
        let mut current = self.state.write();

        if *current == new_state {
            return Ok(());
        }

        let valid = matches!(
            (&*current, &new_state),
            (SessionState::Uninitialized, SessionState::Ready)
                | (SessionState::Ready, SessionState::Recognizing)
                | (SessionState::Completed, SessionState::Recognizing)
                | (SessionState::Errored, SessionState::Recognizing)
                | (SessionState::Recognizing, SessionState::Listening)
                | (SessionState::Recognizing, SessionState::Completed)
                | (SessionState::Recognizing, SessionState::Errored)
                | (SessionState::Recognizing, SessionState::Ready)
                | (SessionState::Listening, SessionState::Completed)
                | (SessionState::Listening, SessionState::Errored)
                | (SessionState::Listening, SessionState::Ready)
        );

        if !valid {
            return Err(BridgeError::InvalidTransition {
                from: *current,
                to: new_state,
            });
        }

        tracing::debug!(target: "session", "state transition: {:?} -> {:?}", *current, new_state);
        *current = new_state;
        let _ = self.state_tx.send(new_state);
        Ok(())
    }

    pub fn current(&self) -> SessionState {
        *self.state.read()
    }

    pub fn subscribe(&self) -> Receiver<SessionState> {
        self.state_rx.clone()
    }
}
