//! The process-wide recognition session

use crate::types::ListenConfig;
use voxgate_foundation::locale::LocaleId;
use voxgate_foundation::state::{SessionState, SessionStateMachine};

/// The single recognition context.
///
/// Created once at bridge construction and alive for the process
/// lifetime; listen requests reset its transcription and locale fields,
/// never the object itself.
pub struct Session {
    pub(crate) machine: SessionStateMachine,
    current_transcription: String,
    active_locale: Option<LocaleId>,
    listen_config: Option<ListenConfig>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            machine: SessionStateMachine::new(),
            current_transcription: String::new(),
            active_locale: None,
            listen_config: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.current()
    }

    /// Last non-empty, non-duplicate text observed during the active
    /// listening period.
    pub fn current_transcription(&self) -> &str {
        &self.current_transcription
    }

    /// Locale in force for the current or most recent listen request.
    pub fn active_locale(&self) -> Option<&LocaleId> {
        self.active_locale.as_ref()
    }

    pub fn listen_config(&self) -> Option<ListenConfig> {
        self.listen_config
    }

    /// Record the configuration of a newly armed listen request.
    pub(crate) fn arm(&mut self, locale: LocaleId, config: ListenConfig) {
        self.active_locale = Some(locale);
        self.listen_config = Some(config);
    }

    /// Start of a listening period. The transcription resets exactly
    /// once, here, before any candidate of the new period is compared.
    pub(crate) fn begin_utterance(&mut self) {
        self.current_transcription.clear();
    }

    /// Apply the deduplication rule to a candidate list: take the first
    /// candidate, drop empties and repeats, otherwise adopt it as the
    /// current transcription and hand it back for emission.
    pub(crate) fn accept_candidate(&mut self, candidates: &[String]) -> Option<String> {
        let candidate = candidates.first()?;
        if candidate.is_empty() || candidate == &self.current_transcription {
            return None;
        }
        self.current_transcription = candidate.clone();
        Some(candidate.clone())
    }
}
