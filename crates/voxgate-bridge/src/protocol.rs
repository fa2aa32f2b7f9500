//! Wire-level command and event protocol
//!
//! Commands arrive as named methods with JSON arguments; events leave as
//! named messages carrying a single payload value. The names are the
//! stable wire contract and never change with the engine behind the
//! bridge.

use serde::Deserialize;
use serde_json::Value;
use voxgate_foundation::error::ProtocolError;

/// Protocol commands a caller can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Activate,
    Listen {
        locale: String,
        complete_delay_millis: u64,
    },
    Cancel,
    Stop,
}

/// Arguments of `speech.listen` on the wire.
#[derive(Debug, Deserialize)]
struct ListenArgs {
    locale: String,
    #[serde(rename = "completeDelayMillis")]
    complete_delay_millis: u64,
}

impl Command {
    pub const ACTIVATE: &'static str = "speech.activate";
    pub const LISTEN: &'static str = "speech.listen";
    pub const CANCEL: &'static str = "speech.cancel";
    pub const STOP: &'static str = "speech.stop";

    /// Wire method name.
    pub fn method(&self) -> &'static str {
        match self {
            Command::Activate => Self::ACTIVATE,
            Command::Listen { .. } => Self::LISTEN,
            Command::Cancel => Self::CANCEL,
            Command::Stop => Self::STOP,
        }
    }

    /// Parse a named method call.
    ///
    /// Unknown method names are the channel's not-implemented case, per
    /// collaborator convention; bad arguments for a known method are a
    /// protocol error.
    pub fn parse(method: &str, args: &Value) -> Result<Self, ProtocolError> {
        match method {
            Self::ACTIVATE => Ok(Command::Activate),
            Self::CANCEL => Ok(Command::Cancel),
            Self::STOP => Ok(Command::Stop),
            Self::LISTEN => {
                let args: ListenArgs =
                    serde_json::from_value(args.clone()).map_err(|e| ProtocolError::BadArguments {
                        method: method.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Command::Listen {
                    locale: args.locale,
                    complete_delay_millis: args.complete_delay_millis,
                })
            }
            _ => Err(ProtocolError::NotImplemented {
                method: method.to_string(),
            }),
        }
    }
}

/// Reply to a protocol command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReply {
    /// Boolean command result.
    Success(bool),
    /// The channel convention for unrecognized method names.
    NotImplemented,
}

/// Events the bridge emits toward the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    CurrentLocale(String),
    SpeechAvailability(bool),
    RecognitionStarted,
    Speech(String),
    RecognitionComplete(String),
    Error(String),
}

impl BridgeEvent {
    /// Wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::CurrentLocale(_) => "speech.onCurrentLocale",
            BridgeEvent::SpeechAvailability(_) => "speech.onSpeechAvailability",
            BridgeEvent::RecognitionStarted => "speech.onRecognitionStarted",
            BridgeEvent::Speech(_) => "speech.onSpeech",
            BridgeEvent::RecognitionComplete(_) => "speech.onRecognitionComplete",
            BridgeEvent::Error(_) => "speech.onError",
        }
    }

    /// Single payload value carried on the wire.
    pub fn payload(&self) -> Value {
        match self {
            BridgeEvent::CurrentLocale(locale) => Value::String(locale.clone()),
            BridgeEvent::SpeechAvailability(available) => Value::Bool(*available),
            BridgeEvent::RecognitionStarted => Value::Null,
            BridgeEvent::Speech(text) | BridgeEvent::RecognitionComplete(text) => {
                Value::String(text.clone())
            }
            BridgeEvent::Error(name) => Value::String(name.clone()),
        }
    }
}

/// Native error code to symbolic name table.
const ERROR_NAMES: &[(i32, &str)] = &[
    (1, "ERROR_NETWORK_TIMEOUT"),
    (2, "ERROR_NETWORK"),
    (3, "ERROR_AUDIO"),
    (4, "ERROR_SERVER"),
    (5, "ERROR_CLIENT"),
    (6, "ERROR_SPEECH_TIMEOUT"),
    (7, "ERROR_NO_MATCH"),
    (8, "ERROR_RECOGNIZER_BUSY"),
    (9, "ERROR_INSUFFICIENT_PERMISSIONS"),
];

/// Map a native error code to its stable symbolic name. Codes outside
/// the table get a synthesized name rather than failing.
pub fn error_name(code: i32) -> String {
    ERROR_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("UNKNOWN_CODE_{code}"))
}
