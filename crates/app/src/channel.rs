//! JSON-lines stdio message channel
//!
//! A concrete instance of the bidirectional message-channel
//! collaborator: one command object per stdin line, replies and
//! asynchronous events interleaved as single-line JSON objects on
//! stdout. Logs go to stderr and the log file, never stdout.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};
use voxgate_bridge::{BridgeEvent, Command, CommandReply, SessionBridge};
use voxgate_foundation::error::ProtocolError;

/// Inbound command call: `{"method": "speech.listen", "args": {...}}`.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

/// Reply to one command.
#[derive(Debug, Serialize, PartialEq)]
pub struct CommandResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,

    #[serde(rename = "notImplemented", skip_serializing_if = "Option::is_none")]
    pub not_implemented: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success(result: bool) -> Self {
        Self {
            result: Some(result),
            not_implemented: None,
            error: None,
        }
    }

    pub fn not_implemented() -> Self {
        Self {
            result: None,
            not_implemented: Some(true),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            not_implemented: None,
            error: Some(message.into()),
        }
    }
}

/// Outbound event: `{"event": "speech.onSpeech", "payload": "hel"}`.
#[derive(Debug, Serialize)]
pub struct EventMessage {
    pub event: &'static str,
    pub payload: Value,
}

impl From<&BridgeEvent> for EventMessage {
    fn from(event: &BridgeEvent) -> Self {
        Self {
            event: event.name(),
            payload: event.payload(),
        }
    }
}

/// Serve the channel until stdin closes.
pub async fn run(
    bridge: SessionBridge,
    mut event_rx: tokio::sync::mpsc::Receiver<BridgeEvent>,
) -> Result<()> {
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let message = EventMessage::from(&event);
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(target: "channel", "failed to serialize event: {}", e),
            }
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&bridge, &line).await;
        println!("{}", serde_json::to_string(&response)?);
    }

    info!(target: "channel", "stdin closed, shutting down channel");
    event_task.abort();
    Ok(())
}

async fn handle_line(bridge: &SessionBridge, line: &str) -> CommandResponse {
    let request: CommandRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return CommandResponse::error(format!("malformed request: {e}")),
    };

    let command = match Command::parse(&request.method, &request.args) {
        Ok(command) => command,
        Err(ProtocolError::NotImplemented { .. }) => return CommandResponse::not_implemented(),
        Err(e) => return CommandResponse::error(e.to_string()),
    };

    match bridge.dispatch(command).await {
        Ok(CommandReply::Success(ok)) => CommandResponse::success(ok),
        Ok(CommandReply::NotImplemented) => CommandResponse::not_implemented(),
        Err(e) => {
            // Command-level failures stay on the reply, not the event
            // stream; the session remains usable.
            warn!(target: "channel", "command failed: {}", e);
            CommandResponse::success(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use voxgate_bridge::engines::NoOpEngine;
    use voxgate_foundation::locale::{FixedLocaleProvider, LocaleId};

    fn noop_bridge() -> (SessionBridge, mpsc::Receiver<BridgeEvent>) {
        let (event_tx, event_rx) = mpsc::channel(8);
        let ambient = Arc::new(FixedLocaleProvider::new(LocaleId::with_region("en", "US")));
        let bridge = SessionBridge::new(Box::new(NoOpEngine::new()), ambient, event_tx);
        (bridge, event_rx)
    }

    #[test]
    fn request_parses_with_and_without_args() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"method": "speech.activate"}"#).unwrap();
        assert_eq!(request.method, "speech.activate");
        assert_eq!(request.args, Value::Null);

        let request: CommandRequest = serde_json::from_str(
            r#"{"method": "speech.listen", "args": {"locale": "en_US", "completeDelayMillis": 1500}}"#,
        )
        .unwrap();
        assert_eq!(request.method, "speech.listen");
        assert_eq!(request.args["locale"], "en_US");
    }

    #[test]
    fn responses_serialize_to_single_field_objects() {
        let json = serde_json::to_string(&CommandResponse::success(true)).unwrap();
        assert_eq!(json, r#"{"result":true}"#);

        let json = serde_json::to_string(&CommandResponse::not_implemented()).unwrap();
        assert_eq!(json, r#"{"notImplemented":true}"#);
    }

    #[test]
    fn event_message_carries_wire_name_and_payload() {
        let message = EventMessage::from(&BridgeEvent::Speech("hel".to_string()));
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"event":"speech.onSpeech","payload":"hel"}"#);
    }

    #[tokio::test]
    async fn unknown_method_replies_not_implemented() {
        let (bridge, _event_rx) = noop_bridge();
        let response = handle_line(&bridge, r#"{"method": "speech.reboot"}"#).await;
        assert_eq!(response, CommandResponse::not_implemented());
    }

    #[tokio::test]
    async fn malformed_json_replies_with_error() {
        let (bridge, _event_rx) = noop_bridge();
        let response = handle_line(&bridge, "{not json").await;
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn activate_round_trip() {
        let (bridge, mut event_rx) = noop_bridge();
        let response = handle_line(&bridge, r#"{"method": "speech.activate"}"#).await;
        assert_eq!(response, CommandResponse::success(true));

        let event = event_rx.recv().await.unwrap();
        assert_eq!(event, BridgeEvent::CurrentLocale("en_US".to_string()));
    }
}
