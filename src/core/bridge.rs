use crate::core::connection::LinkState;
use crate::domain::model::{DeviceProfile, NoteCommand, SendNoteRequest, SendNoteResponse};
use crate::utils::error::{BridgeError, Result};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Turns `/send-note` bodies into note commands on the shared link.
#[derive(Debug, Clone)]
pub struct NoteBridge {
    link: LinkState,
    profile: DeviceProfile,
    settle_delay: Duration,
}

impl NoteBridge {
    pub fn new(link: LinkState) -> Self {
        Self {
            link,
            profile: DeviceProfile::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Handles a raw request body.
    ///
    /// The link is checked before the body is looked at, so an unavailable
    /// link fails every request the same way. An empty body counts as `{}`.
    pub async fn handle_send_note(&self, body: &[u8]) -> Result<SendNoteResponse> {
        self.link.handle()?;

        let request = if body.iter().all(u8::is_ascii_whitespace) {
            SendNoteRequest::default()
        } else {
            parse_request(body)?
        };

        self.send_note(request).await
    }

    pub async fn send_note(&self, request: SendNoteRequest) -> Result<SendNoteResponse> {
        let handle = self.link.handle()?;
        let command = NoteCommand::try_from(request)?;

        handle
            .send(&command, self.settle_delay)
            .await
            .map_err(BridgeError::WriteFailure)?;

        tracing::info!(
            "Sent to {}: {}",
            self.profile.device_name(),
            command.to_string().trim_end()
        );
        Ok(SendNoteResponse::success(command.into_note()))
    }
}

/// Only a JSON object is a request; serde would otherwise accept `["C4"]`
/// as the positional form of the struct.
fn parse_request(body: &[u8]) -> Result<SendNoteRequest> {
    match serde_json::from_slice::<Value>(body)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        _ => Err(BridgeError::InvalidBody(serde::de::Error::custom(
            "expected a JSON object",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryLink, MemoryOpener};
    use crate::core::connection::ConnectionManager;

    fn open_bridge(link: &MemoryLink) -> NoteBridge {
        let manager = ConnectionManager::new(MemoryOpener::new(link.clone()));
        NoteBridge::new(manager.get_connection("mem", 9600)).with_settle_delay(Duration::ZERO)
    }

    fn closed_bridge() -> NoteBridge {
        let manager = ConnectionManager::new(MemoryOpener::failing("no device"));
        NoteBridge::new(manager.get_connection("mem", 9600))
    }

    #[tokio::test]
    async fn test_send_note_writes_command() {
        let link = MemoryLink::new();
        let bridge = open_bridge(&link);

        let response = bridge.handle_send_note(br#"{"note": "C4"}"#).await.unwrap();

        assert_eq!(response, SendNoteResponse::success("C4"));
        assert_eq!(link.contents_string(), "PLAY_NOTE_C4\n");
        assert_eq!(link.flushes(), 1);
    }

    #[tokio::test]
    async fn test_missing_or_empty_note_is_rejected() {
        let link = MemoryLink::new();
        let bridge = open_bridge(&link);

        for body in [&br#"{}"#[..], br#"{"note": ""}"#, br#"{"note": null}"#, b""] {
            let err = bridge.handle_send_note(body).await.unwrap_err();
            assert!(matches!(err, BridgeError::MissingNote));
            assert_eq!(err.to_string(), "No note provided");
        }
        assert!(link.contents().is_empty());
        assert_eq!(link.flushes(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let link = MemoryLink::new();
        let bridge = open_bridge(&link);

        let err = bridge.handle_send_note(b"note=C4").await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidBody(_)));
        let err = bridge.handle_send_note(br#"{"note": 4}"#).await.unwrap_err();
        assert!(err.is_client_error());

        for body in [&br#"["C4"]"#[..], br#""C4""#, b"42"] {
            let err = bridge.handle_send_note(body).await.unwrap_err();
            assert!(matches!(err, BridgeError::InvalidBody(_)));
            assert!(err.to_string().starts_with("Invalid request body"));
        }
        assert!(link.contents().is_empty());
        assert_eq!(link.flushes(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_link_fails_every_payload() {
        let bridge = closed_bridge();

        for body in [&br#"{"note": "C4"}"#[..], br#"{}"#, b"not json"] {
            let err = bridge.handle_send_note(body).await.unwrap_err();
            assert!(matches!(err, BridgeError::ConnectionUnavailable));
            assert_eq!(err.to_string(), "Serial connection not established.");
        }
    }

    #[tokio::test]
    async fn test_write_failure_carries_io_message() {
        let link = MemoryLink::broken("device reports I/O error");
        let bridge = open_bridge(&link);

        let err = bridge.handle_send_note(br#"{"note": "A"}"#).await.unwrap_err();
        assert!(matches!(err, BridgeError::WriteFailure(_)));
        assert_eq!(err.to_string(), "device reports I/O error");
    }

    #[tokio::test]
    async fn test_settle_delay_is_applied() {
        let link = MemoryLink::new();
        let bridge = open_bridge(&link).with_settle_delay(Duration::from_millis(50));

        let started = std::time::Instant::now();
        bridge.handle_send_note(br#"{"note": "G"}"#).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_concurrent_sends_do_not_interleave() {
        let link = MemoryLink::new();
        let bridge = std::sync::Arc::new(open_bridge(&link));

        let tasks: Vec<_> = ["C", "D", "E", "F", "G", "A", "B"]
            .into_iter()
            .map(|note| {
                let bridge = std::sync::Arc::clone(&bridge);
                tokio::spawn(async move {
                    bridge
                        .send_note(SendNoteRequest {
                            note: Some(note.to_string()),
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let written = link.contents_string();
        let mut lines: Vec<&str> = written.lines().collect();
        lines.sort_unstable();
        assert_eq!(
            lines,
            vec![
                "PLAY_NOTE_A",
                "PLAY_NOTE_B",
                "PLAY_NOTE_C",
                "PLAY_NOTE_D",
                "PLAY_NOTE_E",
                "PLAY_NOTE_F",
                "PLAY_NOTE_G"
            ]
        );
    }
}
