use crate::domain::model::{ErrorResponse, SendNoteRequest, SendNoteResponse};
use crate::utils::error::{BridgeError, Result};
use crate::utils::validation::validate_url;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_NOTE_GAP: Duration = Duration::from_millis(600);

pub const JINGLE_BELLS: &[&str] = &[
    "E", "E", "E", "E", "E", "E", "E", "G", "C", "D", "E", "F", "F", "F", "F", "F", "E", "E", "E",
    "E", "E", "D", "D", "E", "D", "G",
];

/// Splits a comma-separated melody, dropping blank entries.
pub fn parse_melody(notes: &str) -> Vec<String> {
    notes
        .split(',')
        .map(str::trim)
        .filter(|note| !note.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Client for a running bridge's `/send-note` endpoint.
#[derive(Debug, Clone)]
pub struct NoteClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl NoteClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_url("url", base_url)?;
        let endpoint = Url::parse(base_url)?.join("/send-note")?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn send_note(&self, note: &str) -> Result<SendNoteResponse> {
        let request = SendNoteRequest {
            note: Some(note.to_string()),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<SendNoteResponse>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(BridgeError::RemoteError {
            status: status.as_u16(),
            message,
        })
    }

    /// Sends every note in order, pausing `gap` after each one. A failed note
    /// is logged and skipped.
    pub async fn play_melody(&self, notes: &[String], gap: Duration) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();

        for note in notes {
            match self.send_note(note).await {
                Ok(response) => {
                    tracing::info!("🎵 Playing note: {}", response.sent);
                    summary.sent += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to send note {}: {}", note, e);
                    summary.failed += 1;
                }
            }
            if !gap.is_zero() {
                tokio::time::sleep(gap).await;
            }
        }

        summary
    }
}
