use crate::utils::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

const COMMAND_PREFIX: &str = "PLAY_NOTE_";

/// Where and how fast to open the serial link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl LinkSettings {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Which kind of device sits on the other end of the link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    /// HC-05 Bluetooth serial module.
    #[default]
    Hc05,
    /// Any USB-UART adapter.
    Generic,
}

impl DeviceProfile {
    pub fn device_name(&self) -> &'static str {
        match self {
            DeviceProfile::Hc05 => "HC-05",
            DeviceProfile::Generic => "serial device",
        }
    }
}

impl std::str::FromStr for DeviceProfile {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hc05" | "hc-05" => Ok(DeviceProfile::Hc05),
            "generic" => Ok(DeviceProfile::Generic),
            other => Err(BridgeError::InvalidConfigValueError {
                field: "serial.profile".to_string(),
                value: other.to_string(),
                reason: "Valid profiles: hc05, generic".to_string(),
            }),
        }
    }
}

/// A note wrapped into the command the firmware understands.
///
/// The note text is not inspected beyond rejecting the empty string; it is
/// concatenated into the command as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCommand {
    note: String,
}

impl NoteCommand {
    pub fn new(note: impl Into<String>) -> Result<Self> {
        let note = note.into();
        if note.is_empty() {
            return Err(BridgeError::MissingNote);
        }
        Ok(Self { note })
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn into_note(self) -> String {
        self.note
    }

    /// Bytes written to the serial link, newline terminated.
    pub fn wire_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for NoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}", COMMAND_PREFIX, self.note)
    }
}

impl TryFrom<SendNoteRequest> for NoteCommand {
    type Error = BridgeError;

    fn try_from(request: SendNoteRequest) -> Result<Self> {
        NoteCommand::new(request.note.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendNoteRequest {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendNoteResponse {
    pub status: String,
    pub sent: String,
}

impl SendNoteResponse {
    pub fn success(note: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            sent: note.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
