use axum::http::StatusCode;
use thiserror::Error;

/// Message returned instead of the I/O detail when error details are hidden.
pub const SANITIZED_WRITE_MESSAGE: &str = "Failed to write to serial device.";

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Serial connection not established.")]
    ConnectionUnavailable,

    #[error("No note provided")]
    MissingNote,

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{0}")]
    WriteFailure(std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    SerialError(#[from] serialport::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Bridge responded {status}: {message}")]
    RemoteError { status: u16, message: String },
}

impl BridgeError {
    /// HTTP status used when this error ends a `/send-note` request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::MissingNote | BridgeError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn public_message(&self, expose_details: bool) -> String {
        match self {
            BridgeError::WriteFailure(_) if !expose_details => SANITIZED_WRITE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BridgeError::MissingNote.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BridgeError::ConnectionUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let write = BridgeError::WriteFailure(std::io::Error::other("device unplugged"));
        assert_eq!(write.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!write.is_client_error());
    }

    #[test]
    fn test_write_failure_message() {
        let write = BridgeError::WriteFailure(std::io::Error::other("device unplugged"));
        assert_eq!(write.public_message(true), "device unplugged");
        assert_eq!(write.public_message(false), SANITIZED_WRITE_MESSAGE);
        // Only write failures are sanitized.
        assert_eq!(
            BridgeError::MissingNote.public_message(false),
            "No note provided"
        );
    }
}
