use crate::domain::model::{LinkSettings, NoteCommand, DEFAULT_READ_TIMEOUT};
use crate::domain::ports::{LinkOpener, SerialLink};
use crate::utils::error::{BridgeError, Result};
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// The open serial channel, shared by every request for the life of the process.
pub struct SerialHandle {
    settings: LinkSettings,
    link: Arc<std::sync::Mutex<Box<dyn SerialLink>>>,
    turn: Mutex<()>,
}

impl SerialHandle {
    pub fn new(settings: LinkSettings, link: Box<dyn SerialLink>) -> Self {
        Self {
            settings,
            link: Arc::new(std::sync::Mutex::new(link)),
            turn: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    /// Writes one command, flushes it and holds the turn for `settle` so the
    /// next command cannot follow immediately.
    ///
    /// The port calls block for up to the read timeout, so they run on the
    /// blocking pool.
    pub async fn send(&self, command: &NoteCommand, settle: Duration) -> io::Result<()> {
        let _turn = self.turn.lock().await;

        let link = Arc::clone(&self.link);
        let bytes = command.wire_bytes();
        tokio::task::spawn_blocking(move || {
            let mut link = link
                .lock()
                .map_err(|_| io::Error::other("serial link poisoned"))?;
            link.write_all(&bytes)?;
            link.flush()
        })
        .await
        .map_err(io::Error::other)??;

        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SerialHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialHandle")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Outcome of the one connection attempt.
#[derive(Debug, Clone)]
pub enum LinkState {
    Open(Arc<SerialHandle>),
    Unavailable { reason: String },
}

impl LinkState {
    pub fn is_open(&self) -> bool {
        matches!(self, LinkState::Open(_))
    }

    pub fn handle(&self) -> Result<&Arc<SerialHandle>> {
        match self {
            LinkState::Open(handle) => Ok(handle),
            LinkState::Unavailable { .. } => Err(BridgeError::ConnectionUnavailable),
        }
    }
}

/// Opens the serial link at most once per manager and hands the same
/// [`LinkState`] to every caller.
pub struct ConnectionManager<O: LinkOpener> {
    opener: O,
    timeout: Duration,
    state: OnceLock<LinkState>,
}

impl<O: LinkOpener> ConnectionManager<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            timeout: DEFAULT_READ_TIMEOUT,
            state: OnceLock::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the shared link, opening it on the first call.
    ///
    /// Concurrent first callers block until the single open attempt finishes.
    /// A failed attempt is not retried: every caller sees `Unavailable`.
    pub fn get_connection(&self, port: &str, baud_rate: u32) -> LinkState {
        let state = self.state.get_or_init(|| {
            self.connect(LinkSettings::new(port, baud_rate).with_timeout(self.timeout))
        });

        if let LinkState::Open(handle) = state {
            let settings = handle.settings();
            if settings.port != port || settings.baud_rate != baud_rate {
                tracing::warn!(
                    "Ignoring request for {} at {} baud, already connected to {} at {} baud",
                    port,
                    baud_rate,
                    settings.port,
                    settings.baud_rate
                );
            }
        }

        state.clone()
    }

    /// State after initialization, `None` before the first `get_connection`.
    pub fn current(&self) -> Option<&LinkState> {
        self.state.get()
    }

    fn connect(&self, settings: LinkSettings) -> LinkState {
        match self.opener.open(&settings) {
            Ok(link) => {
                tracing::info!("Connected to {} at {} baud.", settings.port, settings.baud_rate);
                LinkState::Open(Arc::new(SerialHandle::new(settings, link)))
            }
            Err(e) => {
                tracing::error!("Failed to connect to {}: {}", settings.port, e);
                LinkState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
