use crate::domain::model::LinkSettings;
use crate::domain::ports::{LinkOpener, SerialLink};
use crate::utils::error::{BridgeError, Result};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for a serial device, used by `--dry-run`.
///
/// Clones share the same buffer, so a clone kept outside the bridge can
/// inspect everything written through it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    buffer: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<AtomicUsize>,
    failure: Option<String>,
    echo: bool,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs every write at info level.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Every write fails with `reason`, like an unplugged adapter.
    pub fn broken(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Write for MemoryLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(reason) = &self.failure {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, reason.clone()));
        }
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("memory link poisoned"))?;
        buffer.extend_from_slice(buf);
        if self.echo {
            tracing::info!("[dry-run] wrote {:?}", String::from_utf8_lossy(buf));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(reason) = &self.failure {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, reason.clone()));
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out clones of one [`MemoryLink`] and counts open attempts.
#[derive(Debug, Clone)]
pub struct MemoryOpener {
    link: MemoryLink,
    failure: Option<String>,
    attempts: Arc<AtomicUsize>,
}

impl MemoryOpener {
    pub fn new(link: MemoryLink) -> Self {
        Self {
            link,
            failure: None,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every open attempt fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            link: MemoryLink::new(),
            failure: Some(reason.into()),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl LinkOpener for MemoryOpener {
    fn open(&self, settings: &LinkSettings) -> Result<Box<dyn SerialLink>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(reason) => Err(BridgeError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: {}", settings.port, reason),
            ))),
            None => Ok(Box::new(self.link.clone())),
        }
    }
}
