use crate::domain::model::LinkSettings;
use crate::utils::error::Result;
use std::io::Write;

/// Byte sink on the far side of the bridge.
pub trait SerialLink: Write + Send {}

impl<T: Write + Send> SerialLink for T {}

/// Opens the single link the connection manager hands out.
pub trait LinkOpener: Send + Sync {
    fn open(&self, settings: &LinkSettings) -> Result<Box<dyn SerialLink>>;
}
