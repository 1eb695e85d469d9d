pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::{router, serve, AppState};
pub use adapters::memory::{MemoryLink, MemoryOpener};
pub use adapters::serial::SerialPortOpener;
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::bridge::NoteBridge;
pub use core::connection::{ConnectionManager, LinkState, SerialHandle};
pub use utils::error::{BridgeError, Result};
