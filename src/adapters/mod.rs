// Adapters layer: concrete implementations for external systems (serial ports, http).

pub mod client;
pub mod http;
pub mod memory;
pub mod serial;
