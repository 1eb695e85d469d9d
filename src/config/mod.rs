pub mod toml_config;

use crate::domain::model::DeviceProfile;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "note-bridge")]
#[command(about = "Forwards notes received over HTTP to a serial device")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Serial port to open (e.g. /dev/ttyUSB0, COM6)
    #[arg(long)]
    pub port: Option<String>,

    #[arg(long)]
    pub baud_rate: Option<u32>,

    /// Address the HTTP server binds to
    #[arg(long)]
    pub listen: Option<String>,

    /// Device profile: hc05 or generic
    #[arg(long)]
    pub profile: Option<DeviceProfile>,

    /// Log commands instead of opening a serial port
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
