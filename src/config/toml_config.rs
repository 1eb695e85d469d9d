use crate::config::CliConfig;
use crate::domain::model::{DeviceProfile, LinkSettings, DEFAULT_BAUD_RATE};
use crate::utils::error::{BridgeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub serial: SerialConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
    pub profile: DeviceProfile,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: 1000,
            profile: DeviceProfile::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub post_write_delay_ms: u64,
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
            post_write_delay_ms: 100,
            expose_error_details: true,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BridgeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BridgeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SERIAL_PORT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BridgeError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line flags win over file values.
    pub fn apply_overrides(&mut self, cli: &CliConfig) {
        if let Some(port) = &cli.port {
            self.serial.port = port.clone();
        }
        if let Some(baud_rate) = cli.baud_rate {
            self.serial.baud_rate = baud_rate;
        }
        if let Some(profile) = cli.profile {
            self.serial.profile = profile;
        }
        if let Some(listen) = &cli.listen {
            self.server.listen = listen.clone();
        }
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings::new(self.serial.port.clone(), self.serial.baud_rate)
            .with_timeout(Duration::from_millis(self.serial.timeout_ms))
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.listen", &self.server.listen)
    }

    pub fn post_write_delay(&self) -> Duration {
        Duration::from_millis(self.server.post_write_delay_ms)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("serial.port", &self.serial.port)?;
        validation::validate_range("serial.baud_rate", self.serial.baud_rate, 50, 4_000_000)?;
        validation::validate_range("serial.timeout_ms", self.serial.timeout_ms, 1, 60_000)?;
        self.listen_addr()?;
        Ok(())
    }
}
