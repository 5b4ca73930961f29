//! Bridge configuration.
//!
//! All externally supplied values live here: the device path, the
//! downstream automation service, and the policy knobs. Every field has a
//! default so a config file only needs to name what it changes:
//!
//! ```toml
//! [bridge]
//! device = "/dev/ttyUSB0"
//! downstream_host = "automation.local:8089"
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::protocol::ChecksumPolicy;

/// Baud rate of the controller's serial interface.
pub const BAUD_RATE: u32 = 115_200;

/// Fixed delay between reconnection attempts.
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 10;

/// Configuration for one bridge instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Path of the serial device node.
    pub device: String,
    /// Serial baud rate. The controller hardware runs at 115200.
    pub baud_rate: u32,
    /// Host (and optional port) of the automation service.
    pub downstream_host: String,
    /// Local host identity appended to the remote procedure name.
    pub host_id: String,
    /// Whether accepted events are forwarded downstream at all.
    pub notify_enabled: bool,
    /// Whether received frame checksums are verified.
    pub checksum_policy: ChecksumPolicy,
    /// Seconds between reconnection attempts.
    pub reconnect_delay_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: BAUD_RATE,
            downstream_host: "localhost:8089".to_string(),
            host_id: default_host_id(),
            notify_enabled: true,
            checksum_policy: ChecksumPolicy::Trust,
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY_SECS,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration document holding a `[bridge]` table.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let doc: ConfigFile = toml::from_str(text)?;
        Ok(doc.bridge)
    }

    /// Delay between reconnection attempts as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Top-level shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bridge: BridgeConfig,
}

fn default_host_id() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert!(config.notify_enabled);
        assert_eq!(config.checksum_policy, ChecksumPolicy::Trust);
        assert_eq!(config.reconnect_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
            [bridge]
            device = "/dev/ttyACM0"
            downstream_host = "automation.local:8089"
            "#,
        )
        .unwrap();

        assert_eq!(config.device, "/dev/ttyACM0");
        assert_eq!(config.downstream_host, "automation.local:8089");
        assert_eq!(config.baud_rate, 115_200);
        assert!(config.notify_enabled);
    }

    #[test]
    fn test_checksum_policy_from_toml() {
        let config = BridgeConfig::from_toml_str(
            r#"
            [bridge]
            checksum_policy = "verify"
            "#,
        )
        .unwrap();
        assert_eq!(config.checksum_policy, ChecksumPolicy::Verify);
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config.device, "/dev/ttyUSB0");
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(BridgeConfig::from_toml_str("[bridge\ndevice = 3").is_err());
    }
}
