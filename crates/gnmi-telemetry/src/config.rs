//! Configuration file support for gnmi-pbr-stats
//!
//! Loads and validates the telemetry client configuration from TOML files.
//! Default location: /etc/sonic/gnmi-telemetry.toml
//!
//! Credentials are never read from this file.

use crate::connection::ChannelArgs;
use crate::error::{Result, TelemetryError};
use crate::pbr::PbrKey;
use crate::request::{RpcArgs, StreamMode, DEFAULT_SAMPLE_INTERVAL_NSEC};
use serde::{Deserialize, Serialize};
use sonic_gnmi_proto::gnmi::Encoding;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/gnmi-telemetry.toml";

/// Subscription configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Interval between samples in nanoseconds
    #[serde(default = "default_sample_interval")]
    pub sample_interval_nsec: u64,

    /// Notification encoding, `proto` or `json_ietf`
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// `once` or `stream`
    #[serde(default)]
    pub mode: StreamMode,

    /// Deadline of each Subscribe call in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Connection attempts before giving up
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Interval between connection attempts in seconds
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: u64,
}

/// Complete telemetry client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub connection: ChannelArgs,

    #[serde(default)]
    pub subscription: SubscriptionConfig,

    /// Policy/rule combinations to subscribe to
    #[serde(default)]
    pub policies: Vec<PbrKey>,
}

fn default_sample_interval() -> u64 {
    DEFAULT_SAMPLE_INTERVAL_NSEC
}

fn default_encoding() -> String {
    "proto".to_string()
}

fn default_connect_retries() -> u32 {
    5
}

fn default_retry_interval() -> u64 {
    2
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            sample_interval_nsec: default_sample_interval(),
            encoding: default_encoding(),
            mode: StreamMode::default(),
            timeout_secs: None,
            connect_retries: default_connect_retries(),
            retry_interval_secs: default_retry_interval(),
        }
    }
}

/// Parses an encoding name. Accepts the lowercase config spelling and the
/// protocol enum name.
pub fn parse_encoding(name: &str) -> Option<Encoding> {
    Encoding::from_str_name(&name.to_ascii_uppercase())
}

impl TelemetryConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                TelemetryError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(TelemetryError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            TelemetryError::Configuration(format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Subscribe call deadline
    pub fn timeout(&self) -> Option<Duration> {
        self.subscription.timeout_secs.map(Duration::from_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.subscription.retry_interval_secs)
    }

    /// RPC arguments described by this configuration. Call [`validate`]
    /// first; an unknown encoding falls back to PROTO here.
    ///
    /// [`validate`]: TelemetryConfig::validate
    pub fn rpc_args(&self) -> RpcArgs {
        RpcArgs {
            sample_interval_nsec: self.subscription.sample_interval_nsec,
            encoding: parse_encoding(&self.subscription.encoding).unwrap_or(Encoding::Proto),
            mode: self.subscription.mode,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.connection.server_address.is_empty() {
            return Err(TelemetryError::Configuration(
                "server_address must not be empty".to_string(),
            ));
        }

        if self.connection.tls && self.connection.root_cert_path.is_none() {
            return Err(TelemetryError::Configuration(
                "root_cert_path is required when tls is enabled".to_string(),
            ));
        }

        if self.subscription.sample_interval_nsec == 0 {
            return Err(TelemetryError::Configuration(
                "sample_interval_nsec must be > 0".to_string(),
            ));
        }

        match parse_encoding(&self.subscription.encoding) {
            Some(Encoding::Proto | Encoding::JsonIetf) => {}
            _ => {
                return Err(TelemetryError::Configuration(format!(
                    "unsupported encoding '{}', expected proto or json_ietf",
                    self.subscription.encoding
                )))
            }
        }

        if let Some(key) = self
            .policies
            .iter()
            .find(|key| key.policy.is_empty() || key.rule.is_empty())
        {
            return Err(TelemetryError::Configuration(format!(
                "policy entry {key:?} needs both policy and rule"
            )));
        }

        Ok(())
    }
}
