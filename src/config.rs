//! # Configuration Management
//!
//! Centralized configuration for the entity protocol tools.
//!
//! This module provides structured configuration for the injector, the
//! signature computer, and logging. The signature override table is part of
//! configuration: reference tables differ between peer releases, so which
//! overrides apply is a deployment decision, not a library constant.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{ProtocolError, Result};
use crate::protocol::overte;
use crate::protocol::registry::PacketTypeRegistry;
use crate::protocol::signature::{VersionOverride, VersionSource, VersionTableSpec};
use crate::transport::DEFAULT_INJECT_PORT;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Injector-specific configuration
    #[serde(default)]
    pub injector: InjectorConfig,

    /// Signature version-table configuration
    #[serde(default)]
    pub signature: SignatureConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::Config(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("ENTITY_PROTOCOL_TARGET_HOST") {
            config.injector.target_host = host;
        }

        if let Ok(port) = std::env::var("ENTITY_PROTOCOL_TARGET_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.injector.target_port = val;
            }
        }

        if let Ok(interval) = std::env::var("ENTITY_PROTOCOL_SEND_INTERVAL_MS") {
            if let Ok(val) = interval.parse::<u64>() {
                config.injector.send_interval = Duration::from_millis(val);
            }
        }

        if let Ok(version) = std::env::var("ENTITY_PROTOCOL_DEFAULT_VERSION") {
            if let Ok(val) = version.parse::<u16>() {
                config.signature.default_version = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.injector.validate());
        errors.extend(self.signature.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Injector-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InjectorConfig {
    /// Target host the client listens on
    pub target_host: String,

    /// Target UDP port
    pub target_port: u16,

    /// Pacing between animation frames
    #[serde(with = "duration_serde")]
    pub send_interval: Duration,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            target_host: String::from("127.0.0.1"),
            target_port: DEFAULT_INJECT_PORT,
            send_interval: Duration::from_millis(100),
        }
    }
}

impl InjectorConfig {
    /// Validate injector configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.target_host.is_empty() {
            errors.push("Target host cannot be empty".to_string());
        }

        if self.target_port == 0 {
            errors.push("Target port cannot be 0".to_string());
        }

        if self.send_interval.as_millis() == 0 {
            errors.push("Send interval too short (minimum: 1ms)".to_string());
        } else if self.send_interval.as_secs() > 10 {
            errors.push("Send interval too long (maximum: 10s)".to_string());
        }

        errors
    }

    /// The configured target as a `host:port` string for address resolution
    pub fn target(&self) -> String {
        format!("{}:{}", self.target_host, self.target_port)
    }
}

/// Signature version-table configuration.
///
/// Defaults to the Overte 2025.05 counts; a deployment integrating against a
/// different peer supplies its own table here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignatureConfig {
    /// Entry count of the reference packet-type enumeration
    pub num_packet_types: usize,

    /// Version applied to every index without an override
    pub default_version: u16,

    /// Named version constants referenced by indirected overrides
    #[serde(default)]
    pub constants: BTreeMap<String, u16>,

    /// Override table, applied in declaration order
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            num_packet_types: overte::NUM_PACKET_TYPES,
            default_version: overte::DEFAULT_VERSION,
            constants: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }
}

impl SignatureConfig {
    /// Validate signature configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.num_packet_types == 0 {
            errors.push("Packet-type count cannot be 0".to_string());
        } else if self.num_packet_types > 255 {
            errors.push(format!(
                "Packet-type count too large: {} (maximum: 255)",
                self.num_packet_types
            ));
        }

        if self.default_version > 255 {
            errors.push(format!(
                "Default version does not fit in a byte: {}",
                self.default_version
            ));
        }

        for (position, entry) in self.overrides.iter().enumerate() {
            errors.extend(
                entry
                    .validate()
                    .into_iter()
                    .map(|e| format!("Override {position}: {e}")),
            );
        }

        errors
    }

    /// Build a [`VersionTableSpec`] from this table.
    ///
    /// Entries addressed by packet name need the reference enumeration to
    /// resolve; pass `None` when every entry uses a numeric index.
    pub fn to_spec(&self, registry: Option<&PacketTypeRegistry>) -> Result<VersionTableSpec> {
        let mut spec = VersionTableSpec::new(self.num_packet_types, self.default_version);
        for (name, value) in &self.constants {
            spec = spec.constant(name.clone(), *value);
        }
        for entry in &self.overrides {
            spec = spec.override_entry(entry.resolve(registry)?);
        }
        Ok(spec)
    }
}

/// One configured override: the target slot addressed by index or by packet
/// name, the version as a literal or a named constant, and an optional note
/// flagging values that still need confirmation against the peer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OverrideEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OverrideEntry {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match (&self.index, &self.packet) {
            (None, None) => errors.push("needs either `index` or `packet`".to_string()),
            (Some(_), Some(_)) => errors.push("cannot set both `index` and `packet`".to_string()),
            _ => {}
        }

        match (&self.version, &self.constant) {
            (None, None) => errors.push("needs either `version` or `constant`".to_string()),
            (Some(_), Some(_)) => {
                errors.push("cannot set both `version` and `constant`".to_string());
            }
            _ => {}
        }

        errors
    }

    fn resolve(&self, registry: Option<&PacketTypeRegistry>) -> Result<VersionOverride> {
        let index = match (&self.index, &self.packet) {
            (Some(index), None) => *index,
            (None, Some(name)) => {
                let registry = registry.ok_or_else(|| {
                    ProtocolError::Config(format!(
                        "Override for packet `{name}` needs a packet-type list to resolve"
                    ))
                })?;
                registry.require(name)?
            }
            _ => {
                return Err(ProtocolError::Config(
                    "Override needs exactly one of `index` or `packet`".to_string(),
                ))
            }
        };

        let source = match (&self.version, &self.constant) {
            (Some(version), None) => VersionSource::Literal(*version),
            (None, Some(name)) => VersionSource::Named(name.clone()),
            _ => {
                return Err(ProtocolError::Config(
                    "Override needs exactly one of `version` or `constant`".to_string(),
                ))
            }
        };

        Ok(VersionOverride {
            index,
            source,
            note: self.note.clone(),
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("entity-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
