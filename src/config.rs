use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Runtime configuration parsed from a TOML document.
///
/// Read-only after load and owned by the [`System`](crate::System) that
/// parsed it. Accepted sources are a file path or a `file://` URL; any
/// other URL scheme is rejected before a read is attempted.
///
/// ```toml
/// realm = "dev"
///
/// [node]
/// channel_size = 128
///
/// [rpc]
/// default_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the realm this system joins. Used by the runtime for
    /// isolation between deployments.
    pub realm: String,

    pub node: NodeConfig,

    pub rpc: RpcConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Mailbox buffer size per actor. When full, inbound deliveries apply
    /// backpressure to the sender.
    /// Default: 128
    pub channel_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
    /// Call budget applied when the caller does not override it per call.
    /// Default: 30 000 ms
    pub default_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            realm: "default".into(),
            node: NodeConfig::default(),
            rpc: RpcConfig::default(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig { channel_size: 128 }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        RpcConfig {
            default_timeout_ms: 30_000,
        }
    }
}

impl Config {
    /// Parse a configuration from raw TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.node.channel_size == 0 {
            return Err(Error::config("node.channel_size must be at least 1"));
        }
        Ok(())
    }

    /// Load a configuration from a TOML file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!(
                "cannot read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration from a `file://` URL.
    ///
    /// Non-file URLs fail with [`Error::Config`] before any read.
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_file(file_url_to_path(url)?)
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Set the mailbox buffer size for actors.
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.node.channel_size = size;
        self
    }

    /// Set the default RPC call budget in milliseconds.
    pub fn with_default_timeout_ms(mut self, ms: u64) -> Self {
        self.rpc.default_timeout_ms = ms;
        self
    }
}

fn file_url_to_path(url: &str) -> Result<&str> {
    if let Some(path) = url.strip_prefix("file://") {
        // file://host/path is not supported; only local files.
        if path.starts_with('/') {
            return Ok(path);
        }
        return Err(Error::config(format!(
            "file URL must be absolute, got '{url}'"
        )));
    }
    Err(Error::config(format!(
        "config source must be a file path or file:// URL, got '{url}'"
    )))
}
