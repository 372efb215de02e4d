//! faucet configuration file
//!
//! the rpc endpoint is not configured here: it is user-editable at runtime and
//! persisted by [`crate::settings::SettingsStore`].

use crate::ens::{DEFAULT_DEBOUNCE, DEFAULT_ENS_GATEWAYS};
use crate::monitor::DEFAULT_PROBE_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("ens_debounce_ms must be greater than zero")]
    ZeroDebounce,

    #[error("probe_timeout_secs must be greater than zero")]
    ZeroProbeTimeout,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// where the settings database lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    pub ens_debounce_ms: u64,
    pub probe_timeout_secs: u64,
    /// mainnet endpoints for ens lookups, tried in order
    pub ens_gateways: Vec<String>,
    /// set when the faucet is served from a machine other than the node's
    pub public_deployment: bool,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            ens_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            ens_gateways: DEFAULT_ENS_GATEWAYS.iter().map(|s| s.to_string()).collect(),
            public_deployment: false,
        }
    }
}

impl FaucetConfig {
    /// parse toml and validate
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let config: FaucetConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ens_debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::ZeroProbeTimeout);
        }
        Ok(())
    }

    pub fn ens_debounce(&self) -> Duration {
        Duration::from_millis(self.ens_debounce_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
