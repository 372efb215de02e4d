//! rpc endpoint settings, presets, and the editable draft
//!
//! the active [`RpcConfig`] always yields a well-formed url: host is validated
//! when a draft is committed and when values are read back from storage.

use crate::storage::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};
use url::Url;

pub const KEY_HOST: &str = "rpc_host";
pub const KEY_PORT: &str = "rpc_port";
pub const KEY_USE_TLS: &str = "rpc_use_tls";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8545;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("invalid host: {0}")]
    InvalidHost(String),
    #[error("invalid port: {0}")]
    InvalidPort(String),
    #[error("settings dialog is not open")]
    NoDraft,
}

/// user-editable rpc endpoint
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RpcConfig {
    pub host: String,
    pub port: Option<u16>,
    pub use_tls: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: Some(DEFAULT_PORT),
            use_tls: false,
        }
    }
}

impl RpcConfig {
    /// build and validate a config
    pub fn new(host: &str, port: Option<u16>, use_tls: bool) -> Result<Self, SettingsError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(SettingsError::EmptyHost);
        }
        if host.contains("://") || host.contains('/') || host.contains(char::is_whitespace) {
            return Err(SettingsError::InvalidHost(host.to_string()));
        }
        let config = Self {
            host: host.to_string(),
            port,
            use_tls,
        };
        Url::parse(&config.endpoint_string())
            .map_err(|e| SettingsError::InvalidHost(format!("{}: {}", host, e)))?;
        Ok(config)
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_tls {
            "https"
        } else {
            "http"
        }
    }

    /// `{scheme}://{host}[:{port}]`
    pub fn endpoint_string(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme(), self.host, port),
            None => format!("{}://{}", self.scheme(), self.host),
        }
    }

    /// true for loopback hosts
    pub fn is_local(&self) -> bool {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        host.eq_ignore_ascii_case("localhost")
            || host.starts_with("127.")
            || host == "::1"
            || host == "0.0.0.0"
    }
}

impl fmt::Display for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint_string())
    }
}

/// named endpoint in the preset catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub host: &'static str,
    pub port: Option<u16>,
    pub use_tls: bool,
}

impl Preset {
    pub fn config(&self) -> RpcConfig {
        RpcConfig {
            host: self.host.to_string(),
            port: self.port,
            use_tls: self.use_tls,
        }
    }
}

/// fixed preset catalog
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Local Geth (dev)",
        host: DEFAULT_HOST,
        port: Some(DEFAULT_PORT),
        use_tls: false,
    },
    Preset {
        name: "Sepolia",
        host: "ethereum-sepolia-rpc.publicnode.com",
        port: None,
        use_tls: true,
    },
    Preset {
        name: "Holesky",
        host: "ethereum-holesky-rpc.publicnode.com",
        port: None,
        use_tls: true,
    },
    Preset {
        name: "Hoodi",
        host: "ethereum-hoodi-rpc.publicnode.com",
        port: None,
        use_tls: true,
    },
];

/// text-field state of the settings dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsDraft {
    pub host: String,
    pub port: String,
    pub use_tls: bool,
}

impl From<&RpcConfig> for SettingsDraft {
    fn from(config: &RpcConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.map(|p| p.to_string()).unwrap_or_default(),
            use_tls: config.use_tls,
        }
    }
}

impl SettingsDraft {
    /// validate into a config; an empty port means "scheme default"
    pub fn to_config(&self) -> Result<RpcConfig, SettingsError> {
        RpcConfig::new(&self.host, parse_port(&self.port)?, self.use_tls)
    }

    /// preset whose values match the draft, if any
    pub fn matching_preset(&self) -> Option<&'static Preset> {
        let config = self.to_config().ok()?;
        PRESETS.iter().find(|p| p.config() == config)
    }
}

fn parse_port(raw: &str) -> Result<Option<u16>, SettingsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(SettingsError::InvalidPort(raw.to_string())),
        Ok(port) => Ok(Some(port)),
    }
}

/// settings dialog: an optional draft seeded from the current config
#[derive(Clone, Debug, Default)]
pub struct SettingsDialog {
    draft: Option<SettingsDraft>,
}

impl SettingsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&SettingsDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut SettingsDraft> {
        self.draft.as_mut()
    }

    /// open a fresh draft from the active config
    pub fn open(&mut self, current: &RpcConfig) {
        self.draft = Some(SettingsDraft::from(current));
    }

    /// overwrite the draft with a preset
    pub fn apply_preset(&mut self, preset: &Preset) {
        if let Some(draft) = self.draft.as_mut() {
            *draft = SettingsDraft::from(&preset.config());
        }
    }

    /// restore the local default into the draft only
    pub fn reset(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            *draft = SettingsDraft::from(&RpcConfig::default());
        }
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// validate the draft and close the dialog; on error the draft stays open
    pub fn commit(&mut self) -> Result<RpcConfig, SettingsError> {
        let draft = self.draft.as_ref().ok_or(SettingsError::NoDraft)?;
        let config = draft.to_config()?;
        self.draft = None;
        Ok(config)
    }
}

/// persistence of the active rpc config
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// read the persisted config; invalid or missing values fall back to defaults
    pub fn load(&self) -> Result<RpcConfig, StorageError> {
        let defaults = RpcConfig::default();

        let host = self.store.get(KEY_HOST)?;
        let port = self.store.get(KEY_PORT)?;
        let use_tls = self.store.get(KEY_USE_TLS)?;

        if host.is_none() && port.is_none() && use_tls.is_none() {
            return Ok(defaults);
        }

        let host = host.unwrap_or_else(|| defaults.host.clone());
        let port = match port {
            Some(raw) => parse_port(&raw).unwrap_or_else(|e| {
                warn!("ignoring stored port: {}", e);
                defaults.port
            }),
            None => defaults.port,
        };
        let use_tls = use_tls.map(|v| v == "true").unwrap_or(defaults.use_tls);

        match RpcConfig::new(&host, port, use_tls) {
            Ok(config) => {
                info!("loaded rpc settings: {}", config);
                Ok(config)
            }
            Err(e) => {
                warn!("stored rpc settings invalid ({}), using defaults", e);
                Ok(defaults)
            }
        }
    }

    /// write all three entries and flush
    pub fn save(&self, config: &RpcConfig) -> Result<(), StorageError> {
        self.store.set(KEY_HOST, &config.host)?;
        self.store.set(
            KEY_PORT,
            &config.port.map(|p| p.to_string()).unwrap_or_default(),
        )?;
        self.store
            .set(KEY_USE_TLS, if config.use_tls { "true" } else { "false" })?;
        self.store.flush()?;
        info!("saved rpc settings: {}", config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SledStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_default_endpoint() {
        assert_eq!(RpcConfig::default().endpoint_string(), "http://localhost:8545");
        assert!(RpcConfig::default().is_local());
    }

    #[test]
    fn test_endpoint_without_port() {
        let config = PRESETS[1].config();
        assert_eq!(
            config.endpoint_string(),
            "https://ethereum-sepolia-rpc.publicnode.com"
        );
        assert!(!config.is_local());
    }

    #[test]
    fn test_rejects_malformed_hosts() {
        assert_eq!(RpcConfig::new("  ", None, false), Err(SettingsError::EmptyHost));
        assert!(matches!(
            RpcConfig::new("http://x", None, false),
            Err(SettingsError::InvalidHost(_))
        ));
        assert!(matches!(
            RpcConfig::new("a b", None, false),
            Err(SettingsError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in PRESETS {
            let config = preset.config();
            assert_eq!(
                RpcConfig::new(&config.host, config.port, config.use_tls).unwrap(),
                config
            );
        }
    }

    #[test]
    fn test_dialog_preset_reset_cancel() {
        let current = PRESETS[2].config();
        let mut dialog = SettingsDialog::new();
        dialog.open(&current);
        assert_eq!(dialog.draft().unwrap().matching_preset(), Some(&PRESETS[2]));

        dialog.apply_preset(&PRESETS[1]);
        assert_eq!(dialog.draft().unwrap().host, PRESETS[1].host);

        dialog.reset();
        assert_eq!(dialog.draft().unwrap(), &SettingsDraft::from(&RpcConfig::default()));

        dialog.cancel();
        assert!(!dialog.is_open());
        assert_eq!(dialog.commit(), Err(SettingsError::NoDraft));
    }

    #[test]
    fn test_commit_keeps_draft_on_error() {
        let mut dialog = SettingsDialog::new();
        dialog.open(&RpcConfig::default());
        dialog.draft_mut().unwrap().port = "99999".into();
        assert!(matches!(dialog.commit(), Err(SettingsError::InvalidPort(_))));
        assert!(dialog.is_open());

        dialog.draft_mut().unwrap().port = "".into();
        let config = dialog.commit().unwrap();
        assert_eq!(config.port, None);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_store_roundtrip_memory() {
        let store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.load().unwrap(), RpcConfig::default());

        let config = RpcConfig::new("10.0.0.2", None, true).unwrap();
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_store_survives_reload() {
        let dir = tempdir().unwrap();
        let config = PRESETS[3].config();

        {
            let store = SettingsStore::new(SledStore::open(dir.path()).unwrap());
            store.save(&config).unwrap();
        }

        let store = SettingsStore::new(SledStore::open(dir.path()).unwrap());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(KEY_HOST, "bad host").unwrap();
        backend.set(KEY_PORT, "nope").unwrap();
        let store = SettingsStore::new(backend.clone());
        assert_eq!(store.load().unwrap(), RpcConfig::default());

        backend.set(KEY_HOST, "node.internal").unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.host, "node.internal");
        assert_eq!(loaded.port, Some(DEFAULT_PORT));
    }
}
