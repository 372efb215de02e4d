//! connection probe against the configured endpoint

use crate::chains::network_label;
use crate::rpc::{NodeConnector, NodeError};
use crate::settings::RpcConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// result of one probe
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub chain_id: Option<u64>,
    pub network: Option<String>,
}

impl ConnectionStatus {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(chain_id: u64) -> Self {
        Self {
            connected: true,
            chain_id: Some(chain_id),
            network: Some(network_label(chain_id)),
        }
    }

    /// badge text
    pub fn label(&self) -> String {
        match (&self.network, self.connected) {
            (Some(network), true) => format!("Connected to {}", network),
            (None, true) => "Connected".into(),
            (_, false) => "Not Connected".into(),
        }
    }
}

pub struct ConnectionMonitor {
    connector: Arc<dyn NodeConnector>,
    timeout: Duration,
}

impl ConnectionMonitor {
    pub fn new(connector: Arc<dyn NodeConnector>) -> Self {
        Self {
            connector,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// query the chain id; any failure or timeout reports not connected
    pub async fn probe(&self, config: &RpcConfig) -> ConnectionStatus {
        match self.chain_id(config).await {
            Ok(chain_id) => {
                let status = ConnectionStatus::connected(chain_id);
                info!("probe {}: chain {} ({})", config, chain_id, status.label());
                status
            }
            Err(e) => {
                warn!("probe {} failed: {}", config, e);
                ConnectionStatus::disconnected()
            }
        }
    }

    async fn chain_id(&self, config: &RpcConfig) -> Result<u64, NodeError> {
        let node = self.connector.connect(config)?;
        tokio::time::timeout(self.timeout, node.chain_id())
            .await
            .unwrap_or(Err(NodeError::Timeout(self.timeout)))
    }
}
