//! ens resolution over a fixed list of public mainnet gateways
//!
//! gateways are tried in order: reachability first, then the name. the first
//! non-zero address wins and the profile text records are fetched from that
//! same gateway, each one allowed to fail on its own.

use crate::rpc::{EnsGateway, EthersEnsGateway, NodeError};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// public read-only mainnet endpoints, in fallback order
pub const DEFAULT_ENS_GATEWAYS: &[&str] = &[
    "https://eth.llamarpc.com",
    "https://ethereum-rpc.publicnode.com",
    "https://cloudflare-eth.com",
    "https://rpc.ankr.com/eth",
];

/// quiet period after the last keystroke before a lookup starts
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// per-call timeout against a gateway
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(5);

pub const TEXT_AVATAR: &str = "avatar";
pub const TEXT_DISPLAY_NAME: &str = "name";
pub const TEXT_DESCRIPTION: &str = "description";

/// resolved name with optional profile records
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsProfile {
    pub name: String,
    pub address: Address,
    pub avatar: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EnsError {
    #[error("could not reach any ENS gateway, check your network connection")]
    Offline,

    #[error("{0} is not registered or has no address record")]
    NotRegistered(String),

    #[error("no ENS gateways configured")]
    NoGateways,
}

pub struct EnsResolver {
    gateways: Vec<Arc<dyn EnsGateway>>,
    timeout: Duration,
}

impl EnsResolver {
    pub fn new(gateways: Vec<Arc<dyn EnsGateway>>) -> Self {
        Self {
            gateways,
            timeout: GATEWAY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// ethers-backed resolver; unparseable endpoints are skipped with a warning
    pub fn from_endpoints<S: AsRef<str>>(endpoints: &[S]) -> Self {
        let gateways = endpoints
            .iter()
            .filter_map(|endpoint| match EthersEnsGateway::new(endpoint.as_ref()) {
                Ok(gateway) => Some(Arc::new(gateway) as Arc<dyn EnsGateway>),
                Err(e) => {
                    warn!("skipping ens gateway: {}", e);
                    None
                }
            })
            .collect();
        Self::new(gateways)
    }

    pub fn mainnet() -> Self {
        Self::from_endpoints(DEFAULT_ENS_GATEWAYS)
    }

    pub fn gateway_count(&self) -> usize {
        self.gateways.len()
    }

    /// resolve `name` to an address plus best-effort profile
    pub async fn resolve(&self, name: &str) -> Result<EnsProfile, EnsError> {
        if self.gateways.is_empty() {
            return Err(EnsError::NoGateways);
        }

        let mut reachable = false;

        for gateway in &self.gateways {
            debug!("ens: trying {} for {}", gateway.endpoint(), name);

            if let Err(e) = self.timed(gateway.probe()).await {
                debug!("ens: {} unreachable: {}", gateway.endpoint(), e);
                continue;
            }
            reachable = true;

            match self.timed(gateway.resolve_name(name)).await {
                Ok(Some(address)) => {
                    info!("ens: {} -> {:?} via {}", name, address, gateway.endpoint());
                    return Ok(self.profile(gateway.as_ref(), name, address).await);
                }
                Ok(None) => debug!("ens: {} has no address on {}", name, gateway.endpoint()),
                Err(e) => debug!("ens: lookup failed on {}: {}", gateway.endpoint(), e),
            }
        }

        if reachable {
            Err(EnsError::NotRegistered(name.to_string()))
        } else {
            warn!("ens: no gateway reachable");
            Err(EnsError::Offline)
        }
    }

    async fn profile(&self, gateway: &dyn EnsGateway, name: &str, address: Address) -> EnsProfile {
        let (avatar, display_name, description) = futures::join!(
            self.text(gateway, name, TEXT_AVATAR),
            self.text(gateway, name, TEXT_DISPLAY_NAME),
            self.text(gateway, name, TEXT_DESCRIPTION),
        );
        EnsProfile {
            name: name.to_string(),
            address,
            avatar,
            display_name,
            description,
        }
    }

    async fn text(&self, gateway: &dyn EnsGateway, name: &str, key: &str) -> Option<String> {
        match self.timed(gateway.text_record(name, key)).await {
            Ok(value) => value,
            Err(e) => {
                debug!("ens: {} record for {} unavailable: {}", key, name, e);
                None
            }
        }
    }

    async fn timed<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, NodeError>>,
    ) -> Result<T, NodeError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or(Err(NodeError::Timeout(self.timeout)))
    }
}
