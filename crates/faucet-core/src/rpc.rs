//! json-rpc seams over `ethers`
//!
//! [`FaucetNode`] is the configured development node, [`EnsGateway`] a
//! read-only mainnet endpoint used for name lookups. both are traits so the
//! resolver, monitor and dispatcher can be driven by in-memory fakes in tests.

use crate::settings::RpcConfig;
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider, ProviderError, RpcError};
use ethers::types::{Address, TransactionRequest, TxHash, U256, U64};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// receipt polling interval; dev nodes mine instantly
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("node rejected request: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

impl NodeError {
    /// the endpoint could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, NodeError::Transport(_) | NodeError::Timeout(_))
    }
}

impl From<ProviderError> for NodeError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::JsonRpcClientError(inner) => {
                if let Some(response) = inner.as_error_response() {
                    NodeError::Rejected(response.message.clone())
                } else if inner.as_serde_error().is_some() {
                    NodeError::Other(inner.to_string())
                } else {
                    NodeError::Transport(inner.to_string())
                }
            }
            ProviderError::HTTPError(e) => NodeError::Transport(e.to_string()),
            other => NodeError::Other(other.to_string()),
        }
    }
}

/// outcome of waiting for one confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    /// mined with status 1
    Succeeded,
    /// mined with status 0
    Reverted,
    /// receipt never appeared
    Dropped,
}

/// development node that signs with its own accounts
#[async_trait]
pub trait FaucetNode: Send + Sync {
    async fn chain_id(&self) -> Result<u64, NodeError>;

    async fn accounts(&self) -> Result<Vec<Address>, NodeError>;

    /// submit an unsigned value transfer for the node to sign
    async fn send_transfer(&self, from: Address, to: Address, value: U256) -> Result<TxHash, NodeError>;

    /// block until the transaction has one confirmation
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, NodeError>;
}

/// opens a node handle for a config
pub trait NodeConnector: Send + Sync {
    fn connect(&self, config: &RpcConfig) -> Result<Arc<dyn FaucetNode>, NodeError>;
}

/// read-only mainnet endpoint for ens
#[async_trait]
pub trait EnsGateway: Send + Sync {
    fn endpoint(&self) -> &str;

    /// reachability check, returns chain id
    async fn probe(&self) -> Result<u64, NodeError>;

    /// `None` when the name has no resolver or resolves to zero
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>, NodeError>;

    /// `None` when the record is unset or empty
    async fn text_record(&self, name: &str, key: &str) -> Result<Option<String>, NodeError>;
}

fn http_provider(url: &str) -> Result<Provider<Http>, NodeError> {
    Provider::<Http>::try_from(url)
        .map(|p| p.interval(POLL_INTERVAL))
        .map_err(|e| NodeError::InvalidEndpoint(format!("{}: {}", url, e)))
}

/// ethers http provider as a faucet node
pub struct EthersNode {
    provider: Provider<Http>,
}

impl EthersNode {
    pub fn new(config: &RpcConfig) -> Result<Self, NodeError> {
        Ok(Self {
            provider: http_provider(&config.endpoint_string())?,
        })
    }
}

#[async_trait]
impl FaucetNode for EthersNode {
    async fn chain_id(&self) -> Result<u64, NodeError> {
        let id = self.provider.get_chainid().await?;
        Ok(id.low_u64())
    }

    async fn accounts(&self) -> Result<Vec<Address>, NodeError> {
        Ok(self.provider.get_accounts().await?)
    }

    async fn send_transfer(&self, from: Address, to: Address, value: U256) -> Result<TxHash, NodeError> {
        let tx = TransactionRequest::new().from(from).to(to).value(value);
        let pending = self.provider.send_transaction(tx, None).await?;
        let hash = pending.tx_hash();
        debug!("submitted transfer {:?}", hash);
        Ok(hash)
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation, NodeError> {
        let receipt = PendingTransaction::new(tx_hash, &self.provider)
            .confirmations(1)
            .await?;
        Ok(match receipt {
            Some(receipt) if receipt.status == Some(U64::from(1)) => Confirmation::Succeeded,
            Some(_) => Confirmation::Reverted,
            None => Confirmation::Dropped,
        })
    }
}

/// connects [`EthersNode`]s
#[derive(Clone, Copy, Debug, Default)]
pub struct EthersConnector;

impl NodeConnector for EthersConnector {
    fn connect(&self, config: &RpcConfig) -> Result<Arc<dyn FaucetNode>, NodeError> {
        Ok(Arc::new(EthersNode::new(config)?))
    }
}

/// ethers http provider as an ens gateway
pub struct EthersEnsGateway {
    endpoint: String,
    provider: Provider<Http>,
}

impl EthersEnsGateway {
    pub fn new(endpoint: &str) -> Result<Self, NodeError> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            provider: http_provider(endpoint)?,
        })
    }
}

#[async_trait]
impl EnsGateway for EthersEnsGateway {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn probe(&self) -> Result<u64, NodeError> {
        let id = self.provider.get_chainid().await?;
        Ok(id.low_u64())
    }

    async fn resolve_name(&self, name: &str) -> Result<Option<Address>, NodeError> {
        match self.provider.resolve_name(name).await {
            Ok(address) if address.is_zero() => Ok(None),
            Ok(address) => Ok(Some(address)),
            Err(ProviderError::EnsError(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn text_record(&self, name: &str, key: &str) -> Result<Option<String>, NodeError> {
        let value = self.provider.resolve_field(name, key).await?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_builds_from_config() {
        assert!(EthersConnector.connect(&RpcConfig::default()).is_ok());
    }

    #[test]
    fn test_gateway_rejects_garbage_url() {
        assert!(matches!(
            EthersEnsGateway::new("not a url"),
            Err(NodeError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(NodeError::Transport("refused".into()).is_connectivity());
        assert!(NodeError::Timeout(Duration::from_secs(5)).is_connectivity());
        assert!(!NodeError::Rejected("insufficient funds".into()).is_connectivity());
    }
}
