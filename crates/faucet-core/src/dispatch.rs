//! value transfer from the node's first account
//!
//! one click is one attempt: nothing here retries. every failure is mapped to
//! a user-facing message that says what to do next.

use crate::address::truncate_address;
use crate::amount::Amount;
use crate::chains::network_label;
use crate::monitor::DEFAULT_PROBE_TIMEOUT;
use crate::rpc::{Confirmation, NodeConnector, NodeError};
use crate::settings::RpcConfig;
use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// command that starts a geth dev node the faucet can talk to
pub const GETH_DEV_COMMAND: &str =
    "geth --dev --http --http.api eth,web3,personal --http.corsdomain \"*\"";

/// everything needed to send one transfer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub config: RpcConfig,
    pub recipient: Address,
    pub amount: Amount,
    /// raw ens input, when the recipient came from a lookup
    pub ens_name: Option<String>,
    /// ens display-name text record
    pub display_name: Option<String>,
}

impl TransferRequest {
    /// display name, then ens input, then shortened address
    pub fn recipient_label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.ens_name.clone())
            .unwrap_or_else(|| truncate_address(&self.recipient))
    }
}

/// outcome of the last submit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    pub message: String,
    pub tx_hash: Option<TxHash>,
}

impl TransactionResult {
    pub fn success(message: impl Into<String>, tx_hash: TxHash) -> Self {
        Self {
            success: true,
            message: message.into(),
            tx_hash: Some(tx_hash),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            tx_hash: None,
        }
    }

    /// full 0x-prefixed hash
    pub fn tx_hash_hex(&self) -> Option<String> {
        self.tx_hash.map(|h| format!("{:?}", h))
    }
}

/// why a submit failed, as shown to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchFailure {
    /// transport error or timeout against the endpoint
    Unreachable,
    /// localhost endpoint while the faucet itself is served remotely
    LocalhostFromRemote,
    InsufficientFunds,
    NoAccounts,
    /// mined with failed status, or dropped before a receipt
    Failed,
    Other(String),
}

impl DispatchFailure {
    pub fn classify(error: &NodeError, config: &RpcConfig, public_deployment: bool) -> Self {
        if error.to_string().to_lowercase().contains("insufficient funds") {
            return DispatchFailure::InsufficientFunds;
        }
        if error.is_connectivity() || matches!(error, NodeError::InvalidEndpoint(_)) {
            if public_deployment && config.is_local() {
                return DispatchFailure::LocalhostFromRemote;
            }
            return DispatchFailure::Unreachable;
        }
        match error {
            NodeError::Rejected(message) | NodeError::Other(message) => {
                DispatchFailure::Other(message.clone())
            }
            other => DispatchFailure::Other(other.to_string()),
        }
    }

    pub fn message(&self, config: &RpcConfig, amount: Amount) -> String {
        match self {
            DispatchFailure::Unreachable => format!(
                "Cannot reach the RPC endpoint at {}. Start the local node with `{}` or switch to a public endpoint in settings.",
                config, GETH_DEV_COMMAND
            ),
            DispatchFailure::LocalhostFromRemote => format!(
                "This faucet is not running on your machine, so it cannot reach {}. Run the faucet locally next to your node, or switch to a public endpoint in settings.",
                config
            ),
            DispatchFailure::InsufficientFunds => format!(
                "The faucet account does not have enough ETH to send {} ETH plus gas.",
                amount
            ),
            DispatchFailure::NoAccounts => {
                "No accounts available. Make sure geth is running with the --dev flag.".into()
            }
            DispatchFailure::Failed => "Transaction failed.".into(),
            DispatchFailure::Other(detail) => format!("Transaction failed: {}", detail),
        }
    }
}

pub struct TransactionDispatcher {
    connector: Arc<dyn NodeConnector>,
    public_deployment: bool,
    /// bound on each call up to and including the send, not the confirmation
    timeout: Duration,
}

impl TransactionDispatcher {
    pub fn new(connector: Arc<dyn NodeConnector>) -> Self {
        Self {
            connector,
            public_deployment: false,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// the faucet is served from a non-local host
    pub fn with_public_deployment(mut self, public_deployment: bool) -> Self {
        self.public_deployment = public_deployment;
        self
    }

    /// send one transfer and wait for one confirmation
    pub async fn dispatch(&self, request: &TransferRequest) -> TransactionResult {
        match self.send(request).await {
            Ok(tx_hash) => {
                let message = format!(
                    "Successfully sent {} ETH to {}",
                    request.amount,
                    request.recipient_label()
                );
                info!("{} ({:?})", message, tx_hash);
                TransactionResult::success(message, tx_hash)
            }
            Err(failure) => {
                let message = failure.message(&request.config, request.amount);
                error!("transfer to {:?} failed: {}", request.recipient, message);
                TransactionResult::failure(message)
            }
        }
    }

    async fn send(&self, request: &TransferRequest) -> Result<TxHash, DispatchFailure> {
        let classify = |e: NodeError| {
            DispatchFailure::classify(&e, &request.config, self.public_deployment)
        };

        let node = self.connector.connect(&request.config).map_err(classify)?;

        let chain_id = self.bounded(node.chain_id()).await.map_err(classify)?;
        info!(
            "connected to {} (chain id {}) at {}",
            network_label(chain_id),
            chain_id,
            request.config
        );

        let accounts = self.bounded(node.accounts()).await.map_err(classify)?;
        let sender = *accounts.first().ok_or(DispatchFailure::NoAccounts)?;

        let tx_hash = self
            .bounded(node.send_transfer(sender, request.recipient, request.amount.to_wei()))
            .await
            .map_err(classify)?;
        info!("sent {} ETH from {:?}, waiting for confirmation", request.amount, sender);

        match node.await_confirmation(tx_hash).await.map_err(classify)? {
            Confirmation::Succeeded => Ok(tx_hash),
            Confirmation::Reverted | Confirmation::Dropped => Err(DispatchFailure::Failed),
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, NodeError>>,
    ) -> Result<T, NodeError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(NodeError::Timeout(self.timeout)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rpc::FaucetNode;
    use async_trait::async_trait;
    use ethers::types::U256;
    use parking_lot::Mutex;

    /// scripted dev node
    pub(crate) struct FakeNode {
        pub chain_id: u64,
        pub chain_id_delay: Option<Duration>,
        pub reachable: bool,
        pub accounts: Vec<Address>,
        pub send_error: Option<NodeError>,
        pub confirmation: Confirmation,
        pub sent: Arc<Mutex<Vec<(Address, Address, U256)>>>,
    }

    impl FakeNode {
        pub(crate) fn new(chain_id: u64) -> Self {
            Self {
                chain_id,
                chain_id_delay: None,
                reachable: true,
                accounts: vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)],
                send_error: None,
                confirmation: Confirmation::Succeeded,
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn check_reachable(&self) -> Result<(), NodeError> {
            if self.reachable {
                Ok(())
            } else {
                Err(NodeError::Transport("error sending request: connection refused".into()))
            }
        }
    }

    #[async_trait]
    impl FaucetNode for FakeNode {
        async fn chain_id(&self) -> Result<u64, NodeError> {
            if let Some(delay) = self.chain_id_delay {
                tokio::time::sleep(delay).await;
            }
            self.check_reachable()?;
            Ok(self.chain_id)
        }

        async fn accounts(&self) -> Result<Vec<Address>, NodeError> {
            self.check_reachable()?;
            Ok(self.accounts.clone())
        }

        async fn send_transfer(&self, from: Address, to: Address, value: U256) -> Result<TxHash, NodeError> {
            self.check_reachable()?;
            if let Some(e) = &self.send_error {
                return Err(e.clone());
            }
            self.sent.lock().push((from, to, value));
            Ok(TxHash::repeat_byte(0x42))
        }

        async fn await_confirmation(&self, _tx_hash: TxHash) -> Result<Confirmation, NodeError> {
            Ok(self.confirmation)
        }
    }

    pub(crate) struct FakeConnector {
        node: Arc<FakeNode>,
    }

    impl FakeConnector {
        pub(crate) fn new(node: FakeNode) -> Self {
            Self { node: Arc::new(node) }
        }

        pub(crate) fn unreachable() -> Self {
            let mut node = FakeNode::new(1337);
            node.reachable = false;
            Self::new(node)
        }
    }

    impl NodeConnector for FakeConnector {
        fn connect(&self, _config: &RpcConfig) -> Result<Arc<dyn FaucetNode>, NodeError> {
            Ok(self.node.clone())
        }
    }

    fn request(amount_tenths: u32) -> TransferRequest {
        TransferRequest {
            config: RpcConfig::default(),
            recipient: Address::repeat_byte(0x11),
            amount: Amount::from_tenths(amount_tenths).unwrap(),
            ens_name: None,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_sends_from_first_account() {
        let node = FakeNode::new(1337);
        let sent = node.sent.clone();
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)));

        let result = dispatcher.dispatch(&request(10)).await;
        assert!(result.success);
        assert_eq!(result.tx_hash, Some(TxHash::repeat_byte(0x42)));
        assert_eq!(result.message, "Successfully sent 1 ETH to 0x1111…1111");

        let sent = sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, Address::repeat_byte(0xaa));
        assert_eq!(sent[0].1, Address::repeat_byte(0x11));
        assert_eq!(sent[0].2, Amount::ONE_ETH.to_wei());
    }

    #[tokio::test]
    async fn test_success_prefers_display_name() {
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(FakeNode::new(1))));
        let mut req = request(10);
        req.ens_name = Some("vitalik.eth".into());
        req.display_name = Some("vitalik.eth".into());
        let result = dispatcher.dispatch(&req).await;
        assert_eq!(result.message, "Successfully sent 1 ETH to vitalik.eth");

        req.display_name = None;
        req.ens_name = Some("nick.eth".into());
        let result = dispatcher.dispatch(&req).await;
        assert_eq!(result.message, "Successfully sent 1 ETH to nick.eth");
    }

    #[tokio::test]
    async fn test_unreachable_mentions_endpoint() {
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::unreachable()));
        let result = dispatcher.dispatch(&request(1)).await;
        assert!(!result.success);
        assert!(result.tx_hash.is_none());
        assert!(result.message.contains("http://localhost:8545"));
        assert!(result.message.contains("geth --dev"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_endpoint_times_out() {
        let mut node = FakeNode::new(11155111);
        node.chain_id_delay = Some(Duration::from_secs(60));
        let sent = node.sent.clone();
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)))
            .with_timeout(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let result = dispatcher.dispatch(&request(1)).await;
        assert!(started.elapsed() < Duration::from_secs(60));
        assert!(!result.success);
        assert!(result.message.starts_with("Cannot reach the RPC endpoint"));
        assert!(sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_localhost_from_public_deployment() {
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::unreachable()))
            .with_public_deployment(true);
        let result = dispatcher.dispatch(&request(1)).await;
        assert!(result.message.contains("not running on your machine"));
    }

    #[tokio::test]
    async fn test_no_accounts() {
        let mut node = FakeNode::new(1337);
        node.accounts.clear();
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)));
        let result = dispatcher.dispatch(&request(1)).await;
        assert!(result.message.starts_with("No accounts available"));
    }

    #[tokio::test]
    async fn test_insufficient_funds() {
        let mut node = FakeNode::new(1337);
        node.send_error = Some(NodeError::Rejected(
            "insufficient funds for gas * price + value".into(),
        ));
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)));
        let result = dispatcher.dispatch(&request(100)).await;
        assert!(!result.success);
        assert!(result.message.contains("does not have enough ETH to send 10 ETH"));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_generic_failure() {
        let mut node = FakeNode::new(1337);
        node.confirmation = Confirmation::Reverted;
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)));
        let result = dispatcher.dispatch(&request(1)).await;
        assert_eq!(result, TransactionResult::failure("Transaction failed."));
    }

    #[tokio::test]
    async fn test_other_rejection_keeps_detail() {
        let mut node = FakeNode::new(1337);
        node.send_error = Some(NodeError::Rejected("authentication needed: password or unlock".into()));
        let dispatcher = TransactionDispatcher::new(Arc::new(FakeConnector::new(node)));
        let result = dispatcher.dispatch(&request(1)).await;
        assert_eq!(
            result.message,
            "Transaction failed: authentication needed: password or unlock"
        );
    }

    #[test]
    fn test_tx_hash_hex_is_full_length() {
        let result = TransactionResult::success("ok", TxHash::repeat_byte(0x42));
        assert_eq!(result.tx_hash_hex().unwrap().len(), 66);
    }
}
