//! faucet-core: logic behind the ethereum dev faucet
//!
//! the faucet asks a development node (geth --dev, anvil, or a public testnet
//! rpc) to send a value transfer from its first unlocked account. signing and
//! rpc are delegated to `ethers`; this crate owns validation, ens lookup,
//! connection probing, dispatch and settings persistence.
//!
//! ## layout
//!
//! ```text
//! core (Event -> Vec<Effect>, pure)
//! ├── address   recipient classification
//! ├── amount    bounded, quantized transfer amount
//! ├── ens       gateway fallback resolver
//! ├── monitor   chain id probe + labels (chains)
//! ├── dispatch  send + confirm + failure classification
//! └── settings  rpc config, presets, draft dialog (storage)
//! ```
//!
//! the shell (egui binary) executes effects and feeds results back as events.
//! generation tokens on every async result keep stale completions from
//! overwriting newer state.

pub mod address;
pub mod amount;
pub mod chains;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod ens;
pub mod monitor;
pub mod request;
pub mod rpc;
pub mod settings;
pub mod storage;

pub use address::{classify, truncate_address, RecipientKind};
pub use amount::Amount;
pub use config::FaucetConfig;
pub use crate::core::{Effect, Event, FaucetCore, NotificationLevel};
pub use dispatch::{TransactionDispatcher, TransactionResult, TransferRequest};
pub use ens::{EnsError, EnsProfile, EnsResolver};
pub use monitor::{ConnectionMonitor, ConnectionStatus};
pub use request::{Generation, GenerationCounter, RequestState};
pub use settings::{RpcConfig, SettingsDialog, SettingsStore, PRESETS};
pub use storage::{KeyValueStore, MemoryStore, SledStore};
