//! ASA Client - asset transactions and indexer queries
//!
//! Builds, groups, signs and submits standard-asset transactions, and
//! reshapes node, indexer and market responses into flat records.
//!
//! - [`tx_builder`]: transaction construction and the write-side [`TxService`]
//! - [`query`]: read-only account, asset, history and network services
//! - [`rpc`]: REST clients for node, indexer and market endpoints
//! - [`wallet`]: key handling and signing

pub mod address;
pub mod amount;
pub mod config;
pub mod error;
pub mod explorer;
pub mod metrics;
pub mod query;
pub mod rpc;
pub mod structured_logging;
pub mod time;
pub mod tx_builder;
pub mod wallet;

pub use address::{is_valid_address, Address, AddressError, ZERO_ADDRESS};
pub use amount::{Amount, AmountError};
pub use config::{ClientConfig, Network};
pub use error::{Error, Result};
pub use explorer::ExplorerLinks;
pub use query::{AccountQuery, AssetQuery, HistoryQuery, NetworkQuery};
pub use rpc::{IndexerClient, LedgerNode, MarketClient, NodeClient, RpcError};
pub use structured_logging::init_tracing;
pub use tx_builder::{FeeMode, ServiceFee, TxBuilder, TxService};
pub use wallet::{SignedTransaction, Wallet};
