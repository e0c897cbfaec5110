//! Read-only query services
//!
//! Each service holds immutable REST clients and reshapes nested responses
//! into the flat records of [`records`].
//!
//! When a success response lacks its top-level key (`account`, `asset`,
//! `transaction`, `transactions`, `balances`, ...) the service returns the
//! record's default instead of failing. Every such substitution is logged at
//! WARN and counted in `query_defaults_total`, so an empty record can be
//! told apart from a genuinely empty value by watching either.

pub mod account;
pub mod asset;
pub mod history;
pub mod network;
pub mod records;

pub use account::AccountQuery;
pub use asset::AssetQuery;
pub use history::HistoryQuery;
pub use network::NetworkQuery;
pub use records::{
    AccountSummary, AlgoBalance, AssetSummary, CreatedAsset, NftHolder, TokenHolding,
    TransactionDetail, TransferHistory, TransferRecord,
};

use crate::amount::Amount;
use crate::error::Result;
use crate::metrics::metrics;
use crate::rpc::NodeClient;
use crate::structured_logging::StructuredLogger;
use crate::tx_builder::AssetId;

/// Name of the native currency in transaction details
pub const NATIVE_NAME: &str = "ALGO";

/// Record the substitution of a default for a missing response key
pub(crate) fn shape_default<T: Default>(logger: &StructuredLogger, endpoint: &str, key: &str) -> T {
    let full = std::any::type_name::<T>();
    let record = full.rsplit("::").next().unwrap_or(full).trim_end_matches('>');
    metrics().record_default(record);
    logger.log_shape_default(endpoint, key, record);
    T::default()
}

/// Name, unit and precision of an asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AssetLabel {
    pub name: String,
    pub unit: String,
    pub decimals: u64,
}

impl AssetLabel {
    pub fn amount(&self, raw: u64) -> Amount {
        Amount::lenient(raw, self.decimals)
    }
}

/// Look up an asset's label on the node; empty label if the node has no params for it
pub(crate) async fn asset_label(
    node: &NodeClient,
    logger: &StructuredLogger,
    asset_id: AssetId,
) -> Result<AssetLabel> {
    match node.asset(asset_id).await? {
        Some(asset) => Ok(AssetLabel {
            name: asset.params.name,
            unit: asset.params.unit_name,
            decimals: asset.params.decimals,
        }),
        None => Ok(shape_default(
            logger,
            &node.endpoint().url(&format!("/v2/assets/{}", asset_id)),
            "params",
        )),
    }
}
