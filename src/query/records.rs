//! Flat records returned by the query services
//!
//! Every field has an explicit default (empty string, zero, `false`) so
//! callers never walk nested optional paths. Addresses are kept as the
//! strings the services returned.

use crate::amount::Amount;
use crate::tx_builder::AssetId;
use serde::Serialize;

/// Native-currency balance of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlgoBalance {
    pub balance: Amount,
    pub asset_count: u64,
    /// Balance above the account's minimum balance
    pub spendable: Amount,
}

/// One asset held by an account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenHolding {
    pub asset_id: AssetId,
    pub name: String,
    pub unit: String,
    pub decimals: u8,
    pub amount: Amount,
    pub is_frozen: bool,
}

/// Combined node and indexer view of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountSummary {
    pub address: String,
    pub balance: Amount,
    pub min_balance: Amount,
    pub pending_rewards: Amount,
    pub status: String,
    pub asset_count: u64,
    pub app_count: u64,
    pub created_asset_count: u64,
    pub created_app_count: u64,
    pub date_created: String,
    pub block_created: u64,
    pub is_deleted: bool,
    pub sig_type: String,
}

/// An asset created by an account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatedAsset {
    pub asset_id: AssetId,
    pub name: String,
    pub unit: String,
    pub url: String,
    pub date_created: String,
}

/// Asset parameters with best-effort market figures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetSummary {
    pub asset_id: AssetId,
    pub name: String,
    pub unit: String,
    pub url: String,
    pub date_created: String,
    pub creator: String,
    pub manager: String,
    pub reserve: String,
    pub freeze: String,
    pub clawback: String,
    pub supply: Amount,
    pub decimals: u8,
    pub default_frozen: bool,
    pub is_deleted: bool,
    pub price_usd: f64,
    pub description: String,
    pub circulating_supply: Amount,
    pub burned_supply: Amount,
    pub market_cap: f64,
}

/// A payment or asset transfer seen from one account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferRecord {
    pub txid: String,
    pub sender: String,
    pub receiver: String,
    /// 0 for native-currency payments
    pub asset_id: AssetId,
    pub asset_name: String,
    pub unit: String,
    pub amount: Amount,
    pub fee: Amount,
    pub timestamp: String,
    pub tx_type: String,
    pub link: String,
}

/// Transfers split by direction relative to the queried account
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferHistory {
    pub sent: Vec<TransferRecord>,
    pub received: Vec<TransferRecord>,
}

impl TransferHistory {
    pub(crate) fn push(&mut self, account: &str, record: TransferRecord) {
        if record.sender == account {
            self.sent.push(record);
        } else {
            self.received.push(record);
        }
    }

    pub fn len(&self) -> usize {
        self.sent.len() + self.received.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Details of one confirmed transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionDetail {
    pub txid: String,
    pub sender: String,
    pub receiver: String,
    pub asset_id: AssetId,
    /// Asset name, or the native currency's name for payments
    pub name: String,
    pub amount: Amount,
    pub fee: Amount,
    pub timestamp: String,
    pub tx_type: String,
    pub note: String,
    pub confirmed_round: u64,
}

/// The account holding a unique NFT
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NftHolder {
    pub address: String,
    pub amount: u64,
}
