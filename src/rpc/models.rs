//! Response shapes of the node and indexer REST APIs
//!
//! Every field defaults when absent: the services omit zero values and
//! unset addresses, and these shapes mirror that.

use serde::Deserialize;

/// `GET /v2/transactions/params` on the node
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransactionParamsResponse {
    pub consensus_version: String,
    pub fee: u64,
    /// base64
    pub genesis_hash: String,
    pub genesis_id: String,
    pub last_round: u64,
    pub min_fee: u64,
}

/// One asset holding of an account
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetHolding {
    pub asset_id: u64,
    pub amount: u64,
    pub is_frozen: bool,
}

/// Account snapshot from the node (`GET /v2/accounts/{addr}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct NodeAccount {
    pub address: String,
    pub amount: u64,
    pub min_balance: u64,
    pub pending_rewards: u64,
    pub status: String,
    pub total_assets_opted_in: u64,
    pub total_apps_opted_in: u64,
    pub total_created_assets: u64,
    pub total_created_apps: u64,
    pub assets: Vec<AssetHolding>,
}

/// Parameters of an asset as reported by node and indexer
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetParamsModel {
    pub creator: String,
    pub decimals: u64,
    pub default_frozen: bool,
    pub total: u64,
    pub name: String,
    pub unit_name: String,
    pub url: String,
    pub metadata_hash: Option<String>,
    pub manager: Option<String>,
    pub reserve: Option<String>,
    pub freeze: Option<String>,
    pub clawback: Option<String>,
}

/// An asset record (`GET /v2/assets/{id}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetModel {
    pub index: u64,
    pub created_at_round: u64,
    pub deleted: bool,
    pub params: AssetParamsModel,
}

/// Account record from the indexer (`GET /v2/accounts/{addr}` → `account`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexerAccount {
    pub address: String,
    pub amount: u64,
    pub pending_rewards: u64,
    pub status: String,
    pub created_at_round: u64,
    pub deleted: bool,
    pub sig_type: String,
    pub assets: Vec<AssetHolding>,
    pub created_assets: Vec<AssetModel>,
}

/// A holder of an asset (`GET /v2/assets/{id}/balances` → `balances`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BalanceEntry {
    pub address: String,
    pub amount: u64,
    pub is_frozen: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct PaymentFields {
    pub receiver: String,
    pub amount: u64,
    pub close_remainder_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetTransferFields {
    pub asset_id: u64,
    pub amount: u64,
    pub receiver: String,
    pub close_to: Option<String>,
    pub sender: Option<String>,
}

/// A confirmed transaction from the indexer
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexerTransaction {
    pub id: String,
    pub sender: String,
    pub fee: u64,
    pub tx_type: String,
    pub round_time: u64,
    pub confirmed_round: u64,
    /// base64
    pub note: Option<String>,
    pub created_asset_index: Option<u64>,
    pub payment_transaction: Option<PaymentFields>,
    pub asset_transfer_transaction: Option<AssetTransferFields>,
}

/// Block header fields the query layer uses (`GET /v2/blocks/{round}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BlockModel {
    pub round: u64,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_account_decodes() {
        let account: NodeAccount = serde_json::from_str(
            r#"{"address":"X","amount":5,"assets":[{"asset-id":7,"amount":2}]}"#,
        )
        .unwrap();
        assert_eq!(account.amount, 5);
        assert_eq!(account.min_balance, 0);
        assert_eq!(account.assets[0].asset_id, 7);
        assert!(!account.assets[0].is_frozen);
    }

    #[test]
    fn test_transaction_variants_decode() {
        let tx: IndexerTransaction = serde_json::from_str(
            r#"{"id":"T","tx-type":"axfer","sender":"S",
                "asset-transfer-transaction":{"asset-id":3,"amount":9,"receiver":"R"}}"#,
        )
        .unwrap();
        assert!(tx.payment_transaction.is_none());
        let axfer = tx.asset_transfer_transaction.unwrap();
        assert_eq!((axfer.asset_id, axfer.amount), (3, 9));
    }
}
