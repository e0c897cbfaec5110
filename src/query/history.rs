//! Transaction history and per-transaction lookups

use crate::amount::Amount;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::explorer::ExplorerLinks;
use crate::query::records::{TransactionDetail, TransferHistory, TransferRecord};
use crate::query::{asset_label, shape_default, AssetLabel, NATIVE_NAME};
use crate::rpc::indexer::TransactionFilter;
use crate::rpc::models::{AssetModel, IndexerTransaction};
use crate::rpc::{IndexerClient, NodeClient};
use crate::structured_logging::StructuredLogger;
use crate::time::format_timestamp;
use crate::tx_builder::AssetId;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    node: NodeClient,
    indexer: IndexerClient,
    explorer: ExplorerLinks,
    logger: StructuredLogger,
}

impl HistoryQuery {
    pub fn new(node: NodeClient, indexer: IndexerClient, explorer: ExplorerLinks) -> Self {
        Self {
            node,
            indexer,
            explorer,
            logger: StructuredLogger::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            NodeClient::from_config(config)?,
            IndexerClient::from_config(config)?,
            config.explorer(),
        ))
    }

    async fn search(&self, filter: &TransactionFilter) -> Result<Vec<IndexerTransaction>> {
        match self.indexer.search_transactions(filter).await? {
            Some(txs) => Ok(txs),
            None => Ok(shape_default(
                &self.logger,
                &self.indexer.endpoint().url("/v2/transactions"),
                "transactions",
            )),
        }
    }

    /// Native payments sent and received by `address`, newest first as the indexer returns them
    pub async fn payment_history(&self, address: &str, limit: Option<u64>) -> Result<TransferHistory> {
        let filter = TransactionFilter::for_address(address).tx_type("pay").limit(limit);
        let mut history = TransferHistory::default();
        for tx in self.search(&filter).await? {
            let payment = tx.payment_transaction.clone().unwrap_or_default();
            let record = TransferRecord {
                link: self.explorer.transaction(&tx.id),
                txid: tx.id,
                sender: tx.sender,
                receiver: payment.receiver,
                asset_id: 0,
                asset_name: NATIVE_NAME.to_string(),
                unit: NATIVE_NAME.to_string(),
                amount: Amount::native(payment.amount),
                fee: Amount::native(tx.fee),
                timestamp: format_timestamp(tx.round_time),
                tx_type: tx.tx_type,
            };
            history.push(address, record);
        }
        Ok(history)
    }

    /// Asset transfers of `address` across every asset
    pub async fn asset_transfer_history(
        &self,
        address: &str,
        limit: Option<u64>,
    ) -> Result<TransferHistory> {
        let filter = TransactionFilter::for_address(address).tx_type("axfer").limit(limit);
        let txs = self.search(&filter).await?;
        self.transfers(address, txs).await
    }

    /// Transfers of one asset involving `address`
    pub async fn asset_history(
        &self,
        address: &str,
        asset_id: AssetId,
        limit: Option<u64>,
    ) -> Result<TransferHistory> {
        let filter = TransactionFilter::for_address(address).tx_type("axfer").limit(limit);
        let txs = match self.indexer.asset_transactions(asset_id, &filter).await? {
            Some(txs) => txs,
            None => shape_default(
                &self.logger,
                &self
                    .indexer
                    .endpoint()
                    .url(&format!("/v2/assets/{}/transactions", asset_id)),
                "transactions",
            ),
        };
        self.transfers(address, txs).await
    }

    async fn transfers(&self, address: &str, txs: Vec<IndexerTransaction>) -> Result<TransferHistory> {
        let mut labels: HashMap<AssetId, AssetLabel> = HashMap::new();
        let mut history = TransferHistory::default();
        for tx in txs {
            let Some(transfer) = tx.asset_transfer_transaction.clone() else {
                continue;
            };
            let label = match labels.get(&transfer.asset_id) {
                Some(label) => label.clone(),
                None => {
                    let label = asset_label(&self.node, &self.logger, transfer.asset_id).await?;
                    labels.insert(transfer.asset_id, label.clone());
                    label
                }
            };

            let record = TransferRecord {
                link: self.explorer.transaction(&tx.id),
                txid: tx.id,
                sender: tx.sender,
                receiver: transfer.receiver,
                asset_id: transfer.asset_id,
                amount: label.amount(transfer.amount),
                asset_name: label.name,
                unit: label.unit,
                fee: Amount::native(tx.fee),
                timestamp: format_timestamp(tx.round_time),
                tx_type: tx.tx_type,
            };
            history.push(address, record);
        }
        Ok(history)
    }

    fn transaction_url(&self, txid: &str) -> String {
        self.indexer
            .endpoint()
            .url(&format!("/v2/transactions/{}", txid))
    }

    /// The transaction, or an empty one (logged and counted) when the key is absent
    async fn lookup(&self, txid: &str) -> Result<IndexerTransaction> {
        match self.indexer.transaction(txid).await? {
            Some(tx) => Ok(tx),
            None => Ok(shape_default(&self.logger, &self.transaction_url(txid), "transaction")),
        }
    }

    /// Confirmed transaction with amounts in display form
    pub async fn transaction_detail(&self, txid: &str) -> Result<TransactionDetail> {
        let Some(tx) = self.indexer.transaction(txid).await? else {
            return Ok(shape_default(&self.logger, &self.transaction_url(txid), "transaction"));
        };

        let mut detail = TransactionDetail {
            txid: tx.id.clone(),
            sender: tx.sender.clone(),
            fee: Amount::native(tx.fee),
            timestamp: format_timestamp(tx.round_time),
            tx_type: tx.tx_type.clone(),
            note: decode_note(tx.note.as_deref()),
            confirmed_round: tx.confirmed_round,
            ..TransactionDetail::default()
        };

        if let Some(payment) = &tx.payment_transaction {
            detail.receiver = payment.receiver.clone();
            detail.name = NATIVE_NAME.to_string();
            detail.amount = Amount::native(payment.amount);
        } else if let Some(transfer) = &tx.asset_transfer_transaction {
            let asset: AssetModel = match self.indexer.asset(transfer.asset_id).await? {
                Some(asset) => asset,
                None => shape_default(
                    &self.logger,
                    &self
                        .indexer
                        .endpoint()
                        .url(&format!("/v2/assets/{}", transfer.asset_id)),
                    "asset",
                ),
            };
            detail.receiver = transfer.receiver.clone();
            detail.asset_id = transfer.asset_id;
            detail.name = asset.params.name;
            detail.amount = Amount::lenient(transfer.amount, asset.params.decimals);
        }
        Ok(detail)
    }

    /// Whether the indexer knows the transaction as confirmed
    pub async fn is_confirmed(&self, txid: &str) -> Result<bool> {
        match self.indexer.transaction(txid).await {
            Ok(Some(tx)) => Ok(tx.confirmed_round > 0),
            Ok(None) => Ok(shape_default::<bool>(
                &self.logger,
                &self.transaction_url(txid),
                "transaction",
            )),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn confirmed_round(&self, txid: &str) -> Result<Option<u64>> {
        let tx = self.lookup(txid).await?;
        Ok(Some(tx.confirmed_round).filter(|round| *round > 0))
    }

    /// Formatted time of the confirming block; empty when unknown
    pub async fn confirmation_time(&self, txid: &str) -> Result<String> {
        Ok(format_timestamp(self.lookup(txid).await?.round_time))
    }

    /// The transaction note as text
    pub async fn note(&self, txid: &str) -> Result<String> {
        Ok(decode_note(self.lookup(txid).await?.note.as_deref()))
    }

    /// Id of the asset an asset-creation transaction produced
    pub async fn created_asset_id(&self, txid: &str) -> Result<Option<AssetId>> {
        Ok(self.lookup(txid).await?.created_asset_index)
    }

    pub async fn block_time(&self, round: u64) -> Result<String> {
        let block = self.indexer.block(round).await?;
        Ok(format_timestamp(block.timestamp))
    }
}

/// Decode a base64 note into text, replacing invalid UTF-8
fn decode_note(note: Option<&str>) -> String {
    note.and_then(|n| BASE64.decode(n).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_note() {
        assert_eq!(decode_note(Some("aGVsbG8=")), "hello");
        assert_eq!(decode_note(None), "");
        assert_eq!(decode_note(Some("!!not base64")), "");
    }
}
