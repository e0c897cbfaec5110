//! Account lookups: balances, holdings, created assets

use crate::amount::Amount;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::records::{AccountSummary, AlgoBalance, CreatedAsset, TokenHolding};
use crate::query::{asset_label, shape_default};
use crate::rpc::models::IndexerAccount;
use crate::rpc::{IndexerClient, NodeClient};
use crate::structured_logging::StructuredLogger;
use crate::time::format_timestamp;
use crate::tx_builder::AssetId;

#[derive(Debug, Clone)]
pub struct AccountQuery {
    node: NodeClient,
    indexer: IndexerClient,
    logger: StructuredLogger,
}

impl AccountQuery {
    pub fn new(node: NodeClient, indexer: IndexerClient) -> Self {
        Self {
            node,
            indexer,
            logger: StructuredLogger::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            NodeClient::from_config(config)?,
            IndexerClient::from_config(config)?,
        ))
    }

    /// Balance, opted-in asset count and spendable balance
    pub async fn algo_balance(&self, address: &str) -> Result<AlgoBalance> {
        let account = self.node.account(address).await?;
        if account.address.is_empty() {
            return Ok(shape_default(
                &self.logger,
                &self.node.endpoint().url(&format!("/v2/accounts/{}", address)),
                "address",
            ));
        }
        Ok(AlgoBalance {
            balance: Amount::native(account.amount),
            asset_count: account.total_assets_opted_in,
            spendable: Amount::native(account.amount.saturating_sub(account.min_balance)),
        })
    }

    async fn holdings(&self, address: &str) -> Result<Vec<TokenHolding>> {
        let account = self.node.account(address).await?;
        let mut holdings = Vec::with_capacity(account.assets.len());
        for holding in account.assets {
            let label = asset_label(&self.node, &self.logger, holding.asset_id).await?;
            let amount = label.amount(holding.amount);
            holdings.push(TokenHolding {
                asset_id: holding.asset_id,
                name: label.name,
                unit: label.unit,
                decimals: amount.decimals(),
                amount,
                is_frozen: holding.is_frozen,
            });
        }
        Ok(holdings)
    }

    /// Divisible holdings (decimals > 0)
    pub async fn token_holdings(&self, address: &str) -> Result<Vec<TokenHolding>> {
        let mut holdings = self.holdings(address).await?;
        holdings.retain(|h| h.decimals != 0);
        Ok(holdings)
    }

    /// Indivisible holdings (decimals == 0)
    pub async fn nft_holdings(&self, address: &str) -> Result<Vec<TokenHolding>> {
        let mut holdings = self.holdings(address).await?;
        holdings.retain(|h| h.decimals == 0);
        Ok(holdings)
    }

    async fn indexer_account(&self, address: &str) -> Result<Option<IndexerAccount>> {
        Ok(self.indexer.account(address).await?)
    }

    fn indexer_account_url(&self, address: &str) -> String {
        self.indexer
            .endpoint()
            .url(&format!("/v2/accounts/{}", address))
    }

    async fn round_time(&self, round: u64) -> Result<String> {
        let block = self.indexer.block(round).await?;
        Ok(format_timestamp(block.timestamp))
    }

    /// Node snapshot merged with the indexer's history fields
    pub async fn account_summary(&self, address: &str) -> Result<AccountSummary> {
        let node_account = self.node.account(address).await?;
        let Some(indexed) = self.indexer_account(address).await? else {
            return Ok(shape_default(
                &self.logger,
                &self.indexer_account_url(address),
                "account",
            ));
        };
        if node_account.address.is_empty() {
            return Ok(shape_default(
                &self.logger,
                &self.node.endpoint().url(&format!("/v2/accounts/{}", address)),
                "address",
            ));
        }

        Ok(AccountSummary {
            address: node_account.address,
            balance: Amount::native(node_account.amount),
            min_balance: Amount::native(node_account.min_balance),
            pending_rewards: Amount::native(node_account.pending_rewards),
            status: node_account.status,
            asset_count: node_account.total_assets_opted_in,
            app_count: node_account.total_apps_opted_in,
            created_asset_count: node_account.total_created_assets,
            created_app_count: node_account.total_created_apps,
            date_created: self.round_time(indexed.created_at_round).await?,
            block_created: indexed.created_at_round,
            is_deleted: indexed.deleted,
            sig_type: indexed.sig_type,
        })
    }

    /// Assets created by the account, with creation dates
    pub async fn created_assets(&self, address: &str) -> Result<Vec<CreatedAsset>> {
        let Some(indexed) = self.indexer_account(address).await? else {
            return Ok(shape_default(
                &self.logger,
                &self.indexer_account_url(address),
                "account",
            ));
        };

        let mut created = Vec::with_capacity(indexed.created_assets.len());
        for asset in indexed.created_assets {
            created.push(CreatedAsset {
                asset_id: asset.index,
                name: asset.params.name,
                unit: asset.params.unit_name,
                url: asset.params.url,
                date_created: self.round_time(asset.created_at_round).await?,
            });
        }
        Ok(created)
    }

    /// The indexer account, or an empty one (logged and counted) when the key is absent
    async fn indexer_account_or_default(&self, address: &str) -> Result<IndexerAccount> {
        match self.indexer_account(address).await? {
            Some(account) => Ok(account),
            None => Ok(shape_default(
                &self.logger,
                &self.indexer_account_url(address),
                "account",
            )),
        }
    }

    /// Whether the account has opted in to the asset
    pub async fn is_opted_in(&self, address: &str, asset_id: AssetId) -> Result<bool> {
        let account = self.indexer_account_or_default(address).await?;
        Ok(account.assets.iter().any(|h| h.asset_id == asset_id))
    }

    /// Whether the account's holding of the asset is frozen; false if not held
    pub async fn is_frozen_for(&self, address: &str, asset_id: AssetId) -> Result<bool> {
        let account = self.indexer_account_or_default(address).await?;
        Ok(account
            .assets
            .iter()
            .find(|h| h.asset_id == asset_id)
            .map(|h| h.is_frozen)
            .unwrap_or(false))
    }
}
