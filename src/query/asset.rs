//! Asset lookups: parameters, roles, holders, market figures

use crate::amount::Amount;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::records::{AssetSummary, NftHolder};
use crate::query::shape_default;
use crate::rpc::models::{AssetModel, BalanceEntry, IndexerAccount};
use crate::rpc::{IndexerClient, MarketClient};
use crate::structured_logging::StructuredLogger;
use crate::time::format_timestamp;
use crate::tx_builder::AssetId;

/// One of the four control roles of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Manager,
    Reserve,
    Freeze,
    Clawback,
}

#[derive(Debug, Clone)]
pub struct AssetQuery {
    indexer: IndexerClient,
    market: Option<MarketClient>,
    logger: StructuredLogger,
}

impl AssetQuery {
    pub fn new(indexer: IndexerClient) -> Self {
        Self {
            indexer,
            market: None,
            logger: StructuredLogger::default(),
        }
    }

    /// Enrich summaries with price and supply figures
    pub fn with_market(mut self, market: MarketClient) -> Self {
        self.market = Some(market);
        self
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let market = MarketClient::from_config(&config.market, config.timeout())?;
        Ok(Self::new(IndexerClient::from_config(config)?).with_market(market))
    }

    fn asset_url(&self, asset_id: AssetId) -> String {
        self.indexer
            .endpoint()
            .url(&format!("/v2/assets/{}", asset_id))
    }

    /// The asset record; default (all empty) when the response has no `asset`
    async fn asset(&self, asset_id: AssetId) -> Result<AssetModel> {
        match self.indexer.asset(asset_id).await? {
            Some(asset) => Ok(asset),
            None => Ok(shape_default(
                &self.logger,
                &self.asset_url(asset_id),
                "asset",
            )),
        }
    }

    async fn round_time(&self, round: u64) -> Result<String> {
        let block = self.indexer.block(round).await?;
        Ok(format_timestamp(block.timestamp))
    }

    /// Parameters, creation date and market figures
    pub async fn summary(&self, asset_id: AssetId) -> Result<AssetSummary> {
        let Some(asset) = self.indexer.asset(asset_id).await? else {
            return Ok(shape_default(
                &self.logger,
                &self.asset_url(asset_id),
                "asset",
            ));
        };
        let params = asset.params;
        let supply = Amount::lenient(params.total, params.decimals);

        let mut summary = AssetSummary {
            asset_id: asset.index,
            name: params.name,
            unit: params.unit_name,
            url: params.url,
            date_created: self.round_time(asset.created_at_round).await?,
            creator: params.creator,
            manager: params.manager.unwrap_or_default(),
            reserve: params.reserve.unwrap_or_default(),
            freeze: params.freeze.unwrap_or_default(),
            clawback: params.clawback.unwrap_or_default(),
            decimals: supply.decimals(),
            supply,
            default_frozen: params.default_frozen,
            is_deleted: asset.deleted,
            ..AssetSummary::default()
        };

        if let Some(market) = &self.market {
            let data = market.market_data(asset_id).await;
            summary.market_cap = data.market_cap();
            summary.price_usd = data.price_usd;
            summary.description = data.description;
            summary.circulating_supply = data.circulating_supply.unwrap_or_default();
            summary.burned_supply = data.burned_supply.unwrap_or_default();
        }
        Ok(summary)
    }

    fn role_address(asset: &AssetModel, role: AssetRole) -> Option<&str> {
        let params = &asset.params;
        let address = match role {
            AssetRole::Manager => params.manager.as_deref(),
            AssetRole::Reserve => params.reserve.as_deref(),
            AssetRole::Freeze => params.freeze.as_deref(),
            AssetRole::Clawback => params.clawback.as_deref(),
        };
        address.filter(|a| !a.is_empty())
    }

    /// Whether `address` holds `role` for the asset
    pub async fn has_role(&self, asset_id: AssetId, role: AssetRole, address: &str) -> Result<bool> {
        let asset = self.asset(asset_id).await?;
        Ok(Self::role_address(&asset, role) == Some(address))
    }

    /// Whether the role is still assigned (a cleared role can never be set again)
    pub async fn role_is_set(&self, asset_id: AssetId, role: AssetRole) -> Result<bool> {
        let asset = self.asset(asset_id).await?;
        Ok(Self::role_address(&asset, role).is_some())
    }

    pub async fn is_manager(&self, asset_id: AssetId, address: &str) -> Result<bool> {
        self.has_role(asset_id, AssetRole::Manager, address).await
    }

    pub async fn is_reserve(&self, asset_id: AssetId, address: &str) -> Result<bool> {
        self.has_role(asset_id, AssetRole::Reserve, address).await
    }

    pub async fn is_freeze(&self, asset_id: AssetId, address: &str) -> Result<bool> {
        self.has_role(asset_id, AssetRole::Freeze, address).await
    }

    pub async fn is_clawback(&self, asset_id: AssetId, address: &str) -> Result<bool> {
        self.has_role(asset_id, AssetRole::Clawback, address).await
    }

    pub async fn is_creator(&self, asset_id: AssetId, address: &str) -> Result<bool> {
        let asset = self.asset(asset_id).await?;
        Ok(!asset.params.creator.is_empty() && asset.params.creator == address)
    }

    pub async fn can_manage(&self, asset_id: AssetId) -> Result<bool> {
        self.role_is_set(asset_id, AssetRole::Manager).await
    }

    pub async fn can_reserve(&self, asset_id: AssetId) -> Result<bool> {
        self.role_is_set(asset_id, AssetRole::Reserve).await
    }

    pub async fn can_freeze(&self, asset_id: AssetId) -> Result<bool> {
        self.role_is_set(asset_id, AssetRole::Freeze).await
    }

    pub async fn can_clawback(&self, asset_id: AssetId) -> Result<bool> {
        self.role_is_set(asset_id, AssetRole::Clawback).await
    }

    pub async fn is_default_frozen(&self, asset_id: AssetId) -> Result<bool> {
        Ok(self.asset(asset_id).await?.params.default_frozen)
    }

    /// An asset with zero decimals; false when the asset is unknown
    pub async fn is_nft(&self, asset_id: AssetId) -> Result<bool> {
        match self.indexer.asset(asset_id).await? {
            Some(asset) => Ok(asset.params.decimals == 0),
            None => Ok(shape_default::<bool>(
                &self.logger,
                &self.asset_url(asset_id),
                "asset",
            )),
        }
    }

    pub async fn creation_date(&self, asset_id: AssetId) -> Result<String> {
        let Some(asset) = self.indexer.asset(asset_id).await? else {
            return Ok(shape_default(
                &self.logger,
                &self.asset_url(asset_id),
                "asset",
            ));
        };
        self.round_time(asset.created_at_round).await
    }

    /// Whether the creator holds the entire supply, the ledger's precondition
    /// for destroying the asset
    pub async fn creator_holds_all_supply(&self, asset_id: AssetId) -> Result<bool> {
        let asset = self.asset(asset_id).await?;
        if asset.params.creator.is_empty() {
            return Ok(false);
        }
        let creator: IndexerAccount = match self.indexer.account(&asset.params.creator).await? {
            Some(account) => account,
            None => shape_default(
                &self.logger,
                &self
                    .indexer
                    .endpoint()
                    .url(&format!("/v2/accounts/{}", asset.params.creator)),
                "account",
            ),
        };
        Ok(creator
            .assets
            .iter()
            .find(|h| h.asset_id == asset_id)
            .map(|h| h.amount == asset.params.total)
            .unwrap_or(false))
    }

    /// The account currently holding a unique NFT, if any
    pub async fn nft_holder(&self, asset_id: AssetId) -> Result<Option<NftHolder>> {
        let balances: Vec<BalanceEntry> =
            match self.indexer.asset_balances(asset_id, Some(0), Some(2)).await? {
                Some(balances) => balances,
                None => shape_default(
                    &self.logger,
                    &self
                        .indexer
                        .endpoint()
                        .url(&format!("/v2/assets/{}/balances", asset_id)),
                    "balances",
                ),
            };
        Ok(balances.into_iter().last().map(|b| NftHolder {
            address: b.address,
            amount: b.amount,
        }))
    }

    /// Apply the asset's precision to a raw amount
    pub async fn amount_with_decimals(&self, asset_id: AssetId, raw: u64) -> Result<Amount> {
        let asset = self.asset(asset_id).await?;
        Ok(Amount::lenient(raw, asset.params.decimals))
    }
}
