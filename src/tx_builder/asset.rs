//! Asset creation presets
//!
//! Each preset fills in [`AssetParams`] for a common kind of asset. Presets
//! without control addresses produce immutable assets; the ticket and
//! security presets hand the controlling roles to the creating account.

use crate::address::Address;
use crate::tx_builder::transaction::{AssetControls, AssetParams};

/// Unit name stamped on every event ticket
pub const TICKET_UNIT_NAME: &str = "WEB3TCKT";

impl AssetParams {
    /// Fully specified asset
    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        total: u64,
        decimals: u8,
        default_frozen: bool,
        url: impl Into<String>,
        metadata_hash: Option<[u8; 32]>,
        controls: AssetControls,
    ) -> Self {
        Self {
            total,
            decimals,
            default_frozen,
            unit_name: unit_name.into(),
            asset_name: asset_name.into(),
            url: url.into(),
            metadata_hash,
            controls,
        }
    }

    /// Fungible token with no control addresses
    pub fn token(
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        total: u64,
        decimals: u8,
        url: impl Into<String>,
    ) -> Self {
        Self::custom(asset_name, unit_name, total, decimals, false, url, None, AssetControls::none())
    }

    /// Single, indivisible unit
    pub fn pure_nft(
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::custom(asset_name, unit_name, 1, 0, false, url, None, AssetControls::none())
    }

    /// A series of indivisible units sharing one asset id
    pub fn nft_collection(
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        total: u64,
        url: impl Into<String>,
    ) -> Self {
        Self::custom(asset_name, unit_name, total, 0, false, url, None, AssetControls::none())
    }

    /// NFT split into `total` shares with the given precision
    pub fn fractional_nft(
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        total: u64,
        decimals: u8,
        url: impl Into<String>,
    ) -> Self {
        Self::custom(asset_name, unit_name, total, decimals, false, url, None, AssetControls::none())
    }

    /// Event ticket: the issuer keeps manager, freeze and clawback so tickets
    /// can be revoked or frozen at the door
    pub fn event_ticket(
        creator: Address,
        asset_name: impl Into<String>,
        total: u64,
        url: impl Into<String>,
    ) -> Self {
        let controls = AssetControls {
            manager: Some(creator),
            reserve: None,
            freeze: Some(creator),
            clawback: Some(creator),
        };
        Self::custom(asset_name, TICKET_UNIT_NAME, total, 0, false, url, None, controls)
    }

    /// Regulated asset: the issuer holds all four roles
    pub fn security(
        creator: Address,
        asset_name: impl Into<String>,
        unit_name: impl Into<String>,
        total: u64,
        decimals: u8,
        url: impl Into<String>,
    ) -> Self {
        Self::custom(
            asset_name,
            unit_name,
            total,
            decimals,
            false,
            url,
            None,
            AssetControls::all(creator),
        )
    }

    pub fn with_controls(mut self, controls: AssetControls) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_metadata_hash(mut self, hash: [u8; 32]) -> Self {
        self.metadata_hash = Some(hash);
        self
    }

    pub fn with_default_frozen(mut self, frozen: bool) -> Self {
        self.default_frozen = frozen;
        self
    }
}
