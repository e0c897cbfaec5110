//! Transaction Builder
//!
//! Builds, groups, signs and submits ledger transactions.
//!
//! ## Architecture
//!
//! - **transaction**: typed transactions and their canonical encoding
//! - **encoding**: canonical MessagePack writer shared by transactions and groups
//! - **asset**: asset creation presets
//! - **params**: network fee and validity parameters
//! - **group**: deterministic atomic-group binding
//! - **builder**: per-operation constructors with the optional service-fee leg
//! - **output**: the unsigned result of a build
//! - **metadata**: metadata-hash helpers
//! - **submit**: the write-side service holding cached parameters
//!
//! ## Atomic fee legs
//!
//! Operations that accept a [`ServiceFee`] return `[primary, fee]` bound by a
//! shared group id, so the ledger applies both or neither. The fee is paid in
//! the native currency or in an asset, chosen explicitly through [`FeeMode`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use asa_client::tx_builder::{AssetParams, ServiceFee, TxService};
//! use asa_client::{ClientConfig, Wallet};
//!
//! # async fn example() -> asa_client::Result<()> {
//! let config = ClientConfig::default();
//! let service = TxService::connect(&config).await?;
//! let wallet = Wallet::from_private_key("...")?;
//!
//! let fee = ServiceFee::native("...".parse()?, 100_000);
//! let output = service.builder().create_asset(
//!     wallet.address(),
//!     AssetParams::pure_nft("Sunrise", "SUN", "ipfs://..."),
//!     Some(&fee),
//! )?;
//! let receipt = service.submit(output, &wallet).await?;
//! println!("{}", receipt.link);
//! # Ok(())
//! # }
//! ```

// Public API - Error types
pub mod errors;
pub use errors::TransactionBuilderError;

pub(crate) mod encoding;

pub mod asset;
pub mod builder;
pub mod group;
pub mod metadata;
pub mod output;
pub mod params;
pub mod submit;
pub mod transaction;

pub use asset::TICKET_UNIT_NAME;
pub use builder::{FeeMode, ServiceFee, TxBuilder};
pub use group::{assign_group_id, compute_group_id};
pub use metadata::{hash_file, hash_text};
pub use output::TxBuildOutput;
pub use params::{SuggestedParams, DEFAULT_VALIDITY_WINDOW, MAX_GROUP_SIZE, MIN_TXN_FEE};
pub use submit::{SubmitReceipt, TxService};
pub use transaction::{
    AssetControls, AssetId, AssetParams, GroupId, Transaction, TxKind, MAX_ASSET_NAME_BYTES,
    MAX_NOTE_BYTES, MAX_UNIT_NAME_BYTES, MAX_URL_BYTES,
};
