//! Network fee and validity parameters

use crate::tx_builder::errors::TransactionBuilderError;
use serde::Serialize;

/// Minimum flat fee per transaction, in micro-units
pub const MIN_TXN_FEE: u64 = 1000;

/// Number of rounds a built transaction stays valid
pub const DEFAULT_VALIDITY_WINDOW: u64 = 1000;

/// Largest atomic group the ledger accepts
pub const MAX_GROUP_SIZE: usize = 16;

/// Parameters every transaction needs from the network
///
/// Fetched from the node once and cached by [`crate::tx_builder::TxService`];
/// the caller refreshes or overrides them between builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedParams {
    /// Flat fee applied to each transaction
    pub fee: u64,
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    #[serde(with = "hex_bytes")]
    pub genesis_hash: [u8; 32],
    pub consensus_version: String,
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }
}

impl SuggestedParams {
    /// Parameters valid from `last_round` for the default window, at the minimum fee
    pub fn from_round(
        last_round: u64,
        min_fee: u64,
        genesis_id: impl Into<String>,
        genesis_hash: [u8; 32],
    ) -> Self {
        let min_fee = min_fee.max(MIN_TXN_FEE);
        Self {
            fee: min_fee,
            min_fee,
            first_valid: last_round,
            last_valid: last_round.saturating_add(DEFAULT_VALIDITY_WINDOW),
            genesis_id: genesis_id.into(),
            genesis_hash,
            consensus_version: String::new(),
        }
    }

    /// Replace the flat fee, refusing anything below the network minimum
    pub fn with_flat_fee(mut self, fee: u64) -> Result<Self, TransactionBuilderError> {
        if fee < self.min_fee {
            return Err(TransactionBuilderError::invalid_field(
                "fee",
                format!("{} is below the network minimum of {}", fee, self.min_fee),
            ));
        }
        self.fee = fee;
        Ok(self)
    }
}
