//! Crate-level error type

use crate::address::AddressError;
use crate::amount::AmountError;
use crate::rpc::RpcError;
use crate::tx_builder::TransactionBuilderError;
use thiserror::Error;

/// Any failure surfaced by this crate
///
/// Validation problems are caught before any network call; remote problems
/// carry the service's message unmodified.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Builder(#[from] TransactionBuilderError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Bad input caught locally
    pub fn is_validation(&self) -> bool {
        match self {
            Error::Builder(e) => e.is_validation(),
            Error::Address(_) | Error::Amount(_) => true,
            Error::Rpc(_) => false,
        }
    }

    /// The node, indexer or market service rejected the request
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Rpc(RpcError::Remote { .. }))
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            Error::Builder(e) => e.category(),
            Error::Rpc(e) => e.category(),
            Error::Address(_) | Error::Amount(_) => "validation",
        }
    }
}
