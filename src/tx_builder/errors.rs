//! Error types for the Transaction Builder
//!
//! Every error in this module is raised locally, before any network call.
//! Remote rejections live in [`crate::rpc::RpcError`].

use thiserror::Error;

/// Error type for transaction construction, grouping, encoding and signing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionBuilderError {
    /// An operation parameter violates a ledger constraint
    ///
    /// Raised for over-long names, too many decimals, a default-frozen asset
    /// without a freeze address, a zero asset id and similar input problems.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending parameter
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The transaction list cannot be bound into an atomic group
    #[error("Group error: {0}")]
    Group(String),

    /// Canonical encoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Key material is unusable or does not match the transaction sender
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl TransactionBuilderError {
    /// Builder errors are deterministic; repeating the call cannot succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// True for the validation kind: bad parameters caught before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidField { .. } | Self::Group(_))
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } => "validation",
            Self::Group(_) => "group",
            Self::Encoding(_) => "encoding",
            Self::Signing(_) => "signing",
        }
    }
}

// Convenience constructors
impl TransactionBuilderError {
    /// Create an invalid-parameter error
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create a grouping error
    pub fn group(reason: impl Into<String>) -> Self {
        Self::Group(reason.into())
    }

    /// Create an encoding error from any displayable cause
    pub fn encoding(cause: impl std::fmt::Display) -> Self {
        Self::Encoding(cause.to_string())
    }

    /// Create a signing error
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::Signing(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransactionBuilderError::invalid_field("unit_name", "9 bytes exceeds 8");
        assert_eq!(err.to_string(), "Invalid unit_name: 9 bytes exceeds 8");

        let err = TransactionBuilderError::group("need at least 2 transactions, got 1");
        assert_eq!(
            err.to_string(),
            "Group error: need at least 2 transactions, got 1"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert!(TransactionBuilderError::invalid_field("name", "x").is_validation());
        assert!(TransactionBuilderError::group("x").is_validation());
        assert!(!TransactionBuilderError::signing("x").is_validation());
        assert!(!TransactionBuilderError::encoding("x").is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            TransactionBuilderError::invalid_field("name", "x").category(),
            "validation"
        );
        assert_eq!(TransactionBuilderError::signing("x").category(), "signing");
        assert_eq!(TransactionBuilderError::encoding("x").category(), "encoding");
    }
}
