//! Metadata-hash helpers for asset creation

use crate::tx_builder::errors::TransactionBuilderError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 of a text document, suitable for `AssetParams::metadata_hash`
pub fn hash_text(text: &str) -> [u8; 32] {
    Sha256::digest(text.as_bytes()).into()
}

/// SHA-256 of a file's contents
pub fn hash_file(path: impl AsRef<Path>) -> Result<[u8; 32], TransactionBuilderError> {
    let path = path.as_ref();
    let contents = std::fs::read(path).map_err(|e| {
        TransactionBuilderError::invalid_field(
            "metadata_hash",
            format!("cannot read {}: {}", path.display(), e),
        )
    })?;
    Ok(Sha256::digest(&contents).into())
}
