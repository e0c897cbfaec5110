//! Atomic group binding
//!
//! The group id is SHA-512/256 over the "TG" prefix and the canonical encoding
//! of `{"txlist": [id_1, .., id_n]}`, where each id is computed with the
//! member's group field cleared. Order is significant.

use crate::tx_builder::encoding::{prefixed_hash, CanonicalMap, Value};
use crate::tx_builder::errors::TransactionBuilderError;
use crate::tx_builder::params::MAX_GROUP_SIZE;
use crate::tx_builder::transaction::{GroupId, Transaction};

const GROUP_PREFIX: &[u8] = b"TG";
const MIN_GROUP_SIZE: usize = 2;

/// Compute the group id for an ordered list without modifying it
pub fn compute_group_id(transactions: &[Transaction]) -> Result<GroupId, TransactionBuilderError> {
    if transactions.len() < MIN_GROUP_SIZE {
        return Err(TransactionBuilderError::group(format!(
            "need at least {} transactions, got {}",
            MIN_GROUP_SIZE,
            transactions.len()
        )));
    }
    if transactions.len() > MAX_GROUP_SIZE {
        return Err(TransactionBuilderError::group(format!(
            "at most {} transactions per group, got {}",
            MAX_GROUP_SIZE,
            transactions.len()
        )));
    }

    let mut digests = Vec::with_capacity(transactions.len());
    for tx in transactions {
        tx.validate()?;
        let mut ungrouped = tx.clone();
        ungrouped.group = None;
        digests.push(Value::Digest(ungrouped.id_digest()?));
    }

    let mut list = CanonicalMap::new();
    list.insert("txlist", Value::Array(digests));
    Ok(GroupId::from_bytes(prefixed_hash(GROUP_PREFIX, &list.encode()?)))
}

/// Compute the group id and stamp it into every member
pub fn assign_group_id(transactions: &mut [Transaction]) -> Result<GroupId, TransactionBuilderError> {
    let group = compute_group_id(transactions)?;
    for tx in transactions.iter_mut() {
        tx.group = Some(group);
    }
    Ok(group)
}
