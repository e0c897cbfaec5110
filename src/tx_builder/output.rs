//! Transaction build output
//!
//! A [`TxBuildOutput`] holds either a single ungrouped transaction or an
//! atomic group whose members all carry the same group id. It owns the
//! transactions until they are signed and submitted.

use crate::address::Address;
use crate::tx_builder::transaction::{GroupId, Transaction};

/// Unsigned transactions ready for signing, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxBuildOutput {
    transactions: Vec<Transaction>,
    group_id: Option<GroupId>,
}

impl TxBuildOutput {
    pub(crate) fn single(tx: Transaction) -> Self {
        Self {
            transactions: vec![tx],
            group_id: None,
        }
    }

    pub(crate) fn grouped(transactions: Vec<Transaction>, group_id: GroupId) -> Self {
        Self {
            transactions,
            group_id: Some(group_id),
        }
    }

    /// The operation the caller asked for; the fee leg, if any, follows it
    pub fn primary(&self) -> &Transaction {
        &self.transactions[0]
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    /// Distinct senders whose keys must sign, in first-seen order
    pub fn required_signers(&self) -> Vec<Address> {
        let mut signers: Vec<Address> = Vec::new();
        for tx in &self.transactions {
            if !signers.contains(&tx.sender) {
                signers.push(tx.sender);
            }
        }
        signers
    }
}
