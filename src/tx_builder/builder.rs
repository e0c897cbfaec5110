//! Core transaction building logic
//!
//! [`TxBuilder`] turns operation parameters into a [`TxBuildOutput`]. When a
//! [`ServiceFee`] is supplied the primary transaction is paired with a fee leg
//! and both are bound into one atomic group; otherwise the primary is
//! returned alone.

use crate::address::Address;
use crate::metrics::{metrics, Timer};
use crate::structured_logging::StructuredLogger;
use crate::tx_builder::errors::TransactionBuilderError;
use crate::tx_builder::group::assign_group_id;
use crate::tx_builder::output::TxBuildOutput;
use crate::tx_builder::params::SuggestedParams;
use crate::tx_builder::transaction::{AssetControls, AssetId, AssetParams, Transaction, TxKind};
use serde::Serialize;

const CREATION_FEE_NOTE: &str = "asset creation fee";
const INTERACTION_FEE_NOTE: &str = "asset interaction fee";

/// How the service fee leg is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "asset_id", rename_all = "snake_case")]
pub enum FeeMode {
    /// Native-currency payment
    Native,
    /// Transfer of the given asset
    Asset(AssetId),
}

/// A fee charged alongside an operation, paid to a collector address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceFee {
    pub receiver: Address,
    /// Base units of the native currency or of the fee asset
    pub amount: u64,
    pub mode: FeeMode,
}

impl ServiceFee {
    pub fn native(receiver: Address, amount: u64) -> Self {
        Self {
            receiver,
            amount,
            mode: FeeMode::Native,
        }
    }

    pub fn in_asset(receiver: Address, amount: u64, asset_id: AssetId) -> Self {
        Self {
            receiver,
            amount,
            mode: FeeMode::Asset(asset_id),
        }
    }
}

/// Builds unsigned transactions against a snapshot of network parameters
#[derive(Debug, Clone)]
pub struct TxBuilder {
    params: SuggestedParams,
    logger: StructuredLogger,
}

impl TxBuilder {
    pub fn new(params: SuggestedParams) -> Self {
        Self {
            params,
            logger: StructuredLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &SuggestedParams {
        &self.params
    }

    fn base(&self, sender: Address, note: &str, kind: TxKind) -> Transaction {
        Transaction {
            sender,
            fee: self.params.fee,
            first_valid: self.params.first_valid,
            last_valid: self.params.last_valid,
            genesis_id: self.params.genesis_id.clone(),
            genesis_hash: self.params.genesis_hash,
            note: note.as_bytes().to_vec(),
            group: None,
            rekey_to: None,
            kind,
        }
    }

    fn fee_leg(&self, sender: Address, fee: &ServiceFee, note: &str) -> Transaction {
        let kind = match fee.mode {
            FeeMode::Native => TxKind::Payment {
                receiver: fee.receiver,
                amount: fee.amount,
                close_remainder_to: None,
            },
            FeeMode::Asset(asset_id) => TxKind::AssetTransfer {
                asset_id,
                amount: fee.amount,
                receiver: fee.receiver,
                close_to: None,
                revocation_target: None,
            },
        };
        self.base(sender, note, kind)
    }

    /// Validate the primary, attach the fee leg if any, and bind the group
    fn finish(
        &self,
        operation: &'static str,
        primary: Transaction,
        fee: Option<&ServiceFee>,
        fee_note: &str,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let timer = Timer::new();
        if self.params.fee < self.params.min_fee {
            return Err(TransactionBuilderError::invalid_field(
                "fee",
                format!(
                    "{} is below the network minimum of {}",
                    self.params.fee, self.params.min_fee
                ),
            ));
        }
        primary.validate()?;

        let output = match fee {
            None => TxBuildOutput::single(primary),
            Some(fee) => {
                let leg = self.fee_leg(primary.sender, fee, fee_note);
                let mut group = vec![primary, leg];
                let group_id = assign_group_id(&mut group)?;
                TxBuildOutput::grouped(group, group_id)
            }
        };

        timer.observe_duration(&metrics().build_latency);
        metrics().tx_built.inc_by(output.len() as u64);
        self.logger.log_build(operation, output.len(), output.is_grouped());
        Ok(output)
    }

    /// Plain native-currency payment
    pub fn payment(
        &self,
        sender: Address,
        receiver: Address,
        amount: u64,
        note: &str,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::Payment {
            receiver,
            amount,
            close_remainder_to: None,
        };
        self.finish("payment", self.base(sender, note, kind), None, "")
    }

    /// Plain asset transfer
    pub fn asset_transfer(
        &self,
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        amount: u64,
        note: &str,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetTransfer {
            asset_id,
            amount,
            receiver,
            close_to: None,
            revocation_target: None,
        };
        self.finish("asset_transfer", self.base(sender, note, kind), None, "")
    }

    /// Start accepting an asset: a zero-amount transfer to oneself
    pub fn opt_in(
        &self,
        sender: Address,
        asset_id: AssetId,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetTransfer {
            asset_id,
            amount: 0,
            receiver: sender,
            close_to: None,
            revocation_target: None,
        };
        self.finish("opt_in", self.base(sender, "", kind), None, "")
    }

    /// Stop holding an asset, sending any remaining balance to `close_to`
    pub fn opt_out(
        &self,
        sender: Address,
        asset_id: AssetId,
        close_to: Address,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetTransfer {
            asset_id,
            amount: 0,
            receiver: close_to,
            close_to: Some(close_to),
            revocation_target: None,
        };
        self.finish("opt_out", self.base(sender, "", kind), None, "")
    }

    fn native_fee_only<'a>(
        fee: &'a ServiceFee,
        operation: &str,
    ) -> Result<&'a ServiceFee, TransactionBuilderError> {
        match fee.mode {
            FeeMode::Native => Ok(fee),
            FeeMode::Asset(_) => Err(TransactionBuilderError::invalid_field(
                "fee.mode",
                format!("{} pays its fee in the native currency only", operation),
            )),
        }
    }

    /// Pay the service fee and close the account's remaining balance to `close_to`
    pub fn close_account(
        &self,
        sender: Address,
        close_to: Address,
        fee: &ServiceFee,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let fee = Self::native_fee_only(fee, "close_account")?;
        let kind = TxKind::Payment {
            receiver: fee.receiver,
            amount: fee.amount,
            close_remainder_to: Some(close_to),
        };
        self.finish("close_account", self.base(sender, "", kind), None, "")
    }

    /// Close the account to the zero address, burning its remaining balance
    pub fn delete_account(
        &self,
        sender: Address,
        fee: &ServiceFee,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let fee = Self::native_fee_only(fee, "delete_account")?;
        let kind = TxKind::Payment {
            receiver: fee.receiver,
            amount: fee.amount,
            close_remainder_to: Some(Address::zero()),
        };
        self.finish("delete_account", self.base(sender, "", kind), None, "")
    }

    /// Pay the service fee and hand signing authority to `new_authority`
    pub fn rekey_account(
        &self,
        sender: Address,
        new_authority: Address,
        fee: &ServiceFee,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let fee = Self::native_fee_only(fee, "rekey_account")?;
        let kind = TxKind::Payment {
            receiver: fee.receiver,
            amount: fee.amount,
            close_remainder_to: None,
        };
        let mut tx = self.base(sender, "", kind);
        tx.rekey_to = Some(new_authority);
        self.finish("rekey_account", tx, None, "")
    }

    /// Create a new asset; see the presets on [`AssetParams`]
    pub fn create_asset(
        &self,
        sender: Address,
        params: AssetParams,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let tx = self.base(sender, "", TxKind::AssetCreate { params });
        self.finish("create_asset", tx, fee, CREATION_FEE_NOTE)
    }

    /// Freeze `target`'s holding of the asset
    pub fn freeze_asset(
        &self,
        sender: Address,
        asset_id: AssetId,
        target: Address,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetFreeze {
            asset_id,
            target,
            frozen: true,
        };
        self.finish("freeze_asset", self.base(sender, "", kind), fee, INTERACTION_FEE_NOTE)
    }

    pub fn unfreeze_asset(
        &self,
        sender: Address,
        asset_id: AssetId,
        target: Address,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetFreeze {
            asset_id,
            target,
            frozen: false,
        };
        self.finish("unfreeze_asset", self.base(sender, "", kind), fee, INTERACTION_FEE_NOTE)
    }

    /// Move `amount` of the asset out of `target` into `receiver`; the sender
    /// must be the asset's clawback address
    pub fn clawback_asset(
        &self,
        sender: Address,
        asset_id: AssetId,
        target: Address,
        receiver: Address,
        amount: u64,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetTransfer {
            asset_id,
            amount,
            receiver,
            close_to: None,
            revocation_target: Some(target),
        };
        self.finish("clawback_asset", self.base(sender, "", kind), fee, INTERACTION_FEE_NOTE)
    }

    /// Destroy an asset; the ledger only accepts this while the creator holds
    /// the entire supply
    pub fn destroy_asset(
        &self,
        sender: Address,
        asset_id: AssetId,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetDestroy { asset_id };
        self.finish("destroy_asset", self.base(sender, "", kind), fee, INTERACTION_FEE_NOTE)
    }

    /// Replace the asset's control addresses; omitted roles are cleared for good,
    /// and at least one role must remain
    pub fn update_asset(
        &self,
        sender: Address,
        asset_id: AssetId,
        controls: AssetControls,
        fee: Option<&ServiceFee>,
    ) -> Result<TxBuildOutput, TransactionBuilderError> {
        let kind = TxKind::AssetUpdate { asset_id, controls };
        self.finish("update_asset", self.base(sender, "", kind), fee, INTERACTION_FEE_NOTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TxBuilder {
        TxBuilder::new(SuggestedParams::from_round(1_000, 1_000, "testnet-v1.0", [4u8; 32]))
    }

    fn alice() -> Address {
        Address::new([1u8; 32])
    }

    fn collector() -> Address {
        Address::new([2u8; 32])
    }

    #[test]
    fn test_payment_is_single() {
        let out = builder().payment(alice(), collector(), 10, "hi").unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.is_grouped());
        assert_eq!(out.primary().note, b"hi");
        assert_eq!(out.primary().fee, 1_000);
        assert_eq!(out.primary().last_valid, 2_000);
    }

    #[test]
    fn test_native_fee_leg() {
        let fee = ServiceFee::native(collector(), 500);
        let out = builder()
            .create_asset(alice(), AssetParams::pure_nft("Art", "ART", ""), Some(&fee))
            .unwrap();
        assert_eq!(out.len(), 2);
        let leg = &out.transactions()[1];
        assert_eq!(leg.note, CREATION_FEE_NOTE.as_bytes());
        assert!(matches!(leg.kind, TxKind::Payment { amount: 500, .. }));
        assert_eq!(leg.group, out.group_id());
        assert_eq!(out.primary().group, out.group_id());
    }

    #[test]
    fn test_asset_fee_leg() {
        let fee = ServiceFee::in_asset(collector(), 7, 31566704);
        let out = builder()
            .freeze_asset(alice(), 42, collector(), Some(&fee))
            .unwrap();
        let leg = &out.transactions()[1];
        assert_eq!(leg.note, INTERACTION_FEE_NOTE.as_bytes());
        assert!(matches!(
            leg.kind,
            TxKind::AssetTransfer { asset_id: 31566704, amount: 7, .. }
        ));
    }

    #[test]
    fn test_opt_in_and_out() {
        let out = builder().opt_in(alice(), 9).unwrap();
        assert!(matches!(
            out.primary().kind,
            TxKind::AssetTransfer { amount: 0, receiver, .. } if receiver == alice()
        ));

        let out = builder().opt_out(alice(), 9, collector()).unwrap();
        assert!(matches!(
            out.primary().kind,
            TxKind::AssetTransfer { close_to: Some(c), .. } if c == collector()
        ));
    }

    #[test]
    fn test_account_lifecycle_ops() {
        let fee = ServiceFee::native(collector(), 1);
        let out = builder().delete_account(alice(), &fee).unwrap();
        assert!(matches!(
            out.primary().kind,
            TxKind::Payment { close_remainder_to: Some(z), .. } if z.is_zero()
        ));

        let new_key = Address::new([8u8; 32]);
        let out = builder().rekey_account(alice(), new_key, &fee).unwrap();
        assert_eq!(out.primary().rekey_to, Some(new_key));

        let asset_fee = ServiceFee::in_asset(collector(), 1, 5);
        let err = builder().close_account(alice(), new_key, &asset_fee).unwrap_err();
        assert!(matches!(err, TransactionBuilderError::InvalidField { field: "fee.mode", .. }));
    }

    #[test]
    fn test_zero_asset_id_rejected() {
        assert!(builder().destroy_asset(alice(), 0, None).is_err());
        assert!(builder().opt_in(alice(), 0).is_err());
    }

    #[test]
    fn test_fee_below_minimum_rejected() {
        let mut params = SuggestedParams::from_round(1, 1_000, "g", [1u8; 32]);
        params.fee = 10;
        let err = TxBuilder::new(params)
            .payment(alice(), collector(), 1, "")
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_clawback_sets_revocation_target() {
        let victim = Address::new([3u8; 32]);
        let out = builder()
            .clawback_asset(alice(), 12, victim, alice(), 5, None)
            .unwrap();
        assert!(matches!(
            out.primary().kind,
            TxKind::AssetTransfer { revocation_target: Some(t), .. } if t == victim
        ));
    }
}
