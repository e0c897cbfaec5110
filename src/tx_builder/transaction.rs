//! Typed ledger transactions and their canonical form

use crate::address::Address;
use crate::amount::MAX_DECIMALS;
use crate::tx_builder::encoding::{prefixed_hash, CanonicalMap};
use crate::tx_builder::errors::TransactionBuilderError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use data_encoding::BASE32_NOPAD;
use serde::{Serialize, Serializer};
use std::fmt;

/// Numeric identifier of a ledger asset
pub type AssetId = u64;

pub const MAX_ASSET_NAME_BYTES: usize = 32;
pub const MAX_UNIT_NAME_BYTES: usize = 8;
pub const MAX_URL_BYTES: usize = 96;
pub const MAX_NOTE_BYTES: usize = 1024;
pub const MAX_VALIDITY_WINDOW: u64 = 1000;

/// Domain-separation prefix for transaction ids and signatures
pub(crate) const TX_PREFIX: &[u8] = b"TX";

/// Identifier binding the members of an atomic group
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GroupId([u8; 32]);

impl GroupId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BASE64.encode(self.0))
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", hex::encode(self.0))
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

fn serialize_opt_base64<S: Serializer>(
    bytes: &Option<[u8; 32]>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(b) => serializer.serialize_some(&BASE64.encode(b)),
        None => serializer.serialize_none(),
    }
}

/// Parameters of a newly created asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u8,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    #[serde(serialize_with = "serialize_opt_base64")]
    pub metadata_hash: Option<[u8; 32]>,
    #[serde(flatten)]
    pub controls: AssetControls,
}

/// The four optional control addresses of an asset
///
/// An absent address is cleared on the ledger and can never be set again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetControls {
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

impl AssetControls {
    /// No control addresses: the asset becomes immutable
    pub fn none() -> Self {
        Self::default()
    }

    /// One account holds every role
    pub fn all(address: Address) -> Self {
        Self {
            manager: Some(address),
            reserve: Some(address),
            freeze: Some(address),
            clawback: Some(address),
        }
    }

    /// True when no role is assigned
    pub fn is_empty(&self) -> bool {
        self.manager.is_none()
            && self.reserve.is_none()
            && self.freeze.is_none()
            && self.clawback.is_none()
    }

    fn write_into(&self, map: &mut CanonicalMap) {
        map.address("c", self.clawback.as_ref())
            .address("f", self.freeze.as_ref())
            .address("m", self.manager.as_ref())
            .address("r", self.reserve.as_ref());
    }
}

impl AssetParams {
    /// Check name, unit, url, precision, supply and freeze constraints
    pub fn validate(&self) -> Result<(), TransactionBuilderError> {
        check_len("asset_name", &self.asset_name, MAX_ASSET_NAME_BYTES)?;
        check_len("unit_name", &self.unit_name, MAX_UNIT_NAME_BYTES)?;
        check_len("url", &self.url, MAX_URL_BYTES)?;

        if self.decimals > MAX_DECIMALS {
            return Err(TransactionBuilderError::invalid_field(
                "decimals",
                format!("{} exceeds the maximum of {}", self.decimals, MAX_DECIMALS),
            ));
        }
        if self.total == 0 {
            return Err(TransactionBuilderError::invalid_field(
                "total",
                "total supply must be at least 1 base unit",
            ));
        }
        if self.default_frozen && self.controls.freeze.is_none() {
            return Err(TransactionBuilderError::invalid_field(
                "freeze",
                "a default-frozen asset needs a freeze address or holders can never be unfrozen",
            ));
        }
        Ok(())
    }

    fn to_canonical_map(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        if let Some(hash) = self.metadata_hash {
            map.digest("am", hash);
        }
        map.string("an", &self.asset_name)
            .string("au", &self.url)
            .uint("dc", self.decimals as u64)
            .boolean("df", self.default_frozen)
            .uint("t", self.total)
            .string("un", &self.unit_name);
        self.controls.write_into(&mut map);
        map
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), TransactionBuilderError> {
    if value.len() > max {
        return Err(TransactionBuilderError::invalid_field(
            field,
            format!("{} bytes exceeds the maximum of {}", value.len(), max),
        ));
    }
    Ok(())
}

/// Operation-specific part of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TxKind {
    Payment {
        receiver: Address,
        amount: u64,
        close_remainder_to: Option<Address>,
    },
    AssetCreate {
        params: AssetParams,
    },
    AssetUpdate {
        asset_id: AssetId,
        controls: AssetControls,
    },
    AssetDestroy {
        asset_id: AssetId,
    },
    AssetTransfer {
        asset_id: AssetId,
        amount: u64,
        receiver: Address,
        close_to: Option<Address>,
        revocation_target: Option<Address>,
    },
    AssetFreeze {
        asset_id: AssetId,
        target: Address,
        frozen: bool,
    },
}

impl TxKind {
    /// The ledger's transaction type tag
    pub fn type_tag(&self) -> &'static str {
        match self {
            TxKind::Payment { .. } => "pay",
            TxKind::AssetCreate { .. } | TxKind::AssetUpdate { .. } | TxKind::AssetDestroy { .. } => {
                "acfg"
            }
            TxKind::AssetTransfer { .. } => "axfer",
            TxKind::AssetFreeze { .. } => "afrz",
        }
    }

    fn asset_id(&self) -> Option<AssetId> {
        match self {
            TxKind::Payment { .. } | TxKind::AssetCreate { .. } => None,
            TxKind::AssetUpdate { asset_id, .. }
            | TxKind::AssetDestroy { asset_id }
            | TxKind::AssetTransfer { asset_id, .. }
            | TxKind::AssetFreeze { asset_id, .. } => Some(*asset_id),
        }
    }

    fn write_into(&self, map: &mut CanonicalMap) {
        match self {
            TxKind::Payment {
                receiver,
                amount,
                close_remainder_to,
            } => {
                map.uint("amt", *amount)
                    .address("close", close_remainder_to.as_ref())
                    .address("rcv", Some(receiver));
            }
            TxKind::AssetCreate { params } => {
                map.map("apar", params.to_canonical_map());
            }
            TxKind::AssetUpdate { asset_id, controls } => {
                let mut apar = CanonicalMap::new();
                controls.write_into(&mut apar);
                map.map("apar", apar).uint("caid", *asset_id);
            }
            TxKind::AssetDestroy { asset_id } => {
                map.uint("caid", *asset_id);
            }
            TxKind::AssetTransfer {
                asset_id,
                amount,
                receiver,
                close_to,
                revocation_target,
            } => {
                map.uint("aamt", *amount)
                    .address("aclose", close_to.as_ref())
                    .address("arcv", Some(receiver))
                    .address("asnd", revocation_target.as_ref())
                    .uint("xaid", *asset_id);
            }
            TxKind::AssetFreeze {
                asset_id,
                target,
                frozen,
            } => {
                map.boolean("afrz", *frozen)
                    .address("fadd", Some(target))
                    .uint("faid", *asset_id);
            }
        }
    }
}

/// An unsigned ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    #[serde(serialize_with = "serialize_base64")]
    pub genesis_hash: [u8; 32],
    #[serde(serialize_with = "serialize_base64")]
    pub note: Vec<u8>,
    pub group: Option<GroupId>,
    pub rekey_to: Option<Address>,
    #[serde(flatten)]
    pub kind: TxKind,
}

impl Transaction {
    /// Reject structurally malformed transactions before they are encoded
    pub fn validate(&self) -> Result<(), TransactionBuilderError> {
        if self.sender.is_zero() {
            return Err(TransactionBuilderError::invalid_field(
                "sender",
                "the zero address cannot send",
            ));
        }
        if self.note.len() > MAX_NOTE_BYTES {
            return Err(TransactionBuilderError::invalid_field(
                "note",
                format!("{} bytes exceeds the maximum of {}", self.note.len(), MAX_NOTE_BYTES),
            ));
        }
        if self.last_valid < self.first_valid {
            return Err(TransactionBuilderError::invalid_field(
                "last_valid",
                format!("round {} precedes first valid round {}", self.last_valid, self.first_valid),
            ));
        }
        if self.last_valid - self.first_valid > MAX_VALIDITY_WINDOW {
            return Err(TransactionBuilderError::invalid_field(
                "last_valid",
                format!("validity window exceeds {} rounds", MAX_VALIDITY_WINDOW),
            ));
        }
        if self.kind.asset_id() == Some(0) {
            return Err(TransactionBuilderError::invalid_field(
                "asset_id",
                "asset id 0 does not reference an asset",
            ));
        }
        match &self.kind {
            TxKind::AssetCreate { params } => params.validate()?,
            // An update with no roles encodes exactly like a destroy
            TxKind::AssetUpdate { controls, .. } if controls.is_empty() => {
                return Err(TransactionBuilderError::invalid_field(
                    "controls",
                    "an update must keep at least one control address",
                ));
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn to_canonical_map(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        map.uint("fee", self.fee)
            .uint("fv", self.first_valid)
            .string("gen", &self.genesis_id)
            .digest("gh", self.genesis_hash)
            .uint("lv", self.last_valid)
            .bytes("note", &self.note)
            .address("rekey", self.rekey_to.as_ref())
            .address("snd", Some(&self.sender))
            .string("type", self.kind.type_tag());
        if let Some(group) = self.group {
            map.digest("grp", *group.as_bytes());
        }
        self.kind.write_into(&mut map);
        map
    }

    /// Canonical wire encoding
    pub fn encode(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        self.to_canonical_map().encode()
    }

    /// Raw 32-byte transaction id: SHA-512/256 over "TX" and the encoding
    pub fn id_digest(&self) -> Result<[u8; 32], TransactionBuilderError> {
        Ok(prefixed_hash(TX_PREFIX, &self.encode()?))
    }

    /// Text transaction id as reported by the node and indexer
    pub fn id(&self) -> Result<String, TransactionBuilderError> {
        Ok(BASE32_NOPAD.encode(&self.id_digest()?))
    }

    /// Bytes covered by the sender's signature
    pub(crate) fn bytes_to_sign(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        let encoded = self.encode()?;
        let mut message = Vec::with_capacity(TX_PREFIX.len() + encoded.len());
        message.extend_from_slice(TX_PREFIX);
        message.extend_from_slice(&encoded);
        Ok(message)
    }
}
