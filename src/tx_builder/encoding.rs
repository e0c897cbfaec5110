//! Canonical MessagePack encoding
//!
//! The ledger hashes and signs a canonical form of every transaction:
//! maps with keys sorted bytewise, empty values omitted, and every integer
//! written in its shortest representation. Values are collected into a
//! [`CanonicalMap`] and serialized with `rmp`'s low-level writers.

use crate::address::Address;
use crate::tx_builder::errors::TransactionBuilderError;
use rmp::encode;
use sha2::{Digest, Sha512_256};

/// A value in the canonical tree
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Uint(u64),
    Bool(bool),
    Str(String),
    Bin(Vec<u8>),
    /// Fixed 32-byte field (addresses, digests); all-zero counts as empty
    Digest([u8; 32]),
    Map(CanonicalMap),
    Array(Vec<Value>),
}

impl Value {
    fn is_empty(&self) -> bool {
        match self {
            Value::Uint(v) => *v == 0,
            Value::Bool(v) => !*v,
            Value::Str(s) => s.is_empty(),
            Value::Bin(b) => b.is_empty(),
            Value::Digest(d) => d.iter().all(|&b| b == 0),
            Value::Map(m) => m.is_empty(),
            Value::Array(a) => a.is_empty(),
        }
    }
}

/// A map that drops empty values on insert and sorts keys on encode
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CanonicalMap {
    entries: Vec<(&'static str, Value)>,
}

impl CanonicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: &'static str, value: Value) -> &mut Self {
        if !value.is_empty() {
            self.entries.push((key, value));
        }
        self
    }

    pub fn uint(&mut self, key: &'static str, value: u64) -> &mut Self {
        self.insert(key, Value::Uint(value))
    }

    pub fn boolean(&mut self, key: &'static str, value: bool) -> &mut Self {
        self.insert(key, Value::Bool(value))
    }

    pub fn string(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.insert(key, Value::Str(value.to_string()))
    }

    pub fn bytes(&mut self, key: &'static str, value: &[u8]) -> &mut Self {
        self.insert(key, Value::Bin(value.to_vec()))
    }

    pub fn digest(&mut self, key: &'static str, value: [u8; 32]) -> &mut Self {
        self.insert(key, Value::Digest(value))
    }

    pub fn address(&mut self, key: &'static str, value: Option<&Address>) -> &mut Self {
        match value {
            Some(addr) => self.digest(key, *addr.as_bytes()),
            None => self,
        }
    }

    pub fn map(&mut self, key: &'static str, value: CanonicalMap) -> &mut Self {
        self.insert(key, Value::Map(value))
    }

    pub fn encode(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        let mut buf = Vec::with_capacity(256);
        write_map(&mut buf, self)?;
        Ok(buf)
    }
}

fn len_u32(len: usize) -> Result<u32, TransactionBuilderError> {
    u32::try_from(len).map_err(|_| TransactionBuilderError::encoding("collection too large"))
}

fn write_map(buf: &mut Vec<u8>, map: &CanonicalMap) -> Result<(), TransactionBuilderError> {
    let mut entries: Vec<&(&'static str, Value)> = map.entries.iter().collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    if entries.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(TransactionBuilderError::encoding("duplicate map key"));
    }

    encode::write_map_len(buf, len_u32(entries.len())?).map_err(TransactionBuilderError::encoding)?;
    for (key, value) in entries {
        encode::write_str(buf, key).map_err(TransactionBuilderError::encoding)?;
        write_value(buf, value)?;
    }
    Ok(())
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), TransactionBuilderError> {
    match value {
        Value::Uint(v) => {
            encode::write_uint(buf, *v).map_err(TransactionBuilderError::encoding)?;
        }
        Value::Bool(v) => {
            encode::write_bool(buf, *v).map_err(TransactionBuilderError::encoding)?;
        }
        Value::Str(s) => {
            encode::write_str(buf, s).map_err(TransactionBuilderError::encoding)?;
        }
        Value::Bin(b) => {
            encode::write_bin(buf, b).map_err(TransactionBuilderError::encoding)?;
        }
        Value::Digest(d) => {
            encode::write_bin(buf, d).map_err(TransactionBuilderError::encoding)?;
        }
        Value::Map(m) => write_map(buf, m)?,
        Value::Array(items) => {
            encode::write_array_len(buf, len_u32(items.len())?)
                .map_err(TransactionBuilderError::encoding)?;
            for item in items {
                write_value(buf, item)?;
            }
        }
    }
    Ok(())
}

/// SHA-512/256 over a domain-separation prefix followed by the payload
pub(crate) fn prefixed_hash(prefix: &[u8], payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(payload);
    hasher.finalize().into()
}
