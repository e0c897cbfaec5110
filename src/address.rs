//! Ledger account addresses
//!
//! An address is a 32-byte Ed25519 public key. Its text form is the unpadded
//! base32 encoding of the key followed by a 4-byte checksum taken from the
//! tail of the key's SHA-512/256 digest.

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text form of the all-zero key. Used as the "burn" close-out target.
pub const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";

/// Length of the raw public key
pub const PUBLIC_KEY_LEN: usize = 32;

const CHECKSUM_LEN: usize = 4;
const ADDRESS_TEXT_LEN: usize = 58;

/// Errors raised while parsing an address string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must be {ADDRESS_TEXT_LEN} characters, got {0}")]
    Length(usize),

    #[error("address is not valid base32: {0}")]
    Encoding(String),

    #[error("address checksum mismatch")]
    Checksum,
}

/// A ledger account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; PUBLIC_KEY_LEN]);

impl Address {
    pub const fn new(public_key: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(public_key)
    }

    /// The all-zero address
    pub const fn zero() -> Self {
        Self([0u8; PUBLIC_KEY_LEN])
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = Sha512_256::digest(self.0);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        out
    }

    /// Encode to the 58-character text form
    pub fn encode(&self) -> String {
        let mut raw = Vec::with_capacity(PUBLIC_KEY_LEN + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        BASE32_NOPAD.encode(&raw)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_TEXT_LEN {
            return Err(AddressError::Length(s.len()));
        }

        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| AddressError::Encoding(e.to_string()))?;
        if raw.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
            return Err(AddressError::Length(s.len()));
        }

        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(&raw[..PUBLIC_KEY_LEN]);
        let address = Address(key);

        if address.checksum()[..] != raw[PUBLIC_KEY_LEN..] {
            return Err(AddressError::Checksum);
        }
        Ok(address)
    }
}

/// Check whether a string is a well-formed address with a valid checksum
pub fn is_valid_address(s: &str) -> bool {
    s.parse::<Address>().is_ok()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
