//! Wallet management module
//!
//! A [`Wallet`] owns one Ed25519 signing key. Signing consumes a built
//! transaction into a [`SignedTransaction`], which is what the node accepts.

use crate::address::Address;
use crate::tx_builder::encoding::CanonicalMap;
use crate::tx_builder::{Transaction, TransactionBuilderError, TxBuildOutput};
use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroize;

/// Length of the exported key: seed followed by public key
const KEYPAIR_LENGTH: usize = 64;

/// Holds a signing key and the address it controls
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Create from a raw 32-byte seed
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let address = Address::new(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Create from the base64 private key exported by ledger account tooling
    /// (64 bytes: seed followed by public key)
    pub fn from_private_key(encoded: &str) -> Result<Self, TransactionBuilderError> {
        let mut bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| TransactionBuilderError::signing(format!("key is not base64: {}", e)))?;

        let result = if bytes.len() != KEYPAIR_LENGTH {
            Err(TransactionBuilderError::signing(format!(
                "expected a {}-byte key, got {} bytes",
                KEYPAIR_LENGTH,
                bytes.len()
            )))
        } else if bytes.iter().all(|&b| b == 0) {
            Err(TransactionBuilderError::signing("all-zero key rejected"))
        } else {
            let mut keypair = [0u8; KEYPAIR_LENGTH];
            keypair.copy_from_slice(&bytes);
            let parsed = SigningKey::from_keypair_bytes(&keypair).map_err(|_| {
                TransactionBuilderError::signing("public key half does not match the seed")
            });
            keypair.zeroize();
            parsed.map(|signing_key| Self {
                address: Address::new(signing_key.verifying_key().to_bytes()),
                signing_key,
            })
        };
        bytes.zeroize();
        result
    }

    /// Load a base64 private key from a file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let mut contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path))?;
        let wallet = Self::from_private_key(&contents)
            .with_context(|| format!("Invalid key in {}", path));
        contents.zeroize();
        wallet
    }

    /// Fresh random account
    pub fn generate() -> Self {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut seed);
        let wallet = Self::from_seed(&seed);
        seed.zeroize();
        wallet
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Export in the same base64 form `from_private_key` accepts
    pub fn private_key_base64(&self) -> String {
        let mut keypair = self.signing_key.to_keypair_bytes();
        let encoded = BASE64.encode(keypair);
        keypair.zeroize();
        encoded
    }

    /// Sign a transaction this wallet sends
    pub fn sign(&self, tx: Transaction) -> Result<SignedTransaction, TransactionBuilderError> {
        if tx.sender != self.address {
            return Err(TransactionBuilderError::signing(format!(
                "transaction sender {} is not the signing account {}",
                tx.sender, self.address
            )));
        }
        self.sign_unchecked(tx, None)
    }

    /// Sign for an account that was rekeyed to this wallet
    pub fn sign_with_authority(
        &self,
        tx: Transaction,
    ) -> Result<SignedTransaction, TransactionBuilderError> {
        let authorizer = (tx.sender != self.address).then_some(self.address);
        self.sign_unchecked(tx, authorizer)
    }

    /// Sign every member of a build output, preserving order
    pub fn sign_all(
        &self,
        output: TxBuildOutput,
    ) -> Result<Vec<SignedTransaction>, TransactionBuilderError> {
        output
            .into_transactions()
            .into_iter()
            .map(|tx| self.sign(tx))
            .collect()
    }

    fn sign_unchecked(
        &self,
        tx: Transaction,
        authorizer: Option<Address>,
    ) -> Result<SignedTransaction, TransactionBuilderError> {
        let message = tx.bytes_to_sign()?;
        let signature = self.signing_key.sign(&message).to_bytes();
        Ok(SignedTransaction {
            transaction: tx,
            signature,
            authorizer,
        })
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// A transaction with its sender's signature attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: [u8; 64],
    authorizer: Option<Address>,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signature(&self) -> &[u8; 64] {
        &self.signature
    }

    /// Signing account when it differs from the sender (rekeyed accounts)
    pub fn authorizer(&self) -> Option<Address> {
        self.authorizer
    }

    pub fn id(&self) -> Result<String, TransactionBuilderError> {
        self.transaction.id()
    }

    /// Canonical encoding as submitted to the node
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        let mut map = CanonicalMap::new();
        map.bytes("sig", &self.signature)
            .address("sgnr", self.authorizer.as_ref())
            .map("txn", self.transaction.to_canonical_map());
        map.encode()
    }
}
