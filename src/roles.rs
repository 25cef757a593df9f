//! The parties of a private aggregation session.
//!
//! A [`Branch`] only ever sees the public key, the [`Aggregator`] only ever
//! sees the public key and ciphertexts, and [`Headquarters`] is the single
//! holder of the private key.

use log::{debug, warn};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use crate::ciphertext::Ciphertext;
use crate::decrypt::decrypt_signed;
use crate::encoding::{div_round, FixedPoint};
use crate::encrypt::encrypt_signed;
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::ops;

/// A customer account; `balance` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id:      u32,
    pub name:    String,
    pub balance: BigInt,
}

/// One encrypted value handed to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub producer:   String,
    pub ciphertext: Ciphertext,
}

/// Homomorphic total of `count` submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedTotal {
    pub count:      usize,
    pub ciphertext: Ciphertext,
}

impl EncryptedTotal {
    /// Multiply the encrypted total by an integer, without decrypting.
    pub fn scaled(&self, factor: &BigUint) -> EncryptedTotal {
        EncryptedTotal { count: self.count, ciphertext: ops::scalar_multiply(&self.ciphertext, factor) }
    }
}

/// A data producer holding customer accounts and the public key.
#[derive(Debug)]
pub struct Branch {
    id:         String,
    public_key: PublicKey,
    accounts:   Vec<Account>,
}

impl Branch {
    pub fn new(id: impl Into<String>, public_key: PublicKey) -> Self {
        Branch { id: id.into(), public_key, accounts: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Encrypt every balance. Stops at the first balance outside the
    /// plaintext range.
    pub fn encrypt_balances(&self) -> Result<Vec<Submission>> {
        self.accounts
            .iter()
            .map(|account| {
                let ciphertext = encrypt_signed(&self.public_key, &account.balance)?;
                debug!("{}: encrypted balance of account {}", self.id, account.id);
                Ok(Submission { producer: format!("{}/{}", self.id, account.id), ciphertext })
            })
            .collect()
    }
}

/// The computing party: an append-only ledger of ciphertexts under one
/// public key. It has no way to decrypt anything it holds.
#[derive(Debug)]
pub struct Aggregator {
    public_key: PublicKey,
    ledger:     Vec<Submission>,
}

impl Aggregator {
    pub fn new(public_key: PublicKey) -> Self {
        Aggregator { public_key, ledger: Vec::new() }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Append a submission, returning the ledger size. Ciphertexts under any
    /// other key, or outside `(Z/n²Z)*`, are refused so one bad value cannot
    /// spoil every later total.
    pub fn submit(&mut self, submission: Submission) -> Result<usize> {
        if !submission.ciphertext.is_under(&self.public_key) {
            warn!("rejected submission from {}: foreign modulus", submission.producer);
            return Err(Error::KeyMismatch { operation: "submit" });
        }
        if !submission.ciphertext.is_unit() {
            warn!("rejected submission from {}: not a unit modulo n²", submission.producer);
            return Err(Error::InvalidCiphertext("value is not a unit modulo n²"));
        }
        self.ledger.push(submission);
        Ok(self.ledger.len())
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Homomorphic sum of the whole ledger; `None` while it is empty.
    pub fn encrypted_total(&self) -> Result<Option<EncryptedTotal>> {
        let total = ops::sum(self.ledger.iter().map(|s| &s.ciphertext))?;
        Ok(total.map(|ciphertext| EncryptedTotal { count: self.ledger.len(), ciphertext }))
    }
}

/// The trusted party holding the private key.
#[derive(Debug)]
pub struct Headquarters {
    public_key:  PublicKey,
    private_key: PrivateKey,
    format:      FixedPoint,
}

impl Headquarters {
    pub fn new(public_key: PublicKey, private_key: PrivateKey, format: FixedPoint) -> Result<Self> {
        if !private_key.matches(&public_key) {
            return Err(Error::KeyMismatch { operation: "headquarters" });
        }
        Ok(Headquarters { public_key, private_key, format })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn format(&self) -> FixedPoint {
        self.format
    }

    /// Decrypted total in minor units.
    pub fn decrypt_total(&self, total: &EncryptedTotal) -> Result<BigInt> {
        decrypt_signed(&self.private_key, &self.public_key, &total.ciphertext)
    }

    /// Mean of the aggregated values in minor units, rounded half away from
    /// zero.
    pub fn average(&self, total: &EncryptedTotal) -> Result<BigInt> {
        let sum = self.decrypt_total(total)?;
        div_round(&sum, &BigInt::from(total.count)).ok_or(Error::EmptyAggregate)
    }

    /// Decrypt a total that was homomorphically multiplied by a numerator and
    /// finish the fraction by dividing by `denominator`.
    pub fn decrypt_ratio(&self, scaled: &EncryptedTotal, denominator: &BigInt) -> Result<BigInt> {
        let product = self.decrypt_total(scaled)?;
        div_round(&product, denominator).ok_or(Error::EmptyAggregate)
    }
}
