//! Private aggregation with the Paillier cryptosystem.
//!
//! Producers encrypt values under a shared [`PublicKey`], an untrusted party
//! adds the ciphertexts together, and only the holder of the matching
//! [`PrivateKey`] can decrypt the aggregate. Individual inputs are never
//! revealed to the computing party.
//!
//! ```no_run
//! use homomorphic_aggregate::{decrypt, encrypt, generate_keys, homomorphic_add};
//! use num_bigint::BigUint;
//!
//! let (pk, sk) = generate_keys(2048)?;
//! let a = encrypt(&pk, &BigUint::from(5000u32))?;
//! let b = encrypt(&pk, &BigUint::from(12000u32))?;
//! let sum = homomorphic_add(&a, &b)?;
//! assert_eq!(decrypt(&sk, &pk, &sum)?, BigUint::from(17000u32));
//! # Ok::<(), homomorphic_aggregate::Error>(())
//! ```
//!
//! Plaintexts live in `[0, n)` and every result is reduced modulo `n`; see
//! [`encoding`] for signed and fixed-point values and the magnitude bounds
//! that keep aggregates exact.

pub(crate) mod arith;
pub mod ciphertext;
pub mod codec;
pub mod config;
pub mod decrypt;
pub mod demo;
pub mod encoding;
pub mod encrypt;
mod error;
pub mod keys;
pub mod ops;
pub mod roles;
pub mod server;
#[cfg(test)]
mod test_utils;

use num_bigint::BigUint;

pub use ciphertext::Ciphertext;
pub use error::{Error, Result};
pub use keys::{KeyGenerator, PrivateKey, PublicKey, DEFAULT_KEY_BITS, MIN_KEY_BITS};

/// Generate a keypair with a `bit_length`-bit modulus.
///
/// `bit_length` must be even and at least [`MIN_KEY_BITS`]. Sizes up to 1024
/// bits are only suitable for demonstrations; use 2048 or more otherwise.
pub fn generate_keys(bit_length: usize) -> Result<(PublicKey, PrivateKey)> {
    KeyGenerator::new(bit_length).generate()
}

/// Encrypt `plaintext ∈ [0, n)` with a fresh blinding factor.
pub fn encrypt(public_key: &PublicKey, plaintext: &BigUint) -> Result<Ciphertext> {
    encrypt::encrypt(public_key, plaintext)
}

/// Ciphertext of the sum of both plaintexts, modulo `n`.
pub fn homomorphic_add(a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
    ops::add(a, b)
}

/// Ciphertext of `k` times the plaintext, modulo `n`.
pub fn homomorphic_scalar_multiply(ciphertext: &Ciphertext, k: &BigUint) -> Ciphertext {
    ops::scalar_multiply(ciphertext, k)
}

/// Recover the plaintext in `[0, n)`.
pub fn decrypt(private_key: &PrivateKey, public_key: &PublicKey, ciphertext: &Ciphertext) -> Result<BigUint> {
    decrypt::decrypt(private_key, public_key, ciphertext)
}
