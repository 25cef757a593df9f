use num_bigint::BigUint;

/// Failures reported by the encryption engine.
///
/// Every variant carries enough context to tell which operand or bound was at
/// fault. No operation mutates its inputs, so an error never leaves a key or
/// ciphertext half-updated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("key generation failed after {attempts} attempts")]
    KeyGeneration { attempts: usize },

    #[error("modulus size {bits} is not supported: must be even and at least {min} bits")]
    InvalidKeySize { bits: usize, min: usize },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    #[error("plaintext out of range: {reason} (bound {bound})")]
    InvalidPlaintext { reason: &'static str, bound: BigUint },

    #[error("{operation}: operands were produced under different public keys")]
    KeyMismatch { operation: &'static str },

    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(&'static str),

    #[error("decryption failed: {0}")]
    Decryption(&'static str),

    #[error("aggregate covers no submissions")]
    EmptyAggregate,

    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
