use num_bigint::{BigInt, BigUint};
use rand::{thread_rng, CryptoRng, Rng};

use crate::arith::random_unit;
use crate::ciphertext::Ciphertext;
use crate::encoding::encode_signed;
use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// Encrypt `m` under `key`, drawing the blinding factor from the thread-local
/// CSPRNG.
///
/// `m` must lie in `[0, n)`; use [`encrypt_signed`] for negative values.
pub fn encrypt(key: &PublicKey, m: &BigUint) -> Result<Ciphertext> {
    encrypt_with_rng(key, m, &mut thread_rng())
}

/// `c = g^m · r^n mod n²` with a fresh `r ∈ (Z/nZ)*`.
pub fn encrypt_with_rng<R: Rng + CryptoRng + ?Sized>(
    key: &PublicKey,
    m: &BigUint,
    rng: &mut R,
) -> Result<Ciphertext> {
    if m >= key.n() {
        return Err(Error::InvalidPlaintext {
            reason: "plaintext must be below the modulus n",
            bound: key.n().clone(),
        });
    }

    let r = random_unit(rng, key.n());
    let c = key.g_pow(m) * r.modpow(key.n(), key.n_squared()) % key.n_squared();
    Ok(Ciphertext::new(c, key))
}

/// Encrypt a signed integer with `|value| ≤ (n - 1) / 2`.
pub fn encrypt_signed(key: &PublicKey, value: &BigInt) -> Result<Ciphertext> {
    let m = encode_signed(key, value)?;
    encrypt(key, &m)
}
