use num_bigint::{BigInt, BigUint};

use crate::arith::l_function;
use crate::ciphertext::Ciphertext;
use crate::encoding::decode_signed;
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey};

/// Decrypt a Paillier ciphertext to its plaintext in `[0, n)`.
///
/// `m = L(c^λ mod n²) · μ mod n`, where `L(u) = (u − 1) / n`.
pub fn decrypt(private_key: &PrivateKey, public_key: &PublicKey, ct: &Ciphertext) -> Result<BigUint> {
    if !private_key.matches(public_key) || !ct.is_under(public_key) {
        return Err(Error::KeyMismatch { operation: "decrypt" });
    }

    let n = public_key.n();
    if !ct.is_unit() {
        return Err(Error::Decryption("ciphertext is not a unit modulo n²"));
    }

    let x = ct.value().modpow(private_key.lambda(), public_key.n_squared());
    let l = l_function(&x, n).ok_or(Error::Decryption("c^λ is not 1 modulo n"))?;
    Ok((l * private_key.mu()) % n)
}

/// Decrypt and map the result back to a signed integer.
pub fn decrypt_signed(
    private_key: &PrivateKey,
    public_key: &PublicKey,
    ct: &Ciphertext,
) -> Result<BigInt> {
    let m = decrypt(private_key, public_key, ct)?;
    Ok(decode_signed(public_key, &m))
}
