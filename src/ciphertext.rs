use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::arith::coprime;
use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// A Paillier ciphertext: an element of `[0, n²)` tagged with its modulus.
///
/// The modulus travels with the value so that combining ciphertexts from two
/// different keys is detected instead of silently producing garbage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedCiphertext", into = "EncodedCiphertext")]
pub struct Ciphertext {
    c:         BigUint,
    n:         BigUint,
    n_squared: BigUint,
}

impl Ciphertext {
    /// Wrap a raw value received from elsewhere, checking `c < n²`.
    pub fn from_parts(c: BigUint, n: BigUint) -> Result<Self> {
        let n_squared = &n * &n;
        if c >= n_squared {
            return Err(Error::InvalidCiphertext("value is not reduced modulo n²"));
        }
        Ok(Ciphertext { c, n, n_squared })
    }

    pub(crate) fn new(c: BigUint, key: &PublicKey) -> Self {
        Ciphertext { c, n: key.n().clone(), n_squared: key.n_squared().clone() }
    }

    /// Same modulus, new value. `c` must already be reduced modulo `n²`.
    pub(crate) fn with_value(&self, c: BigUint) -> Self {
        debug_assert!(c < self.n_squared);
        Ciphertext { c, n: self.n.clone(), n_squared: self.n_squared.clone() }
    }

    /// The raw ciphertext integer.
    pub fn value(&self) -> &BigUint {
        &self.c
    }

    /// Modulus `n` of the key this ciphertext was produced under.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Whether the value lies in `(Z/n²Z)*`. Every honestly produced
    /// ciphertext does; anything else poisons sums it is multiplied into.
    pub fn is_unit(&self) -> bool {
        !self.c.is_zero() && self.c < self.n_squared && coprime(&self.c, &self.n)
    }

    pub fn is_under(&self, key: &PublicKey) -> bool {
        &self.n == key.n()
    }

    pub(crate) fn check_same_key(&self, other: &Ciphertext, operation: &'static str) -> Result<()> {
        if self.n != other.n {
            return Err(Error::KeyMismatch { operation });
        }
        Ok(())
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ciphertext")
            .field("c", &self.c.to_str_radix(16))
            .field("modulus_bits", &self.n.bits())
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct EncodedCiphertext {
    #[serde(with = "crate::codec::biguint")]
    c: BigUint,
    #[serde(with = "crate::codec::biguint")]
    n: BigUint,
}

impl TryFrom<EncodedCiphertext> for Ciphertext {
    type Error = Error;

    fn try_from(encoded: EncodedCiphertext) -> Result<Self> {
        Ciphertext::from_parts(encoded.c, encoded.n)
    }
}

impl From<Ciphertext> for EncodedCiphertext {
    fn from(ct: Ciphertext) -> Self {
        EncodedCiphertext { c: ct.c, n: ct.n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encrypt::encrypt;
    use crate::test_utils::keypair;

    #[test]
    fn json_keeps_modulus_alongside_value() {
        let (pk, _) = keypair();
        let ct = encrypt(pk, &BigUint::from(42u32)).unwrap();
        let json = serde_json::to_value(&ct).unwrap();
        assert!(json.get("c").is_some());
        assert!(json.get("n").is_some());

        let back: Ciphertext = serde_json::from_value(json).unwrap();
        assert_eq!(back, ct);
        assert!(back.is_under(pk));
    }

    #[test]
    fn only_units_qualify() {
        let (pk, _) = keypair();
        let n = pk.n().clone();
        assert!(encrypt(pk, &BigUint::from(7u32)).unwrap().is_unit());
        for c in [BigUint::zero(), n.clone(), &n * 2u32] {
            assert!(!Ciphertext::from_parts(c, n.clone()).unwrap().is_unit());
        }
    }

    #[test]
    fn unreduced_values_are_rejected() {
        let n = BigUint::from(15u32);
        assert!(Ciphertext::from_parts(BigUint::from(224u32), n.clone()).is_ok());
        assert!(matches!(
            Ciphertext::from_parts(BigUint::from(225u32), n),
            Err(Error::InvalidCiphertext(_))
        ));
    }
}
