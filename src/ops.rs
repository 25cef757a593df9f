//! Homomorphic operators over ciphertexts.
//!
//! None of these touch a private key. Plaintext results are always modulo
//! `n`; see [`crate::encoding`] for the bounds that keep them exact.

use log::trace;
use num_bigint::{BigInt, BigUint};
use num_traits::Signed;

use crate::arith::mod_inverse;
use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};

/// `c1 · c2 mod n²`, decrypting to `m1 + m2 mod n`.
pub fn add(c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext> {
    c1.check_same_key(c2, "add")?;
    trace!("homomorphic add under {}-bit modulus", c1.modulus().bits());
    let c = (c1.value() * c2.value()) % c1.n_squared();
    Ok(c1.with_value(c))
}

/// `c · g^k mod n²`, decrypting to `m + k mod n`. No fresh randomness is
/// added, so the result is linkable to `c`.
pub fn add_plain(c: &Ciphertext, k: &BigUint) -> Ciphertext {
    let n = c.modulus();
    // g^k = (n + 1)^k ≡ 1 + k·n (mod n²)
    let g_k = (BigUint::from(1u32) + (k % n) * n) % c.n_squared();
    c.with_value((c.value() * g_k) % c.n_squared())
}

/// `c^k mod n²`, decrypting to `k · m mod n`.
///
/// Only exact integer multipliers are supported. Apply a fraction `a / b` by
/// multiplying by `a` here and dividing by `b` after decryption.
pub fn scalar_multiply(c: &Ciphertext, k: &BigUint) -> Ciphertext {
    trace!("homomorphic scalar multiply by {}-bit scalar", k.bits());
    c.with_value(c.value().modpow(k, c.n_squared()))
}

/// Like [`scalar_multiply`] but accepts negative multipliers.
pub fn scalar_multiply_signed(c: &Ciphertext, k: &BigInt) -> Result<Ciphertext> {
    let product = scalar_multiply(c, k.magnitude());
    if k.is_negative() {
        negate(&product)
    } else {
        Ok(product)
    }
}

/// `c^-1 mod n²`, decrypting to `-m mod n`.
pub fn negate(c: &Ciphertext) -> Result<Ciphertext> {
    let inverse = mod_inverse(c.value(), c.n_squared())
        .ok_or(Error::InvalidCiphertext("value is not invertible modulo n²"))?;
    Ok(c.with_value(inverse))
}

/// `add(c1, negate(c2))`, decrypting to `m1 - m2 mod n`.
pub fn sub(c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext> {
    c1.check_same_key(c2, "sub")?;
    add(c1, &negate(c2)?)
}

/// Homomorphic sum of every ciphertext yielded. `Ok(None)` when empty.
pub fn sum<'a, I>(ciphertexts: I) -> Result<Option<Ciphertext>>
where
    I: IntoIterator<Item = &'a Ciphertext>,
{
    let mut iter = ciphertexts.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    iter.try_fold(first.clone(), |acc, c| add(&acc, c)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decrypt::{decrypt, decrypt_signed};
    use crate::encrypt::{encrypt, encrypt_signed};
    use crate::test_utils::{keypair, other_keypair};
    use proptest::prelude::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn add_plain_shifts_plaintext() {
        let (pk, sk) = keypair();
        let c = encrypt(pk, &big(100)).unwrap();
        let shifted = add_plain(&c, &big(23));
        assert_eq!(decrypt(sk, pk, &shifted).unwrap(), big(123));
    }

    #[test]
    fn subtraction_goes_negative() {
        let (pk, sk) = keypair();
        let a = encrypt(pk, &big(8500)).unwrap();
        let b = encrypt(pk, &big(12000)).unwrap();
        let diff = sub(&a, &b).unwrap();
        assert_eq!(decrypt_signed(sk, pk, &diff).unwrap(), BigInt::from(-3500));
        assert_eq!(decrypt(sk, pk, &diff).unwrap(), pk.n() - 3500u32);
    }

    #[test]
    fn negative_scalar() {
        let (pk, sk) = keypair();
        let c = encrypt_signed(pk, &BigInt::from(-7)).unwrap();
        let product = scalar_multiply_signed(&c, &BigInt::from(-6)).unwrap();
        assert_eq!(decrypt_signed(sk, pk, &product).unwrap(), BigInt::from(42));
    }

    #[test]
    fn multiply_by_zero_gives_encryption_of_zero() {
        let (pk, sk) = keypair();
        let c = encrypt(pk, &big(9800)).unwrap();
        assert_eq!(decrypt(sk, pk, &scalar_multiply(&c, &big(0))).unwrap(), big(0));
    }

    #[test]
    fn mixing_keys_is_rejected() {
        let (pk, _) = keypair();
        let (other_pk, _) = other_keypair();
        let a = encrypt(pk, &big(1)).unwrap();
        let b = encrypt(other_pk, &big(2)).unwrap();
        assert!(matches!(add(&a, &b), Err(Error::KeyMismatch { operation: "add" })));
        assert!(matches!(sub(&a, &b), Err(Error::KeyMismatch { operation: "sub" })));
        assert!(matches!(sum([&a, &b]), Err(Error::KeyMismatch { .. })));
    }

    #[test]
    fn non_unit_cannot_be_negated() {
        let (pk, _) = keypair();
        let zero = Ciphertext::from_parts(big(0), pk.n().clone()).unwrap();
        assert!(matches!(negate(&zero), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn empty_sum() {
        assert!(sum(std::iter::empty()).unwrap().is_none());
    }

    #[test]
    fn summation_order_does_not_matter() {
        let (pk, sk) = keypair();
        let [a, b, c] = [5000u64, 12000, 8500].map(|v| encrypt(pk, &big(v)).unwrap());

        let left = add(&add(&a, &b).unwrap(), &c).unwrap();
        let right = add(&a, &add(&b, &c).unwrap()).unwrap();
        let swapped = add(&add(&b, &a).unwrap(), &c).unwrap();
        let folded = sum([&c, &a, &b]).unwrap().unwrap();

        for total in [left, right, swapped, folded] {
            assert_eq!(decrypt(sk, pk, &total).unwrap(), big(25500));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 16, ..ProptestConfig::default() })]

        #[test]
        fn addition_is_homomorphic(x in any::<u64>(), y in any::<u64>()) {
            let (pk, sk) = keypair();
            let total = add(&encrypt(pk, &big(x)).unwrap(), &encrypt(pk, &big(y)).unwrap()).unwrap();
            prop_assert_eq!(decrypt(sk, pk, &total).unwrap(), big(x) + big(y));
        }

        #[test]
        fn addition_wraps_modulo_n(x in any::<u64>()) {
            let (pk, sk) = keypair();
            let near_top = pk.n() - 1u32;
            let total = add(&encrypt(pk, &near_top).unwrap(), &encrypt(pk, &big(x)).unwrap()).unwrap();
            prop_assert_eq!(decrypt(sk, pk, &total).unwrap(), (near_top + big(x)) % pk.n());
        }

        #[test]
        fn scalar_multiplication_is_linear(m in any::<u64>(), k in any::<u32>()) {
            let (pk, sk) = keypair();
            let product = scalar_multiply(&encrypt(pk, &big(m)).unwrap(), &BigUint::from(k));
            prop_assert_eq!(decrypt(sk, pk, &product).unwrap(), big(m) * k);
        }

        #[test]
        fn subtraction_inverts_addition(x in any::<i64>(), y in any::<i64>()) {
            let (pk, sk) = keypair();
            let a = encrypt_signed(pk, &BigInt::from(x)).unwrap();
            let b = encrypt_signed(pk, &BigInt::from(y)).unwrap();
            let diff = sub(&a, &b).unwrap();
            prop_assert_eq!(decrypt_signed(sk, pk, &diff).unwrap(), BigInt::from(x) - y);
        }
    }
}
