use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_prime::nt_funcs::is_prime;
use num_prime::PrimalityTestConfig;
use num_traits::{One, Zero};
use rand::Rng;

/// Probabilistic primality test (Miller-Rabin followed by a strong Lucas test).
pub(crate) fn is_probable_prime(candidate: &BigUint) -> bool {
    is_prime(candidate, Some(PrimalityTestConfig::default())).probably()
}

/// Sample a random prime of exactly `bits` length.
///
/// The two most significant bits are forced so that the product of two such
/// primes has exactly `2 * bits` bits. Gives up after `max_candidates` odd
/// candidates and returns `None`.
pub(crate) fn gen_prime<R: Rng + ?Sized>(
    rng: &mut R,
    bits: usize,
    max_candidates: usize,
) -> Option<BigUint> {
    debug_assert!(bits >= 2);
    for _ in 0..max_candidates {
        // 1) random < 2^bits
        let mut cand = rng.gen_biguint(bits as u64);
        // 2) top two bits set -> exactly `bits` long, and p*q has 2*bits bits
        cand |= BigUint::one() << (bits - 1);
        cand |= BigUint::one() << (bits - 2);
        // 3) ensure odd
        cand |= BigUint::one();
        if is_probable_prime(&cand) {
            return Some(cand);
        }
    }
    None
}

/// Sample `r` uniformly from `(Z/nZ)*`, i.e. `0 < r < n` and `gcd(r, n) = 1`.
pub(crate) fn random_unit<R: Rng + ?Sized>(rng: &mut R, n: &BigUint) -> BigUint {
    let one = BigUint::one();
    loop {
        let r = rng.gen_biguint_range(&one, n);
        if r.gcd(n).is_one() {
            return r;
        }
    }
}

/// `a^-1 mod m`, if it exists.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    a.modinv(m)
}

/// The Paillier `L` function, `L(x) = (x - 1) / n`.
///
/// Returns `None` unless `x ≡ 1 (mod n)`, which holds for every `x` in the
/// order-`n` subgroup of `(Z/n²Z)*`.
pub(crate) fn l_function(x: &BigUint, n: &BigUint) -> Option<BigUint> {
    if x.is_zero() {
        return None;
    }
    let (quotient, remainder) = (x - BigUint::one()).div_rem(n);
    remainder.is_zero().then_some(quotient)
}

/// `gcd(a, b) == 1`
pub(crate) fn coprime(a: &BigUint, b: &BigUint) -> bool {
    a.gcd(b).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn recognises_small_primes_and_composites() {
        for p in [2u32, 3, 5, 7, 65_537, 2_147_483_647] {
            assert!(is_probable_prime(&BigUint::from(p)), "{p} is prime");
        }
        // 561 is a Carmichael number, 65_535 = 3 * 5 * 17 * 257
        for c in [1u32, 4, 561, 65_535] {
            assert!(!is_probable_prime(&BigUint::from(c)), "{c} is composite");
        }
    }

    #[test]
    fn generated_primes_have_exact_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for bits in [16usize, 64, 128] {
            let p = gen_prime(&mut rng, bits, 100 * bits).unwrap();
            assert_eq!(p.bits(), bits as u64);
            assert!(p.bit(bits as u64 - 2));
            assert!(is_probable_prime(&p));
        }
    }

    #[test]
    fn prime_search_is_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(gen_prime(&mut rng, 256, 0).is_none());
    }

    #[test]
    fn random_unit_is_coprime_and_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        // 3 * 5 * 7 * 11: plenty of non-units to skip over
        let n = BigUint::from(1155u32);
        for _ in 0..200 {
            let r = random_unit(&mut rng, &n);
            assert!(!r.is_zero() && r < n);
            assert!(coprime(&r, &n));
        }
    }

    #[test]
    fn modular_inverse() {
        let m = BigUint::from(35u32);
        let inv = mod_inverse(&BigUint::from(3u32), &m).unwrap();
        assert_eq!(inv, BigUint::from(12u32));
        assert!(mod_inverse(&BigUint::from(7u32), &m).is_none());
        assert!(mod_inverse(&BigUint::from(7u32), &BigUint::zero()).is_none());
    }

    #[test]
    fn l_function_requires_exact_division() {
        let n = BigUint::from(15u32);
        assert_eq!(l_function(&BigUint::from(46u32), &n), Some(BigUint::from(3u32)));
        assert_eq!(l_function(&BigUint::one(), &n), Some(BigUint::zero()));
        assert_eq!(l_function(&BigUint::from(47u32), &n), None);
        assert_eq!(l_function(&BigUint::zero(), &n), None);
    }
}
