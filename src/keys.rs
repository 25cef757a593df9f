use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::arith::{coprime, gen_prime, is_probable_prime, l_function, mod_inverse};
use crate::error::{Error, Result};

/// Smallest modulus accepted by [`KeyGenerator`].
///
/// Anything at or below 1024 bits is for demonstrations only and offers no
/// meaningful security.
pub const MIN_KEY_BITS: usize = 512;

/// Modulus size used when nothing else is configured.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Number of `(p, q)` pairs sampled before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 16;

// Odd candidates tried per prime bit before a single prime search gives up.
// Prime density among odd k-bit numbers is about 2.9 / k.
const PRIME_CANDIDATES_PER_BIT: usize = 20;

/// A Paillier public key.
///
/// Only the modulus is stored on the wire; `g = n + 1` and `n²` are derived.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodedPublicKey", into = "EncodedPublicKey")]
pub struct PublicKey {
    n:         BigUint,
    n_squared: BigUint,
    g:         BigUint,
}

impl PublicKey {
    /// Rebuild a public key from its modulus.
    pub fn from_modulus(n: BigUint) -> Result<Self> {
        if n.is_even() || n <= BigUint::from(3u32) || is_probable_prime(&n) {
            return Err(Error::InvalidPublicKey("modulus must be an odd composite"));
        }
        let n_squared = &n * &n;
        let g = &n + BigUint::one();
        Ok(PublicKey { n, n_squared, g })
    }

    /// The modulus `n = p·q`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// The generator, always `n + 1`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Size of the modulus in bits.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// `g^m mod n²` for `g = n + 1`, which is `1 + m·n` by the binomial theorem.
    pub(crate) fn g_pow(&self, m: &BigUint) -> BigUint {
        (BigUint::one() + (m % &self.n) * &self.n) % &self.n_squared
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.bits())
            .field("n", &self.n.to_str_radix(16))
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct EncodedPublicKey {
    #[serde(with = "crate::codec::biguint")]
    n: BigUint,
}

impl TryFrom<EncodedPublicKey> for PublicKey {
    type Error = Error;

    fn try_from(encoded: EncodedPublicKey) -> Result<Self> {
        PublicKey::from_modulus(encoded.n)
    }
}

impl From<PublicKey> for EncodedPublicKey {
    fn from(key: PublicKey) -> Self {
        EncodedPublicKey { n: key.n }
    }
}

/// A Paillier private key.
///
/// Deliberately neither `Clone` nor `Serialize`: it stays with whoever
/// generated it.
pub struct PrivateKey {
    n:      BigUint,
    lambda: BigUint,
    mu:     BigUint,
}

impl PrivateKey {
    /// Modulus of the public key this private key belongs to.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub(crate) fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    pub(crate) fn mu(&self) -> &BigUint {
        &self.mu
    }

    pub fn matches(&self, public_key: &PublicKey) -> bool {
        self.n == public_key.n
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.n.bits())
            .finish_non_exhaustive()
    }
}

/// Generates Paillier keypairs with a bounded number of attempts.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    bit_length:   usize,
    max_attempts: usize,
}

impl KeyGenerator {
    pub fn new(bit_length: usize) -> Self {
        KeyGenerator { bit_length, max_attempts: DEFAULT_MAX_ATTEMPTS }
    }

    /// Ceiling on the number of prime pairs sampled.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Generate a keypair from the thread-local CSPRNG.
    pub fn generate(&self) -> Result<(PublicKey, PrivateKey)> {
        self.generate_with_rng(&mut thread_rng())
    }

    pub fn generate_with_rng<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicKey, PrivateKey)> {
        if self.bit_length < MIN_KEY_BITS || self.bit_length % 2 != 0 {
            return Err(Error::InvalidKeySize { bits: self.bit_length, min: MIN_KEY_BITS });
        }

        let prime_bits = self.bit_length / 2;
        let max_candidates = PRIME_CANDIDATES_PER_BIT * prime_bits;

        for attempt in 1..=self.max_attempts {
            match try_keypair(rng, prime_bits, max_candidates) {
                Some(keys) => {
                    debug!("generated {}-bit keypair on attempt {attempt}", self.bit_length);
                    return Ok(keys);
                }
                None => debug!("keypair attempt {attempt}/{} rejected", self.max_attempts),
            }
        }

        Err(Error::KeyGeneration { attempts: self.max_attempts })
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        KeyGenerator::new(DEFAULT_KEY_BITS)
    }
}

fn try_keypair<R: Rng + ?Sized>(
    rng: &mut R,
    prime_bits: usize,
    max_candidates: usize,
) -> Option<(PublicKey, PrivateKey)> {
    let p = gen_prime(rng, prime_bits, max_candidates)?;
    let q = gen_prime(rng, prime_bits, max_candidates)?;
    if p == q {
        return None;
    }

    let one = BigUint::one();
    let p_minus_1 = &p - &one;
    let q_minus_1 = &q - &one;
    let n = &p * &q;
    if !coprime(&n, &(&p_minus_1 * &q_minus_1)) {
        return None;
    }

    let public = PublicKey::from_modulus(n).ok()?;
    let lambda = p_minus_1.lcm(&q_minus_1);
    // μ = L(g^λ mod n²)^-1 mod n
    let l = l_function(&public.g.modpow(&lambda, &public.n_squared), &public.n)?;
    let mu = mod_inverse(&l, &public.n)?;

    let private = PrivateKey { n: public.n.clone(), lambda, mu };
    Some((public, private))
}
