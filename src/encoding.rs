//! Mapping between application numbers and the plaintext space `[0, n)`.
//!
//! Negative values wrap around the modulus: `v` is encoded as `v mod n` and
//! anything above `(n - 1) / 2` decodes as negative. Decimal amounts are
//! scaled to integer minor units before they ever reach the cipher; floating
//! point is never encrypted.
//!
//! Sums only decode correctly while the true result stays within
//! `±(n - 1) / 2`. For `k` inputs each later multiplied by at most `K`, keep
//! every input below [`max_summand_magnitude`].

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};
use crate::keys::PublicKey;

/// Largest magnitude a signed plaintext may have, `(n - 1) / 2`.
pub fn max_magnitude(key: &PublicKey) -> BigUint {
    (key.n() - BigUint::one()) >> 1
}

/// Per-input magnitude bound for an aggregate of `summands` values, each
/// multiplied by a scalar no larger than `max_scalar`.
pub fn max_summand_magnitude(key: &PublicKey, summands: usize, max_scalar: &BigUint) -> BigUint {
    let summands = BigUint::from(summands.max(1));
    let max_scalar = if max_scalar.is_zero() { BigUint::one() } else { max_scalar.clone() };
    max_magnitude(key) / (summands * max_scalar)
}

/// Encode a signed integer into `[0, n)`.
pub fn encode_signed(key: &PublicKey, value: &BigInt) -> Result<BigUint> {
    let bound = max_magnitude(key);
    if value.magnitude() > &bound {
        return Err(Error::InvalidPlaintext { reason: "magnitude exceeds (n - 1) / 2", bound });
    }
    let n = BigInt::from(key.n().clone());
    let (_, m) = value.mod_floor(&n).into_parts();
    Ok(m)
}

/// Inverse of [`encode_signed`].
pub fn decode_signed(key: &PublicKey, m: &BigUint) -> BigInt {
    let m = m % key.n();
    if m > max_magnitude(key) {
        BigInt::from(m) - BigInt::from(key.n().clone())
    } else {
        BigInt::from(m)
    }
}

/// Fixed-point decimal amounts stored as integer minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    decimals: u32,
}

impl FixedPoint {
    /// Two decimal places: amounts in cents.
    pub const CURRENCY: FixedPoint = FixedPoint { decimals: 2 };

    pub const fn new(decimals: u32) -> Self {
        FixedPoint { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// `10^decimals`
    pub fn scale(&self) -> BigInt {
        num_traits::pow(BigInt::from(10u32), self.decimals as usize)
    }

    /// Parse a decimal string such as `"250.50"` into minor units (`25050`).
    ///
    /// Exact: more fractional digits than `decimals` is an error, not a
    /// rounding.
    pub fn parse(&self, input: &str) -> Result<BigInt> {
        let invalid = |reason| Error::InvalidAmount { input: input.to_owned(), reason };

        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid("not a decimal number"));
        }
        let width = self.decimals as usize;
        if fraction.len() > width {
            return Err(invalid("too many decimal places"));
        }

        let units: BigInt = format!("{whole}{fraction:0<width$}")
            .parse()
            .map_err(|_| invalid("not a decimal number"))?;
        Ok(if negative { -units } else { units })
    }

    /// Render minor units as a decimal string, e.g. `850000` -> `"8500.00"`.
    pub fn format(&self, units: &BigInt) -> String {
        let sign = if units.is_negative() { "-" } else { "" };
        let digits = units.magnitude().to_str_radix(10);
        if self.decimals == 0 {
            return format!("{sign}{digits}");
        }
        let width = self.decimals as usize + 1;
        let padded = format!("{digits:0>width$}");
        let (whole, fraction) = padded.split_at(padded.len() - self.decimals as usize);
        format!("{sign}{whole}.{fraction}")
    }
}

/// `numerator / denominator` rounded half away from zero. `None` for a zero
/// denominator.
pub fn div_round(numerator: &BigInt, denominator: &BigInt) -> Option<BigInt> {
    if denominator.is_zero() {
        return None;
    }
    let (quotient, remainder) = numerator.div_rem(denominator);
    if (remainder.magnitude() << 1) >= *denominator.magnitude() {
        let away = if numerator.is_negative() == denominator.is_negative() {
            BigInt::one()
        } else {
            -BigInt::one()
        };
        Some(quotient + away)
    } else {
        Some(quotient)
    }
}
