//! Float format parameters and the native encoded-float value

use std::fmt;

use p3_field::PrimeField64;
use serde::{Deserialize, Serialize};

use crate::circuit::CircuitBuilder;
use crate::error::{CircuitError, Result};

/// Exponent width `k` and mantissa precision `p` of an encoded float.
///
/// A nonzero float is `m · 2^(e - p)` with `e` a `k`-bit exponent and
/// `m ∈ [2^p, 2^(p+1))`; zero is `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatFormat {
    /// `k`
    pub exponent_bits: usize,
    /// `p`, number of fractional mantissa bits
    pub precision: usize,
}

impl FloatFormat {
    /// Small instance for experiments and tests
    pub const LAB: Self = Self::new(8, 4);
    pub const HALF: Self = Self::new(5, 10);
    pub const BFLOAT16: Self = Self::new(8, 7);
    pub const SINGLE: Self = Self::new(8, 23);

    pub const fn new(exponent_bits: usize, precision: usize) -> Self {
        Self {
            exponent_bits,
            precision,
        }
    }

    /// Precision of the aligned sum before rounding (`2p + 1`)
    pub fn wide_precision(&self) -> usize {
        2 * self.precision + 1
    }

    /// Widest bit decomposition the adder performs
    pub fn max_decomposition_bits(&self) -> usize {
        let k = self.exponent_bits;
        let p = self.precision;
        (k + p + 2).max(2 * p + 3)
    }

    /// Smallest mantissa of a nonzero float (`2^p`), saturating at
    /// `u64::MAX` when `p >= 64`
    pub fn min_mantissa(&self) -> u64 {
        pow2_u64(self.precision).unwrap_or(u64::MAX)
    }

    /// Largest exponent (`2^k - 1`), saturating at `u64::MAX`
    pub fn max_exponent(&self) -> u64 {
        pow2_u64(self.exponent_bits).map_or(u64::MAX, |bound| bound - 1)
    }

    /// Check the format can be proven over `F`
    pub fn validate<F: PrimeField64>(&self) -> Result<()> {
        let invalid = |reason| CircuitError::InvalidFormat {
            exponent_bits: self.exponent_bits,
            precision: self.precision,
            reason,
        };
        if self.exponent_bits == 0 {
            return Err(invalid("exponent width must be positive"));
        }
        if self.precision == 0 {
            return Err(invalid("precision must be positive"));
        }
        if self.exponent_bits >= 63 || (self.precision as u64 + 1) >> self.exponent_bits != 0 {
            return Err(invalid("p + 1 must fit in k bits"));
        }
        CircuitBuilder::<F>::check_bits(self.max_decomposition_bits())
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={} p={}", self.exponent_bits, self.precision)
    }
}

/// An `(e, m)` pair as plain integers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedFloat {
    pub e: u64,
    pub m: u64,
}

impl EncodedFloat {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(e: u64, m: u64) -> Self {
        Self { e, m }
    }

    pub fn is_zero(&self) -> bool {
        self.e == 0 && self.m == 0
    }

    /// `e = 0 ⟺ m = 0`, and a nonzero float has a k-bit exponent and a
    /// mantissa in `[2^p, 2^(p+1))`
    pub fn is_well_formed(&self, format: &FloatFormat) -> bool {
        if self.e == 0 {
            return self.m == 0;
        }
        // top bit of m sits at index p
        self.e <= format.max_exponent()
            && self.m != 0
            && (63 - self.m.leading_zeros()) as usize == format.precision
    }

    /// Represented value `m · 2^(e - p)`
    pub fn to_f64(&self, format: &FloatFormat) -> f64 {
        if self.e == 0 {
            return 0.0;
        }
        let exp = self.e as i64 - format.precision as i64;
        self.m as f64 * 2f64.powi(exp as i32)
    }

    /// Nearest encoding of a nonnegative finite `x`, rounding half up.
    /// `None` when `x` is below `2` (the smallest nonzero magnitude) or past
    /// the largest exponent.
    pub fn from_f64(format: &FloatFormat, x: f64) -> Option<Self> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        if x == 0.0 {
            return Some(Self::ZERO);
        }
        let bits = x.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let mut exp = biased - 1023;
        if biased == 0 || exp < 1 {
            return None;
        }
        let significand = (bits & ((1 << 52) - 1)) | (1 << 52);
        let p = format.precision;
        if p >= 64 {
            return None;
        }
        let mut m = if p >= 52 {
            (significand as u128) << (p - 52)
        } else {
            let dropped = 52 - p;
            ((significand as u128) + (1 << (dropped - 1))) >> dropped
        };
        if m == 2 << p {
            m = 1 << p;
            exp += 1;
        }
        if exp as u64 > format.max_exponent() {
            return None;
        }
        u64::try_from(m).ok().map(|m| Self::new(exp as u64, m))
    }

    /// `[e, m]` as field elements; values past the field order are rejected
    /// rather than reduced
    pub fn to_fields<F: PrimeField64>(&self) -> Result<[F; 2]> {
        Ok([canonical(self.e)?, canonical(self.m)?])
    }
}

fn canonical<F: PrimeField64>(value: u64) -> Result<F> {
    if value >= F::ORDER_U64 {
        return Err(CircuitError::OutOfField {
            value,
            order: F::ORDER_U64,
        });
    }
    Ok(F::from_canonical_u64(value))
}

fn pow2_u64(bits: usize) -> Option<u64> {
    u32::try_from(bits).ok().and_then(|bits| 1u64.checked_shl(bits))
}

impl fmt::Display for EncodedFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(e={}, m={})", self.e, self.m)
    }
}
