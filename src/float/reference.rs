//! Native integer rendition of the addition network.
//!
//! Takes the same branches and produces bit-identical outputs, including an
//! unchecked exponent past `2^k - 1`. Used to predict the network outputs
//! and for differential testing.

use super::{EncodedFloat, FloatFormat};

/// Sort key that orders well-formed floats by value
fn magnitude(format: &FloatFormat, x: &EncodedFloat) -> u128 {
    ((x.e as u128) << (format.precision + 1)) + x.m as u128
}

/// Sum of two well-formed floats, rounded half up to `p` bits.
/// `None` if either operand is not well formed or the aligned sum does not
/// fit in `u128`.
pub fn add(format: &FloatFormat, lhs: EncodedFloat, rhs: EncodedFloat) -> Option<EncodedFloat> {
    if format.wide_precision() >= 127 {
        return None;
    }
    if !lhs.is_well_formed(format) || !rhs.is_well_formed(format) {
        return None;
    }
    let (alpha, beta) = if magnitude(format, &lhs) < magnitude(format, &rhs) {
        (rhs, lhs)
    } else {
        (lhs, rhs)
    };

    let p = format.precision;
    let diff = alpha.e - beta.e;
    if diff > p as u64 + 1 || alpha.e == 0 {
        return Some(alpha);
    }

    let wide = format.wide_precision();
    let sum = ((alpha.m as u128) << diff) + beta.m as u128;
    let top = (127 - sum.leading_zeros()) as usize;
    let normalized = sum << (wide - top);
    let e = beta.e + top as u64 - p as u64;

    let half = 1u128 << p;
    if normalized < (1u128 << (wide + 1)) - half {
        Some(EncodedFloat::new(e, ((normalized + half) >> (p + 1)) as u64))
    } else {
        Some(EncodedFloat::new(e + 1, 1 << p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAB: FloatFormat = FloatFormat::LAB;

    fn f(e: u64, m: u64) -> EncodedFloat {
        EncodedFloat::new(e, m)
    }

    #[test]
    fn doubling() {
        assert_eq!(add(&LAB, f(5, 18), f(5, 18)), Some(f(6, 18)));
    }

    #[test]
    fn mixed_exponents() {
        // 64 + 32 = 96
        assert_eq!(add(&LAB, f(6, 16), f(5, 16)), Some(f(6, 24)));
        // 62 + 2.125 rounds down to 64
        assert_eq!(add(&LAB, f(5, 31), f(1, 17)), Some(f(6, 16)));
    }

    #[test]
    fn ties_round_up() {
        // 17 + 2 = 19 is exact
        assert_eq!(add(&LAB, f(4, 17), f(1, 16)), Some(f(4, 19)));
        // 31 + 2 = 33 = 16.5·2 ties up to 17·2
        assert_eq!(add(&LAB, f(4, 31), f(1, 16)), Some(f(5, 17)));
    }

    #[test]
    fn negligible_operand_is_bypassed() {
        assert_eq!(add(&LAB, f(20, 16), f(10, 31)), Some(f(20, 16)));
        assert_eq!(add(&LAB, f(10, 31), f(20, 16)), Some(f(20, 16)));
    }

    #[test]
    fn zero_is_identity() {
        assert_eq!(add(&LAB, EncodedFloat::ZERO, f(9, 21)), Some(f(9, 21)));
        assert_eq!(add(&LAB, f(9, 21), EncodedFloat::ZERO), Some(f(9, 21)));
        assert_eq!(
            add(&LAB, EncodedFloat::ZERO, EncodedFloat::ZERO),
            Some(EncodedFloat::ZERO)
        );
    }

    #[test]
    fn malformed_operands() {
        assert_eq!(add(&LAB, f(0, 3), f(5, 18)), None);
        assert_eq!(add(&LAB, f(5, 18), f(5, 15)), None);
    }

    #[test]
    fn agrees_with_f64_when_exact() {
        let sum = add(&LAB, f(7, 20), f(5, 24)).unwrap();
        assert_eq!(sum.to_f64(&LAB), 160.0 + 48.0);
    }
}
