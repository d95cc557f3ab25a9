//! An exact percentage value type.
//!
//! A [`Percentage`] wraps one of three interchangeable representations -- a
//! whole-percent integer, an exact rational fraction, or an
//! arbitrary-precision decimal fraction -- and lets all three interoperate in
//! arithmetic, comparison, and the canonical `"12.5%"` text form.

mod codec;
mod ext;
mod percentage;

pub use crate::ext::AsPercentage;
pub use crate::percentage::Percentage;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

/// Converts a decimal to the exact fraction it denotes.
pub(crate) fn dec_to_ratio(d: &BigDecimal) -> BigRational {
    let (digits, scale) = d.as_bigint_and_exponent();
    let ten = BigInt::from(10);
    if scale >= 0 {
        BigRational::new(digits, ten.pow(scale as u32))
    } else {
        BigRational::new(digits * ten.pow((-scale) as u32), BigInt::one())
    }
}

/// Divides numerator by denominator at the decimal library's default
/// precision. Only lossy for fractions without a terminating expansion.
pub(crate) fn ratio_to_dec(r: &BigRational) -> BigDecimal {
    BigDecimal::from(r.numer().clone()) / BigDecimal::from(r.denom().clone())
}

/// Divides a decimal by 100 exactly, as a scale shift.
pub(crate) fn div_100(d: &BigDecimal) -> BigDecimal {
    let (digits, scale) = d.as_bigint_and_exponent();
    BigDecimal::new(digits, scale + 2)
}

/// Multiplies a decimal by 100 exactly, as a scale shift.
pub(crate) fn mul_100(d: &BigDecimal) -> BigDecimal {
    let (digits, scale) = d.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - 2)
}
