use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::{fmt, iter, ops};

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::{dec_to_ratio, div_100, mul_100, ratio_to_dec};

/// A proportion, like "12.5%". Stored as a whole-percent integer, an exact
/// fraction, or an arbitrary-precision decimal, depending on how it was
/// built; all three interoperate in arithmetic and comparison.
#[derive(Clone, Debug)]
pub struct Percentage(Kind);

// Integer holds the whole-percent number (10 means 10%). Rational and
// Decimal hold the already-divided proportion (1/8 means 12.5%).
#[derive(Clone, Debug)]
enum Kind {
    Integer(BigInt),
    Rational(BigRational),
    Decimal(BigDecimal),
}

impl Percentage {
    /// Creates a percentage from a whole-percent number: `int(10)` is 10%.
    pub fn int(value: impl Into<BigInt>) -> Percentage {
        Percentage(Kind::Integer(value.into()))
    }

    /// Creates a percentage from the proportion itself: `ratio(1/8)` is
    /// 12.5%.
    pub fn ratio(value: BigRational) -> Percentage {
        // By construction, stored fractions are always reduced.
        Percentage(Kind::Rational(value.reduced()))
    }

    /// Creates a percentage from the proportion itself: `decimal(0.125)` is
    /// 12.5%.
    pub fn decimal(value: BigDecimal) -> Percentage {
        Percentage(Kind::Decimal(value))
    }

    /// The relative change from `before` to `after`, as an exact fraction:
    /// going from 2 to 3 is a 50% change. `None` when `before` is zero --
    /// change from a zero baseline is undefined, not exceptional.
    pub fn change(before: &BigRational, after: &BigRational) -> Option<Percentage> {
        if before.is_zero() {
            return None;
        }
        Some(Percentage::ratio((after - before) / before))
    }

    /// `change` between two integers.
    pub fn int_change(before: i64, after: i64) -> Option<Percentage> {
        Percentage::change(
            &BigRational::from_integer(BigInt::from(before)),
            &BigRational::from_integer(BigInt::from(after)),
        )
    }

    /// The proportion as an exact ratio: 12.5% is 1/8.
    pub fn to_ratio(&self) -> BigRational {
        match &self.0 {
            Kind::Integer(n) => BigRational::new(n.clone(), BigInt::from(100)),
            Kind::Rational(r) => r.clone(),
            Kind::Decimal(d) => dec_to_ratio(d),
        }
    }

    /// The proportion as an arbitrary-precision decimal: 12.5% is 0.125.
    /// Fractions without a terminating expansion are divided out at the
    /// decimal library's default precision.
    pub fn to_decimal(&self) -> BigDecimal {
        match &self.0 {
            Kind::Integer(n) => BigDecimal::new(n.clone(), 2),
            Kind::Rational(r) => ratio_to_dec(r),
            Kind::Decimal(d) => d.clone(),
        }
    }

    /// The whole-percent number, truncated toward zero: 12.5% becomes 12.
    pub fn to_int(&self) -> BigInt {
        match &self.0 {
            Kind::Integer(n) => n.clone(),
            _ => (self.to_ratio() * BigInt::from(100)).trunc().to_integer(),
        }
    }

    /// The percent magnitude as floating point: 12.5% becomes 12.5.
    pub fn to_f64(&self) -> f64 {
        (self.to_ratio() * BigInt::from(100))
            .to_f64()
            .unwrap_or(f64::NAN)
    }

    /// True iff both percentages have the same representation and the same
    /// stored value. `int(50)`, `ratio(1/2)`, and `decimal(0.5)` are all
    /// `==` each other, but no pair of them is `strict_eq`.
    pub fn strict_eq(&self, other: &Percentage) -> bool {
        match (&self.0, &other.0) {
            (Kind::Integer(a), Kind::Integer(b)) => a == b,
            (Kind::Rational(a), Kind::Rational(b)) => a == b,
            (Kind::Decimal(a), Kind::Decimal(b)) => a == b,
            _ => false,
        }
    }

    /// Truncates to a whole percent: 12.5% becomes 12%.
    pub fn truncate(&self) -> Percentage {
        match &self.0 {
            Kind::Integer(_) => self.clone(),
            _ => Percentage::int(self.to_int()),
        }
    }

    /// Truncates to `digits` decimal places of the percent magnitude, toward
    /// zero: 12.57% truncated to 1 digit becomes 12.5%. Keeps the
    /// representation.
    pub fn truncate_to(&self, digits: u32) -> Percentage {
        match &self.0 {
            Kind::Integer(_) => self.clone(),
            Kind::Rational(r) => {
                let pow = BigInt::from(10).pow(digits);
                let truncated = (r.clone() * BigInt::from(100) * pow.clone()).trunc() / pow;
                Percentage(Kind::Rational(truncated / BigInt::from(100)))
            }
            Kind::Decimal(d) => {
                let truncated = mul_100(d).with_scale_round(i64::from(digits), RoundingMode::Down);
                Percentage(Kind::Decimal(div_100(&truncated)))
            }
        }
    }

    /// Scales the stored value, keeping the representation: `int(10).scale(2)`
    /// is 20%. Contrast with multiplication, which works on the proportions:
    /// `int(10) * int(10)` is 1%.
    pub fn scale(&self, factor: i64) -> Percentage {
        match &self.0 {
            Kind::Integer(n) => Percentage(Kind::Integer(n.clone() * BigInt::from(factor))),
            Kind::Rational(r) => Percentage(Kind::Rational(
                r.clone() * BigRational::from_integer(BigInt::from(factor)),
            )),
            Kind::Decimal(d) => Percentage(Kind::Decimal(d.clone() * BigDecimal::from(factor))),
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            Kind::Integer(n) => write!(f, "{}%", n),
            Kind::Rational(r) => {
                let magnitude = (r.clone() * BigInt::from(100)).to_f64().unwrap_or(f64::NAN);
                write!(f, "{}%", with_fractional_digit(magnitude.to_string()))
            }
            Kind::Decimal(d) => {
                write!(f, "{}%", with_fractional_digit(plain_digits(mul_100(d))))
            }
        }
    }
}

// The decimal form keeps digits on both sides of the point; "50" becomes
// "50.0" so a non-integer representation survives a decode.
fn with_fractional_digit(mut s: String) -> String {
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

// Strips trailing zeros, and keeps the scale non-negative so the plain
// decimal notation is used.
fn plain_digits(value: BigDecimal) -> String {
    let normalized = value.normalized();
    if normalized.as_bigint_and_exponent().1 < 0 {
        normalized.with_scale(0).to_string()
    } else {
        normalized.to_string()
    }
}

impl PartialEq for Percentage {
    fn eq(&self, other: &Percentage) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Percentage {}

impl PartialOrd for Percentage {
    fn partial_cmp(&self, other: &Percentage) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percentage {
    fn cmp(&self, other: &Percentage) -> Ordering {
        match (&self.0, &other.0) {
            (Kind::Integer(a), Kind::Integer(b)) => a.cmp(b),
            (Kind::Rational(a), Kind::Rational(b)) => a.cmp(b),
            (Kind::Decimal(a), Kind::Decimal(b)) => a.cmp(b),
            _ => self.to_ratio().cmp(&other.to_ratio()),
        }
    }
}

// Equal proportions hash equal regardless of representation; to_ratio always
// returns a reduced fraction.
impl Hash for Percentage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_ratio().hash(state)
    }
}

// A bare number compares against the proportion, not the percent magnitude:
// int(50) equals the plain fraction 1/2.
impl PartialEq<BigRational> for Percentage {
    fn eq(&self, other: &BigRational) -> bool {
        self.to_ratio() == *other
    }
}

impl PartialOrd<BigRational> for Percentage {
    fn partial_cmp(&self, other: &BigRational) -> Option<Ordering> {
        Some(self.to_ratio().cmp(other))
    }
}

impl PartialEq<BigDecimal> for Percentage {
    fn eq(&self, other: &BigDecimal) -> bool {
        self.to_ratio() == dec_to_ratio(other)
    }
}

impl PartialOrd<BigDecimal> for Percentage {
    fn partial_cmp(&self, other: &BigDecimal) -> Option<Ordering> {
        Some(self.to_ratio().cmp(&dec_to_ratio(other)))
    }
}

impl ops::Add<&Percentage> for &Percentage {
    type Output = Percentage;

    fn add(self, other: &Percentage) -> Percentage {
        match (&self.0, &other.0) {
            // Same shape: sum the stored values directly.
            (Kind::Integer(a), Kind::Integer(b)) => Percentage::int(a + b),
            (Kind::Rational(a), Kind::Rational(b)) => Percentage::ratio(a + b),
            (Kind::Decimal(a), Kind::Decimal(b)) => Percentage::decimal(a + b),
            (Kind::Rational(r), Kind::Decimal(d)) | (Kind::Decimal(d), Kind::Rational(r)) => {
                Percentage::decimal(ratio_to_dec(r) + d)
            }
            // Mixed whole-percent and fractional: sum the proportions.
            (Kind::Integer(n), Kind::Rational(r)) | (Kind::Rational(r), Kind::Integer(n)) => {
                Percentage::ratio(BigRational::new(n.clone(), BigInt::from(100)) + r)
            }
            (Kind::Integer(n), Kind::Decimal(d)) | (Kind::Decimal(d), Kind::Integer(n)) => {
                Percentage::decimal(BigDecimal::new(n.clone(), 2) + d)
            }
        }
    }
}

impl ops::Add for Percentage {
    type Output = Percentage;

    fn add(self, other: Percentage) -> Percentage {
        &self + &other
    }
}

impl ops::Add<&Percentage> for Percentage {
    type Output = Percentage;

    fn add(self, other: &Percentage) -> Percentage {
        &self + other
    }
}

impl ops::Add<Percentage> for &Percentage {
    type Output = Percentage;

    fn add(self, other: Percentage) -> Percentage {
        self + &other
    }
}

impl ops::AddAssign for Percentage {
    fn add_assign(&mut self, other: Percentage) {
        *self = &*self + other;
    }
}

impl ops::Mul<&Percentage> for &Percentage {
    type Output = Percentage;

    fn mul(self, other: &Percentage) -> Percentage {
        Percentage::ratio(self.to_ratio() * other.to_ratio())
    }
}

impl ops::Mul for Percentage {
    type Output = Percentage;

    fn mul(self, other: Percentage) -> Percentage {
        &self * &other
    }
}

impl ops::Mul<&Percentage> for Percentage {
    type Output = Percentage;

    fn mul(self, other: &Percentage) -> Percentage {
        &self * other
    }
}

impl ops::Mul<Percentage> for &Percentage {
    type Output = Percentage;

    fn mul(self, other: Percentage) -> Percentage {
        self * &other
    }
}

// Multiplying by a plain number stays a plain number of that operand's kind;
// only percentage * percentage wraps the product.
macro_rules! impl_coerced_mul {
    ($other:ty, $convert:ident) => {
        impl ops::Mul<$other> for &Percentage {
            type Output = $other;

            fn mul(self, other: $other) -> $other {
                self.$convert() * other
            }
        }

        impl ops::Mul<$other> for Percentage {
            type Output = $other;

            fn mul(self, other: $other) -> $other {
                self.$convert() * other
            }
        }

        impl ops::Mul<Percentage> for $other {
            type Output = $other;

            fn mul(self, other: Percentage) -> $other {
                other.$convert() * self
            }
        }

        impl ops::Mul<&Percentage> for $other {
            type Output = $other;

            fn mul(self, other: &Percentage) -> $other {
                other.$convert() * self
            }
        }
    };
}

impl_coerced_mul!(BigDecimal, to_decimal);
impl_coerced_mul!(BigRational, to_ratio);

macro_rules! impl_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Percentage {
            fn from(value: $t) -> Percentage {
                Percentage::int(value)
            }
        }

        impl PartialEq<$t> for Percentage {
            fn eq(&self, other: &$t) -> bool {
                self.to_ratio() == BigRational::from_integer(BigInt::from(*other))
            }
        }

        impl PartialOrd<$t> for Percentage {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                Some(self.to_ratio().cmp(&BigRational::from_integer(BigInt::from(*other))))
            }
        }

        impl ops::Mul<$t> for &Percentage {
            type Output = BigRational;

            fn mul(self, other: $t) -> BigRational {
                self.to_ratio() * BigInt::from(other)
            }
        }

        impl ops::Mul<$t> for Percentage {
            type Output = BigRational;

            fn mul(self, other: $t) -> BigRational {
                &self * other
            }
        }

        impl ops::Mul<Percentage> for $t {
            type Output = BigRational;

            fn mul(self, other: Percentage) -> BigRational {
                &other * self
            }
        }

        impl ops::Mul<&Percentage> for $t {
            type Output = BigRational;

            fn mul(self, other: &Percentage) -> BigRational {
                other * self
            }
        }
    )*}
}

impl_int!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Interprets the number as percentage-scaled: a decimal 17.5 becomes 17.5%.
impl From<BigDecimal> for Percentage {
    fn from(value: BigDecimal) -> Percentage {
        Percentage::decimal(div_100(&value))
    }
}

/// Interprets the number as percentage-scaled: a fraction 35/2 becomes 17.5%.
impl From<BigRational> for Percentage {
    fn from(value: BigRational) -> Percentage {
        Percentage::ratio(value / BigInt::from(100))
    }
}

impl Zero for Percentage {
    fn zero() -> Percentage {
        Percentage::int(0)
    }

    fn is_zero(&self) -> bool {
        match &self.0 {
            Kind::Integer(n) => n.is_zero(),
            Kind::Rational(r) => r.is_zero(),
            Kind::Decimal(d) => d.is_zero(),
        }
    }
}

impl iter::Sum for Percentage {
    fn sum<I>(iter: I) -> Percentage
    where
        I: Iterator<Item = Percentage>,
    {
        let mut sum = Percentage::zero();
        for x in iter {
            sum += x;
        }
        sum
    }
}

impl Default for Percentage {
    fn default() -> Percentage {
        Percentage::zero()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    #[test]
    fn conversions() {
        let p = Percentage::int(12);
        assert_eq!(p.to_int(), BigInt::from(12));
        assert_eq!(p.to_f64(), 12.0);
        assert_eq!(p.to_ratio(), ratio(3, 25));
        assert_eq!(p.to_decimal(), dec("0.12"));

        let p = Percentage::ratio(ratio(1, 8));
        assert_eq!(p.to_int(), BigInt::from(12));
        assert_eq!(p.to_f64(), 12.5);
        assert_eq!(p.to_ratio(), ratio(1, 8));
        assert_eq!(p.to_decimal(), dec("0.125"));

        let p = Percentage::decimal(dec("0.175"));
        assert_eq!(p.to_int(), BigInt::from(17));
        assert_eq!(p.to_f64(), 17.5);
        assert_eq!(p.to_ratio(), ratio(7, 40));
        assert_eq!(p.to_decimal(), dec("0.175"));
    }

    #[test]
    fn display() {
        for (p, expected) in [
            (Percentage::int(10), "10%"),
            (Percentage::int(0), "0%"),
            (Percentage::int(250), "250%"),
            (Percentage::ratio(ratio(1, 8)), "12.5%"),
            (Percentage::ratio(ratio(1, 2)), "50.0%"),
            (Percentage::ratio(ratio(-1, 2)), "-50.0%"),
            (Percentage::decimal(dec("0.125")), "12.5%"),
            (Percentage::decimal(dec("0.5")), "50.0%"),
            (Percentage::decimal(dec("0.500")), "50.0%"),
            (Percentage::decimal(dec("0.1234")), "12.34%"),
            (Percentage::decimal(dec("2.5")), "250.0%"),
        ] {
            assert_eq!(p.to_string(), expected);
        }
    }

    #[test]
    fn loose_and_strict_equality() {
        let trio = [
            Percentage::int(50),
            Percentage::ratio(ratio(1, 2)),
            Percentage::decimal(dec("0.5")),
        ];
        for a in &trio {
            for b in &trio {
                assert_eq!(a, b);
            }
        }
        for (i, a) in trio.iter().enumerate() {
            for (j, b) in trio.iter().enumerate() {
                assert_eq!(a.strict_eq(b), i == j, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn strict_equality_ignores_fraction_form() {
        assert!(Percentage::ratio(ratio(2, 4)).strict_eq(&Percentage::ratio(ratio(1, 2))));
        assert!(Percentage::decimal(dec("0.50")).strict_eq(&Percentage::decimal(dec("0.5"))));
    }

    #[test]
    fn hashing_accumulates_equal_keys() {
        let mut counts = HashMap::new();
        for _ in 0..3 {
            *counts.entry(Percentage::int(10)).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&Percentage::int(10)], 3);

        // Cross-representation equal keys also land in one entry, since the
        // hash follows the loose equality.
        *counts.entry(Percentage::ratio(ratio(1, 10))).or_insert(0) += 1;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&Percentage::int(10)], 4);
    }

    #[test]
    fn ordering() {
        assert!(Percentage::ratio(ratio(1, 8)) > Percentage::ratio(ratio(1, 10)));
        assert!(Percentage::int(10) < Percentage::decimal(dec("0.125")));

        let mut percentages = vec![
            Percentage::int(50),
            Percentage::ratio(ratio(1, 8)),
            Percentage::decimal(dec("0.2")),
        ];
        percentages.sort();
        assert_eq!(
            percentages,
            vec![
                Percentage::ratio(ratio(1, 8)),
                Percentage::decimal(dec("0.2")),
                Percentage::int(50),
            ]
        );
    }

    #[test]
    fn comparing_against_plain_numbers() {
        // A bare number is a proportion, not a percent magnitude.
        assert!(Percentage::ratio(ratio(1, 8)) > ratio(1, 10));
        assert_eq!(Percentage::int(50), ratio(1, 2));
        assert_eq!(Percentage::int(50), dec("0.5"));
        assert!(Percentage::int(50) < dec("0.6"));
        assert_eq!(Percentage::int(100), 1);
        assert!(Percentage::int(50) < 1);
    }

    #[test]
    fn addition_of_whole_percents_stays_whole() {
        let sum = Percentage::int(10) + Percentage::int(10);
        assert!(sum.strict_eq(&Percentage::int(20)));
    }

    #[test]
    fn addition_of_mixed_shapes_sums_proportions() {
        let sum = Percentage::ratio(ratio(1, 8)) + Percentage::int(10);
        assert!(sum.strict_eq(&Percentage::ratio(ratio(9, 40))));

        let sum = Percentage::int(10) + Percentage::decimal(dec("0.125"));
        assert!(sum.strict_eq(&Percentage::decimal(dec("0.225"))));

        let sum = Percentage::ratio(ratio(1, 8)) + Percentage::decimal(dec("0.125"));
        assert!(sum.strict_eq(&Percentage::decimal(dec("0.25"))));

        let sum = Percentage::decimal(dec("0.1")) + Percentage::decimal(dec("0.15"));
        assert!(sum.strict_eq(&Percentage::decimal(dec("0.25"))));
    }

    #[test]
    fn multiplication_of_percentages_is_exact() {
        let product = Percentage::int(10) * Percentage::int(10);
        assert!(product.strict_eq(&Percentage::ratio(ratio(1, 100))));
        assert_eq!(product, Percentage::int(1));

        let product = Percentage::ratio(ratio(1, 2)) * Percentage::decimal(dec("0.5"));
        assert!(product.strict_eq(&Percentage::ratio(ratio(1, 4))));
    }

    #[test]
    fn multiplication_by_plain_numbers() {
        let amount = dec("99.00");
        let p = Percentage::decimal(dec("0.175"));
        assert_eq!(amount.clone() * p.clone(), dec("17.325"));
        assert_eq!(p.clone() * amount, dec("17.325"));

        assert_eq!(p * ratio(1, 2), ratio(7, 80));
        assert_eq!(Percentage::int(50) * 10, ratio(5, 1));
        assert_eq!(10 * Percentage::int(50), ratio(5, 1));
    }

    #[test]
    fn change_between_values() {
        assert_eq!(Percentage::int_change(2, 3), Some(Percentage::int(50)));
        assert!(Percentage::int_change(2, 3)
            .unwrap()
            .strict_eq(&Percentage::ratio(ratio(1, 2))));
        assert_eq!(Percentage::int_change(4, 3), Some(Percentage::int(-25)));
        assert_eq!(Percentage::int_change(0, 1), None);
        assert_eq!(
            Percentage::change(&ratio(1, 2), &ratio(3, 4)),
            Some(Percentage::int(50))
        );
    }

    #[test]
    fn scale_keeps_the_representation() {
        assert!(Percentage::int(10).scale(2).strict_eq(&Percentage::int(20)));
        assert!(Percentage::ratio(ratio(1, 8))
            .scale(2)
            .strict_eq(&Percentage::ratio(ratio(1, 4))));
        assert!(Percentage::decimal(dec("0.125"))
            .scale(3)
            .strict_eq(&Percentage::decimal(dec("0.375"))));

        // scale works on the stored value; multiplication on the proportions.
        assert_eq!(Percentage::int(10).scale(2), Percentage::int(20));
        assert_eq!(
            Percentage::int(10) * Percentage::int(10),
            Percentage::int(1)
        );
    }

    #[test]
    fn truncate_collapses_to_whole_percent() {
        assert!(Percentage::ratio(ratio(1, 8))
            .truncate()
            .strict_eq(&Percentage::int(12)));
        assert!(Percentage::decimal(dec("0.125"))
            .truncate()
            .strict_eq(&Percentage::int(12)));
        assert!(Percentage::int(12).truncate().strict_eq(&Percentage::int(12)));
        // Toward zero, not down.
        assert!(Percentage::ratio(ratio(-1, 8))
            .truncate()
            .strict_eq(&Percentage::int(-12)));
    }

    #[test]
    fn truncate_to_digits_of_the_percent_magnitude() {
        // 100/3 percent is 33.333...%; two digits keeps 33.33%.
        let p = Percentage::ratio(ratio(1, 3)).truncate_to(2);
        assert!(p.strict_eq(&Percentage::ratio(ratio(3333, 10000))));

        let p = Percentage::decimal(dec("0.12567")).truncate_to(1);
        assert!(p.strict_eq(&Percentage::decimal(dec("0.125"))));

        let p = Percentage::int(12).truncate_to(1);
        assert!(p.strict_eq(&Percentage::int(12)));
    }

    #[test]
    fn zero() {
        assert!(Percentage::zero().is_zero());
        assert!(Percentage::int(0).is_zero());
        assert!(Percentage::ratio(ratio(0, 5)).is_zero());
        assert!(Percentage::decimal(dec("0.00")).is_zero());
        assert!(!Percentage::int(1).is_zero());
        assert!(Percentage::default().is_zero());
    }

    #[test]
    fn sum() {
        let total: Percentage = vec![
            Percentage::int(10),
            Percentage::int(20),
            Percentage::ratio(ratio(1, 2)),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Percentage::int(80));
    }

    #[test]
    fn from_conversions() {
        assert!(Percentage::from(10i64).strict_eq(&Percentage::int(10)));
        assert!(Percentage::from(dec("17.5")).strict_eq(&Percentage::decimal(dec("0.175"))));
        assert!(Percentage::from(ratio(35, 2)).strict_eq(&Percentage::ratio(ratio(7, 40))));
    }
}
