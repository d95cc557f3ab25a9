use std::ops::Mul;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::Percentage;

/// Percentage conveniences for the native numeric types: `10.percent()`,
/// `25.percent_of(n)`, `10.as_percentage_of(n)`.
pub trait AsPercentage: Sized {
    /// Wraps this number as a percentage. Integers are whole percent
    /// (`10.to_percentage()` is 10%); fractions and decimals are
    /// percentage-scaled (a decimal `17.5` becomes 17.5%).
    fn to_percentage(self) -> Percentage;

    fn percent(self) -> Percentage {
        self.to_percentage()
    }

    /// This percentage of `n`: `25.percent_of(16)` is 4. The result is a
    /// plain number of the operand's kind, not a percentage.
    fn percent_of<N: Mul<Percentage>>(self, n: N) -> N::Output {
        n * self.to_percentage()
    }

    /// What proportion of `n` this number is: `10.as_percentage_of(20)` is
    /// 50%. Panics when `n` is zero.
    fn as_percentage_of(self, n: Self) -> Percentage;
}

macro_rules! impl_as_percentage {
    ($($t:ty),*) => {$(
        impl AsPercentage for $t {
            fn to_percentage(self) -> Percentage {
                Percentage::int(self)
            }

            fn as_percentage_of(self, n: $t) -> Percentage {
                if n == 0 {
                    panic!("Can't express {} as a percentage of zero", self);
                }
                Percentage::ratio(BigRational::new(BigInt::from(self), BigInt::from(n)))
            }
        }
    )*}
}

impl_as_percentage!(i8, i16, i32, i64, u8, u16, u32, u64);

impl AsPercentage for BigDecimal {
    fn to_percentage(self) -> Percentage {
        Percentage::from(self)
    }

    fn as_percentage_of(self, n: BigDecimal) -> Percentage {
        if n.is_zero() {
            panic!("Can't express {} as a percentage of zero", self);
        }
        Percentage::decimal(self / n)
    }
}

impl AsPercentage for BigRational {
    fn to_percentage(self) -> Percentage {
        Percentage::from(self)
    }

    fn as_percentage_of(self, n: BigRational) -> Percentage {
        if n.is_zero() {
            panic!("Can't express {} as a percentage of zero", self);
        }
        Percentage::ratio(self / n)
    }
}
