use std::str::FromStr;

use anyhow::{bail, Result};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{div_100, Percentage};

// The wire form is the display form: "12%" for whole percent, "12.5%" for
// the fractional representations. Parsing only recognizes those two shapes;
// a fraction decodes back as a decimal.

impl Percentage {
    /// Parses the canonical text form: `"12%"` is whole percent, `"12.5%"`
    /// is a decimal. Everything else is an error.
    pub fn parse(string: &str) -> Result<Percentage> {
        let number = match string.strip_suffix('%') {
            Some(n) => n,
            None => bail!("Percentage {:?}: missing % suffix", string),
        };

        if is_digits(number) {
            return Ok(Percentage::int(number.parse::<BigInt>()?));
        }

        if let Some((whole, frac)) = number.split_once('.') {
            if is_digits(whole) && is_digits(frac) {
                return Ok(Percentage::decimal(div_100(&number.parse::<BigDecimal>()?)));
            }
        }

        bail!("Percentage {:?}: expected digits or digits.digits before the %", string);
    }

    /// Probes a scalar for the percentage grammar. `None` means the scalar
    /// is something else; let the host format interpret it.
    pub fn decode(scalar: &str) -> Option<Percentage> {
        Percentage::parse(scalar).ok()
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Percentage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Percentage> {
        Percentage::parse(s)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        Percentage::parse(&string).map_err(serde::de::Error::custom)
    }
}
