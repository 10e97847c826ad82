//! Resource amounts in the notation the cluster API uses on the wire:
//! `250m`, `2`, `512Mi`, `1.5Gi`, `123456789n`, `1e3`.
//!
//! Values are held in nano-units so CPU reported by the metrics server
//! (`n` suffix) and memory in binary suffixes share one representation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NANOS_PER_UNIT: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const MAX_DIGITS: usize = 24;
const MAX_EXPONENT: i32 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),
    #[error("unknown suffix {suffix:?} in quantity {raw:?}")]
    UnknownSuffix { raw: String, suffix: String },
    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// A parsed resource amount. Keeps the original text for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    raw: String,
    nanos: i128,
}

impl Quantity {
    pub fn from_milli(milli: i64) -> Self {
        Quantity {
            raw: format!("{milli}m"),
            nanos: i128::from(milli) * NANOS_PER_MILLI,
        }
    }

    /// Whole units, rounded up.
    pub fn value(&self) -> i64 {
        saturate(ceil_div(self.nanos, NANOS_PER_UNIT))
    }

    /// Thousandths of a unit, rounded up.
    pub fn milli_value(&self) -> i64 {
        saturate(ceil_div(self.nanos, NANOS_PER_MILLI))
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, unsigned) = if let Some(rest) = raw.strip_prefix('-') {
            (true, rest)
        } else {
            (false, raw.strip_prefix('+').unwrap_or(raw))
        };

        let number_len = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_len);
        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));

        if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
            return Err(QuantityError::InvalidNumber(raw.to_string()));
        }
        if int_part.len() + frac_part.len() > MAX_DIGITS {
            return Err(QuantityError::OutOfRange(raw.to_string()));
        }

        let mantissa = int_part
            .bytes()
            .chain(frac_part.bytes())
            .fold(0i128, |acc, b| acc * 10 + i128::from(b - b'0'));

        let (multiplier, exponent) = parse_suffix(raw, suffix)?;
        let out_of_range = || QuantityError::OutOfRange(raw.to_string());

        // frac_part.len() is bounded by MAX_DIGITS, exponent by MAX_EXPONENT
        let shift = 9 + exponent - frac_part.len() as i32;
        let scaled = mantissa.checked_mul(multiplier).ok_or_else(out_of_range)?;
        let nanos = if shift >= 0 {
            10i128
                .checked_pow(shift as u32)
                .and_then(|factor| scaled.checked_mul(factor))
                .ok_or_else(out_of_range)?
        } else {
            match 10i128.checked_pow(shift.unsigned_abs()) {
                Some(divisor) => ceil_div(scaled, divisor),
                None => i128::from(scaled > 0),
            }
        };

        Ok(Quantity {
            raw: raw.to_string(),
            nanos: if negative { -nanos } else { nanos },
        })
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.raw
    }
}

/// Returns (binary multiplier, decimal exponent) for a suffix.
fn parse_suffix(raw: &str, suffix: &str) -> Result<(i128, i32), QuantityError> {
    let scale = match suffix {
        "" => (1, 0),
        "Ki" => (1 << 10, 0),
        "Mi" => (1 << 20, 0),
        "Gi" => (1 << 30, 0),
        "Ti" => (1 << 40, 0),
        "Pi" => (1 << 50, 0),
        "Ei" => (1 << 60, 0),
        "n" => (1, -9),
        "u" => (1, -6),
        "m" => (1, -3),
        "k" => (1, 3),
        "M" => (1, 6),
        "G" => (1, 9),
        "T" => (1, 12),
        "P" => (1, 15),
        "E" => (1, 18),
        _ => {
            let exponent = suffix
                .strip_prefix(|c: char| c == 'e' || c == 'E')
                .and_then(|e| e.parse::<i32>().ok())
                .ok_or_else(|| QuantityError::UnknownSuffix {
                    raw: raw.to_string(),
                    suffix: suffix.to_string(),
                })?;
            if exponent.abs() > MAX_EXPONENT {
                return Err(QuantityError::OutOfRange(raw.to_string()));
            }
            (1, exponent)
        }
    };
    Ok(scale)
}

fn ceil_div(n: i128, d: i128) -> i128 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}

fn saturate(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
