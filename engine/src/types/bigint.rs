//! The `bigint` value variant: an arbitrary-precision signed integer
//! (spec.md §3.1), backed by `num-bigint` the way the teacher's
//! `bigint.rs` / `types/language/bigint/*` use it.

use num_bigint::BigInt as NumBigInt;
use num_traits::{ToPrimitive, Zero};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsBigInt(pub Rc<NumBigInt>);

impl JsBigInt {
    pub fn from_i64(v: i64) -> Self {
        JsBigInt(Rc::new(NumBigInt::from(v)))
    }

    pub fn from_inner(v: NumBigInt) -> Self {
        JsBigInt(Rc::new(v))
    }

    pub fn inner(&self) -> &NumBigInt {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Parses the digits of a numeric-string-to-bigint conversion
    /// (whitespace-trimmed decimal, or 0x/0o/0b prefixed). Returns `None`
    /// on malformed input, matching `ToBigInt`'s string case (spec.md §4.6).
    pub fn parse_str(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Some(JsBigInt::from_i64(0));
        }
        let (radix, digits, negative) = if let Some(rest) = trimmed.strip_prefix("0x").or(trimmed.strip_prefix("0X")) {
            (16, rest, false)
        } else if let Some(rest) = trimmed.strip_prefix("0o").or(trimmed.strip_prefix("0O")) {
            (8, rest, false)
        } else if let Some(rest) = trimmed.strip_prefix("0b").or(trimmed.strip_prefix("0B")) {
            (2, rest, false)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (10, rest, true)
        } else {
            (10, trimmed, false)
        };
        if digits.is_empty() {
            return None;
        }
        let mut value = NumBigInt::parse_bytes(digits.as_bytes(), radix)?;
        if negative {
            value = -value;
        }
        Some(JsBigInt::from_inner(value))
    }
}

impl std::fmt::Display for JsBigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
