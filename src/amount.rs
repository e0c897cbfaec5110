//! Exact fixed-point amounts
//!
//! Ledger amounts are unsigned integers in base units. An asset's `decimals`
//! says how many of the low digits are fractional. Conversion to and from the
//! display string is exact for every `u64` and every precision in `0..=19`.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Largest precision an asset may declare
pub const MAX_DECIMALS: u8 = 19;

/// Precision of the native currency (micro-units)
pub const NATIVE_DECIMALS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("decimals must be at most {MAX_DECIMALS}, got {0}")]
    TooManyDecimals(u8),

    #[error("malformed amount {0:?}")]
    Malformed(String),

    #[error("amount {0:?} has more fractional digits than {1} decimals allow")]
    Precision(String, u8),

    #[error("amount {0:?} does not fit the ledger's 64-bit range")]
    Overflow(String),
}

/// A raw integer amount paired with its decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amount {
    raw: u64,
    decimals: u8,
}

impl Amount {
    pub fn new(raw: u64, decimals: u8) -> Result<Self, AmountError> {
        if decimals > MAX_DECIMALS {
            return Err(AmountError::TooManyDecimals(decimals));
        }
        Ok(Self { raw, decimals })
    }

    /// A native-currency amount given in micro-units
    pub fn native(micro: u64) -> Self {
        Self {
            raw: micro,
            decimals: NATIVE_DECIMALS,
        }
    }

    /// Build from a precision reported by a remote service, clamping it into range
    pub(crate) fn lenient(raw: u64, decimals: u64) -> Self {
        Self {
            raw,
            decimals: decimals.min(MAX_DECIMALS as u64) as u8,
        }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Parse a display string such as `"12.5"` back into base units
    pub fn parse(text: &str, decimals: u8) -> Result<Self, AmountError> {
        if decimals > MAX_DECIMALS {
            return Err(AmountError::TooManyDecimals(decimals));
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
            return Err(AmountError::Malformed(text.to_string()));
        }
        if fraction.len() > decimals as usize {
            return Err(AmountError::Precision(text.to_string(), decimals));
        }

        let overflow = || AmountError::Overflow(text.to_string());
        let scale = 10u64.pow(decimals as u32);
        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction_value: u64 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fraction, width = decimals as usize);
            padded.parse().map_err(|_| overflow())?
        };

        let raw = whole_value
            .checked_mul(scale)
            .and_then(|v| v.checked_add(fraction_value))
            .ok_or_else(overflow)?;
        Ok(Self { raw, decimals })
    }

    /// Lossy floating-point view, for prices and market-cap arithmetic only
    pub fn to_f64(&self) -> f64 {
        self.raw as f64 / 10f64.powi(self.decimals as i32)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.raw);
        }
        let scale = 10u64.pow(self.decimals as u32);
        let whole = self.raw / scale;
        let fraction = self.raw % scale;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0>width$}", fraction, width = self.decimals as usize);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Amount::native(1_000).to_string(), "0.001");
        assert_eq!(Amount::native(5_000_000).to_string(), "5");
        assert_eq!(Amount::new(1_234_500, 4).unwrap().to_string(), "123.45");
        assert_eq!(Amount::new(42, 0).unwrap().to_string(), "42");
        assert_eq!(
            Amount::new(u64::MAX, 19).unwrap().to_string(),
            "1.8446744073709551615"
        );
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(Amount::parse("0.001", 6).unwrap().raw(), 1_000);
        assert_eq!(Amount::parse("5", 6).unwrap().raw(), 5_000_000);
        assert_eq!(Amount::parse(".5", 1).unwrap().raw(), 5);
        assert_eq!(Amount::parse("7.", 2).unwrap().raw(), 700);
    }

    #[test]
    fn test_parse_rejections() {
        assert!(matches!(Amount::parse("1.234", 2), Err(AmountError::Precision(..))));
        assert!(matches!(Amount::parse("-1", 2), Err(AmountError::Malformed(_))));
        assert!(matches!(Amount::parse(".", 2), Err(AmountError::Malformed(_))));
        assert!(matches!(
            Amount::parse("18446744073709551616", 0),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!(Amount::parse("2", 19), Err(AmountError::Overflow(_))));
        assert_eq!(Amount::new(1, 20), Err(AmountError::TooManyDecimals(20)));
    }

    #[test]
    fn test_lenient_clamps_precision() {
        assert_eq!(Amount::lenient(10, 300).decimals(), MAX_DECIMALS);
    }

    proptest! {
        #[test]
        fn prop_display_round_trip(raw in any::<u64>(), decimals in 0u8..=MAX_DECIMALS) {
            let amount = Amount::new(raw, decimals).unwrap();
            let parsed = Amount::parse(&amount.to_string(), decimals).unwrap();
            prop_assert_eq!(parsed.raw(), raw);
        }
    }
}
