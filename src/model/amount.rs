//! Amount type for handling monetary values read from a loosely-typed store.
//!
//! This module provides the `Amount` type which wraps `Decimal`. The store may hand back amounts
//! as JSON numbers or as strings, and occasionally as garbage. Aggregation must never fail on a bad
//! amount, so the lenient constructor turns anything unparseable into zero.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use tracing::{trace, warn};

/// Represents a monetary amount with full decimal precision.
///
/// Rounding to two decimal places only happens for display:
/// ```
/// # use week_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("10.005").unwrap();
/// assert_eq!(amount.to_string(), "10.01");
/// assert_eq!(amount.value().to_string(), "10.005");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Reads an amount from a JSON value. Numbers and numeric strings are accepted, anything else
    /// (including `null` or a missing value) is zero.
    pub fn from_json_lenient(value: Option<&Value>) -> Self {
        let parsed = match value {
            Some(Value::Number(n)) => number_to_decimal(n),
            Some(Value::String(s)) => Amount::from_str(s).ok().map(|a| a.value),
            _ => None,
        };
        match parsed {
            Some(value) => Self { value },
            None => {
                trace!("Treating unparseable amount {value:?} as zero");
                Self::ZERO
            }
        }
    }

    /// Formats the amount with a currency prefix, e.g. `RM 12.50`.
    pub fn display_with(&self, currency: &str) -> String {
        format!("{currency} {self}")
    }
}

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    // Go through the string form so that 0.1 stays 0.1 rather than its binary approximation.
    let value = Decimal::from_str(&n.to_string())
        .ok()
        .or_else(|| n.as_f64().and_then(Decimal::from_f64));
    if value.is_none() {
        warn!("Amount {n} is outside the supported range, treating it as zero");
    }
    value
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(AmountError)?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self
            .value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}")
    }
}

impl Serialize for Amount {
    /// Amounts go over the wire as JSON numbers.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value.to_f64() {
            Some(f) => serializer.serialize_f64(f),
            None => serializer.serialize_str(&self.value.to_string()),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50"));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  12.5  ").unwrap();
        assert_eq!(amount.value(), dec("12.5"));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::new(dec("50")).to_string(), "50.00");
        assert_eq!(Amount::new(dec("0")).to_string(), "0.00");
        assert_eq!(Amount::new(dec("-200")).to_string(), "-200.00");
        assert_eq!(Amount::new(dec("3.14159")).to_string(), "3.14");
    }

    #[test]
    fn test_display_with_currency() {
        assert_eq!(Amount::new(dec("7.5")).display_with("RM"), "RM 7.50");
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(
            Amount::from_json_lenient(Some(&json!(30))).value(),
            dec("30")
        );
        assert_eq!(
            Amount::from_json_lenient(Some(&json!(0.1))).value(),
            dec("0.1")
        );
    }

    #[test]
    fn test_lenient_string() {
        assert_eq!(
            Amount::from_json_lenient(Some(&json!("12.34"))).value(),
            dec("12.34")
        );
    }

    #[test]
    fn test_lenient_garbage_is_zero() {
        assert!(Amount::from_json_lenient(Some(&json!("twelve"))).is_zero());
        assert!(Amount::from_json_lenient(Some(&json!(null))).is_zero());
        assert!(Amount::from_json_lenient(Some(&json!({"a": 1}))).is_zero());
        assert!(Amount::from_json_lenient(None).is_zero());
    }

    #[test]
    fn test_out_of_range_number_is_zero() {
        assert!(Amount::from_json_lenient(Some(&json!(1e30))).is_zero());
        assert!(Amount::from_json_lenient(Some(&json!(-1e30))).is_zero());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Amount::new(dec("50.5"))).unwrap();
        assert_eq!(json, "50.5");
    }

    #[test]
    fn test_is_negative() {
        assert!(Amount::new(dec("-1")).is_negative());
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::new(dec("1")).is_negative());
    }
}
