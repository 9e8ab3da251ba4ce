use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine};

/// Money amount represented as integer **minor units** of its currency.
///
/// Use this type for **all** monetary values in the engine (balances,
/// transfer amounts, pools, goals) to avoid floating-point drift. Decimal
/// arithmetic that cannot stay in integers (exchange rates) goes through
/// [`rust_decimal::Decimal`] and is truncated back into minor units.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::parse_positive("5000.00", Currency::Kes).unwrap();
/// assert_eq!(amount.minor(), 500_000);
/// assert_eq!(amount.to_string(), "5000.00 KES");
///
/// assert!(Money::parse_positive("0.000000001", Currency::Btc).is_err());
/// assert!(Money::parse_positive("-10", Currency::Kes).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    #[must_use]
    pub const fn currency(self) -> Currency {
        self.currency
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.minor > 0
    }

    /// Parses a decimal string in the currency's precision.
    ///
    /// Validation rules:
    /// - rejects empty and non-numeric strings
    /// - rejects more fractional digits than the currency supports
    /// - rejects values that do not fit into `i64` minor units
    pub fn parse(input: &str, currency: Currency) -> ResultEngine<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let value = Decimal::from_str(trimmed)
            .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {trimmed}")))?
            .normalize();
        if value.scale() > currency.minor_units() {
            return Err(EngineError::InvalidAmount(format!(
                "too many decimals for {currency}: max {}",
                currency.minor_units()
            )));
        }

        Ok(Self {
            minor: to_minor(value, currency)?,
            currency,
        })
    }

    /// Parses an amount that must be strictly positive (transfers, pools).
    pub fn parse_positive(input: &str, currency: Currency) -> ResultEngine<Self> {
        let money = Self::parse(input, currency)?;
        if !money.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(money)
    }

    /// The amount as a decimal in major units (e.g. `14500.00`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.minor, self.currency.minor_units())
    }

    /// The amount formatted without the currency code, with every fraction
    /// digit of the currency (`"0.00250000"` for BTC).
    #[must_use]
    pub fn amount_string(self) -> String {
        self.to_decimal().to_string()
    }

    /// Converts into `target` at `rate`, truncating toward zero to the
    /// target precision.
    pub fn convert(self, rate: Decimal, target: Currency) -> ResultEngine<Self> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("rate must be > 0".to_string()));
        }
        let converted = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or_else(|| EngineError::InvalidAmount("converted amount too large".to_string()))?
            .round_dp_with_strategy(target.minor_units(), RoundingStrategy::ToZero);

        Ok(Self {
            minor: to_minor(converted, target)?,
            currency: target,
        })
    }

    /// Checked addition (returns `None` on overflow or currency mismatch).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        if self.currency != rhs.currency {
            return None;
        }
        self.minor
            .checked_add(rhs.minor)
            .map(|minor| Money::new(minor, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount_string(), self.currency)
    }
}

/// Parses an exchange rate; it must be a strictly positive decimal.
pub fn parse_rate(input: &str) -> ResultEngine<Decimal> {
    let rate = Decimal::from_str(input.trim())
        .map_err(|_| EngineError::InvalidAmount(format!("invalid rate: {}", input.trim())))?;
    if rate <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount("rate must be > 0".to_string()));
    }
    Ok(rate)
}

fn to_minor(value: Decimal, currency: Currency) -> ResultEngine<i64> {
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());
    let scale = Decimal::from(10i64.pow(currency.minor_units()));
    value
        .checked_mul(scale)
        .and_then(|v| v.trunc().to_i64())
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_currency_precision() {
        assert_eq!(Money::new(1_450_000, Currency::Kes).to_string(), "14500.00 KES");
        assert_eq!(Money::new(250_000, Currency::Btc).to_string(), "0.00250000 BTC");
        assert_eq!(Money::new(5, Currency::Credits).to_string(), "0.05 CREDITS");
    }

    #[test]
    fn parse_accepts_fewer_decimals_than_precision() {
        assert_eq!(Money::parse("10", Currency::Kes).unwrap().minor(), 1000);
        assert_eq!(Money::parse("10.5", Currency::Kes).unwrap().minor(), 1050);
        assert_eq!(Money::parse(" 0.001 ", Currency::Btc).unwrap().minor(), 100_000);
        assert_eq!(Money::parse("12.3400", Currency::Kes).unwrap().minor(), 1234);
    }

    #[test]
    fn parse_rejects_garbage_and_excess_precision() {
        assert!(Money::parse("abc", Currency::Kes).is_err());
        assert!(Money::parse("", Currency::Kes).is_err());
        assert!(Money::parse("12.345", Currency::Kes).is_err());
        assert!(Money::parse("99999999999999999999", Currency::Kes).is_err());
    }

    #[test]
    fn parse_positive_rejects_zero_and_negative() {
        assert_eq!(
            Money::parse_positive("-10", Currency::Kes),
            Err(EngineError::InvalidAmount("amount must be > 0".to_string()))
        );
        assert!(Money::parse_positive("0.00", Currency::Kes).is_err());
    }

    #[test]
    fn convert_truncates_to_target_precision() {
        let kes = Money::new(100_000, Currency::Kes); // 1000.00
        let rate = parse_rate("0.0077").unwrap();
        let usd = kes.convert(rate, Currency::Usd).unwrap();
        assert_eq!(usd, Money::new(770, Currency::Usd));

        let tiny = Money::new(1, Currency::Kes);
        let usd = tiny.convert(rate, Currency::Usd).unwrap();
        assert_eq!(usd.minor(), 0);
    }

    #[test]
    fn rate_must_be_positive() {
        assert!(parse_rate("0").is_err());
        assert!(parse_rate("-1.5").is_err());
        assert!(parse_rate("x").is_err());
        assert_eq!(parse_rate("129.5").unwrap(), Decimal::new(1295, 1));
    }
}
