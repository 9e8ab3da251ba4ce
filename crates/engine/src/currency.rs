use serde::{Deserialize, Serialize};

use crate::EngineError;

/// The family a wallet belongs to.
///
/// Every currency maps to exactly one kind, so a wallet's `(kind, currency)`
/// pair is always consistent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Fiat,
    Crypto,
    Credits,
}

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiat => "fiat",
            Self::Crypto => "crypto",
            Self::Credits => "credits",
        }
    }
}

impl core::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WalletKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fiat" => Ok(Self::Fiat),
            "crypto" => Ok(Self::Crypto),
            "credits" => Ok(Self::Credits),
            other => Err(EngineError::InvalidKind(format!(
                "unsupported wallet kind: {other}"
            ))),
        }
    }
}

/// Currency code of a wallet and of every money value stored against it.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see [`Money`](crate::Money)). `minor_units()` returns how many decimal
/// digits separate major from minor units:
///
/// - fiat and in-app credits use 2 (`14500.00 KES` ⇄ `1450000`)
/// - BTC and ETH use 8 (`0.0025 BTC` ⇄ `250000`)
/// - USDT uses 6
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Kes,
    Usd,
    Eur,
    Ngn,
    Ghs,
    Zar,
    Btc,
    Eth,
    Usdt,
    Credits,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Kes => "KES",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Ngn => "NGN",
            Currency::Ghs => "GHS",
            Currency::Zar => "ZAR",
            Currency::Btc => "BTC",
            Currency::Eth => "ETH",
            Currency::Usdt => "USDT",
            Currency::Credits => "CREDITS",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Currency::Btc | Currency::Eth => 8,
            Currency::Usdt => 6,
            _ => 2,
        }
    }

    /// The wallet kind that holds this currency.
    #[must_use]
    pub const fn kind(self) -> WalletKind {
        match self {
            Currency::Btc | Currency::Eth | Currency::Usdt => WalletKind::Crypto,
            Currency::Credits => WalletKind::Credits,
            _ => WalletKind::Fiat,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "KES" => Ok(Currency::Kes),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "NGN" => Ok(Currency::Ngn),
            "GHS" => Ok(Currency::Ghs),
            "ZAR" => Ok(Currency::Zar),
            "BTC" => Ok(Currency::Btc),
            "ETH" => Ok(Currency::Eth),
            "USDT" => Ok(Currency::Usdt),
            "CREDITS" => Ok(Currency::Credits),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("kes").unwrap(), Currency::Kes);
        assert_eq!(Currency::try_from(" Btc ").unwrap(), Currency::Btc);
        assert_eq!(Currency::try_from("CREDITS").unwrap(), Currency::Credits);
        assert!(Currency::try_from("DOGE").is_err());
    }

    #[test]
    fn kinds_follow_currency_family() {
        assert_eq!(Currency::Kes.kind(), WalletKind::Fiat);
        assert_eq!(Currency::Usdt.kind(), WalletKind::Crypto);
        assert_eq!(Currency::Credits.kind(), WalletKind::Credits);
    }

    #[test]
    fn crypto_uses_eight_decimals() {
        assert_eq!(Currency::Btc.minor_units(), 8);
        assert_eq!(Currency::Kes.minor_units(), 2);
    }
}
