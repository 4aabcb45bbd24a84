use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Display currencies supported by Cashify.
///
/// All amounts are stored in [`Currency::Zar`] minor units. Other currencies
/// only exist at render time, through [`ExchangeRates`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Zar,
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Zar,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Zar => "ZAR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Zar => "R",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(EngineError::UnsupportedCurrency(code))
    }
}

/// Multipliers from the base currency (ZAR) to each display currency.
///
/// The base rate is pinned to `1.0`: a provider can never rescale stored
/// amounts, it can only add or update the other currencies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: HashMap<Currency, f64>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            rates: HashMap::from([(Currency::Zar, 1.0)]),
        }
    }
}

impl ExchangeRates {
    /// Builds a table from provider codes. Unknown codes and non-finite or
    /// non-positive rates are skipped.
    pub fn from_codes<'a, I>(rates: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::default();
        for (code, rate) in rates {
            let Ok(currency) = Currency::try_from(code) else {
                continue;
            };
            table.set(currency, rate);
        }
        table
    }

    /// Sets the rate for a currency. The base currency is left untouched.
    pub fn set(&mut self, currency: Currency, rate: f64) {
        if currency == Currency::Zar || !rate.is_finite() || rate <= 0.0 {
            return;
        }
        self.rates.insert(currency, rate);
    }

    #[must_use]
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    /// Known rates, ordered by currency.
    #[must_use]
    pub fn entries(&self) -> Vec<(Currency, f64)> {
        let mut entries: Vec<_> = self.rates.iter().map(|(c, r)| (*c, *r)).collect();
        entries.sort_by_key(|(c, _)| *c);
        entries
    }

    /// Currency amounts are shown in when `requested` is asked for: the
    /// requested one if its rate is known, ZAR otherwise.
    #[must_use]
    pub fn display_currency(&self, requested: Currency) -> Currency {
        if self.rates.contains_key(&requested) {
            requested
        } else {
            Currency::Zar
        }
    }

    /// Converts a base amount for display.
    ///
    /// When no rate is known for `currency` the amount is shown in ZAR rather
    /// than under a foreign symbol.
    #[must_use]
    pub fn convert(&self, amount: MoneyCents, currency: Currency) -> DisplayAmount {
        match self.rate(currency) {
            Some(rate) => DisplayAmount {
                currency,
                amount: amount.scale(rate),
            },
            None => DisplayAmount {
                currency: Currency::Zar,
                amount,
            },
        }
    }
}

/// An amount already converted to its display currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAmount {
    pub currency: Currency,
    pub amount: MoneyCents,
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}{}",
            self.currency.symbol(),
            self.amount.grouped_abs()
        )
    }
}
