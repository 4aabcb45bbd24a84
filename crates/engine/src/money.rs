use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer cents** of the base
/// currency (ZAR).
///
/// Every stored amount (expenses, goal thresholds, deadlines) uses this type;
/// exchange rates are applied only when rendering, see
/// [`ExchangeRates`](crate::ExchangeRates).
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest amount accepted on a single entry, goal or deadline
    /// (one billion in major units).
    pub const MAX_ENTRY: MoneyCents = MoneyCents(100_000_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Sums `amounts`, failing with `InvalidAmount` on overflow.
    pub fn checked_sum<I>(amounts: I) -> ResultEngine<MoneyCents>
    where
        I: IntoIterator<Item = MoneyCents>,
    {
        amounts
            .into_iter()
            .try_fold(MoneyCents::ZERO, MoneyCents::checked_add)
            .ok_or_else(|| EngineError::InvalidAmount("total out of range".to_string()))
    }

    /// Multiplies by an exchange rate, rounding half away from zero to the
    /// nearest cent.
    #[must_use]
    pub fn scale(self, rate: f64) -> Self {
        Self((self.0 as f64 * rate).round() as i64)
    }

    /// Ratio `self / of` as a float, `0.0` when `of` is zero.
    #[must_use]
    pub fn ratio(self, of: MoneyCents) -> f64 {
        if of.0 == 0 {
            return 0.0;
        }
        self.0 as f64 / of.0 as f64
    }

    /// Formats the magnitude with thousands separators, e.g. `1,234.50`.
    ///
    /// The sign is left to the caller so it can be placed before a currency
    /// symbol.
    #[must_use]
    pub fn grouped_abs(self) -> String {
        let abs = self.0.unsigned_abs();
        let major = (abs / 100).to_string();
        let minor = abs % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (idx, ch) in major.chars().enumerate() {
            if idx > 0 && (major.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{grouped}.{minor:02}")
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// At most 2 fractional digits are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidAmount(reason.to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (major, minor) = match rest.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (rest.as_str(), ""),
        };
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if major.is_empty() || !digits_only(major) || !digits_only(minor) {
            return Err(invalid("invalid amount"));
        }
        if minor.len() > 2 {
            return Err(invalid("too many decimals"));
        }

        let major: i64 = major.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("invalid amount"))? * 10,
            _ => minor.parse().map_err(|_| invalid("invalid amount"))?,
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(MoneyCents(if negative { -total } else { total }))
    }
}
