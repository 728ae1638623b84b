// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2019-2025 Meridian Systems Pty Ltd. All rights reserved.
//  https://meridian.systems
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Represents an amount of money in a specified currency denomination.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{
    currency::Currency,
    fixed::{f64_to_fixed_i64, fixed_i64_to_f64},
};

/// The raw i64 money type, scaled to the canonical fixed precision.
pub type MoneyRaw = i64;

/// The maximum valid money amount.
pub const MONEY_MAX: f64 = 9_000_000_000.0;

/// Represents an amount of money in a specified currency denomination.
///
/// Arithmetic requires matching currencies; amounts may be negative
/// (e.g. realized losses).
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Money {
    /// The raw monetary amount scaled to the canonical fixed precision.
    pub raw: MoneyRaw,
    /// The currency denomination.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is not finite or exceeds the valid range.
    pub fn new_checked(amount: f64, currency: Currency) -> anyhow::Result<Self> {
        if !amount.is_finite() {
            anyhow::bail!("invalid `amount`, was not finite: {amount}")
        }
        if !(-MONEY_MAX..=MONEY_MAX).contains(&amount) {
            anyhow::bail!("invalid `amount`, was out of range [-{MONEY_MAX}, {MONEY_MAX}]: {amount}")
        }
        Ok(Self {
            raw: f64_to_fixed_i64(amount, currency.precision),
            currency,
        })
    }

    /// Creates a new [`Money`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Money::new_checked`]).
    #[must_use]
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self::new_checked(amount, currency).expect(FAILED)
    }

    /// Creates a new [`Money`] from the given raw canonical value.
    #[must_use]
    pub fn from_raw(raw: MoneyRaw, currency: Currency) -> Self {
        Self { raw, currency }
    }

    /// Creates a zero-valued [`Money`] in the given `currency`.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::from_raw(0, currency)
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the amount as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    fn check_currency(&self, other: &Self) {
        assert_eq!(
            self.currency, other.currency,
            "Money arithmetic requires matching currencies"
        );
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.raw == other.raw
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.check_currency(other);
        Some(self.raw.cmp(&other.raw))
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.currency.hash(state);
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::from_raw(-self.raw, self.currency)
    }
}

impl Add for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the currencies differ.
    fn add(self, rhs: Self) -> Self::Output {
        self.check_currency(&rhs);
        Self::from_raw(self.raw + rhs.raw, self.currency)
    }
}

impl Sub for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the currencies differ.
    fn sub(self, rhs: Self) -> Self::Output {
        self.check_currency(&rhs);
        Self::from_raw(self.raw - rhs.raw, self.currency)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl FromStr for Money {
    type Err = anyhow::Error;

    /// Parses a [`Money`] from an `"{amount} {code}"` string.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (amount_part, code_part) = value.split_once(' ').ok_or_else(|| {
            anyhow::anyhow!(
                "Error parsing `Money` from '{value}', expected '{{amount}} {{currency}}' format"
            )
        })?;
        let amount = amount_part
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("Error parsing `amount` from '{amount_part}': {e}"))?;
        let currency = Currency::from_str(code_part)?;
        Self::new_checked(amount, currency)
    }
}

impl From<&str> for Money {
    /// Parses a [`Money`] from an `"{amount} {code}"` string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid money string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*} {})",
            stringify!(Money),
            self.currency.precision as usize,
            self.as_f64(),
            self.currency
        )
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.currency.precision as usize,
            self.as_f64(),
            self.currency
        )
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str: String = Deserialize::deserialize(deserializer)?;
        value_str.parse().map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new() {
        let money = Money::new(100.50, Currency::USD());
        assert_eq!(money.as_f64(), 100.50);
        assert_eq!(money.to_string(), "100.50 USD");
    }

    #[rstest]
    fn test_negative_amounts_allowed() {
        let money = Money::new(-25.0, Currency::USD());
        assert_eq!(money.as_f64(), -25.0);
        assert_eq!(-money, Money::new(25.0, Currency::USD()));
    }

    #[rstest]
    fn test_arithmetic_same_currency() {
        let a = Money::new(100.0, Currency::USD());
        let b = Money::new(50.0, Currency::USD());
        assert_eq!(a + b, Money::new(150.0, Currency::USD()));
        assert_eq!(a - b, Money::new(50.0, Currency::USD()));
    }

    #[rstest]
    #[should_panic(expected = "matching currencies")]
    fn test_arithmetic_currency_mismatch_panics() {
        let _ = Money::new(100.0, Currency::USD()) + Money::new(1.0, Currency::BTC());
    }

    #[rstest]
    fn test_from_str() {
        let money = Money::from("12.20000000 USDT");
        assert_eq!(money.currency, Currency::USDT());
        assert_eq!(money.as_f64(), 12.2);
        assert!("12.20".parse::<Money>().is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let money = Money::new(1525000.00, Currency::USD());
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"1525000.00 USD\"");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, money);
    }
}
