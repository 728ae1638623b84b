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

//! Represents a price in a market, with a specified fixed decimal precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, Sub},
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::fixed::{
    PrecisionError, check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64,
};

/// The raw i64 price type, scaled to the canonical fixed precision.
pub type PriceRaw = i64;

/// The maximum valid price value.
pub const PRICE_MAX: f64 = 9_000_000_000.0;

/// Represents a price in a market, with a specified fixed decimal precision.
///
/// Prices compare and hash by their canonical raw integer representation, so
/// values of differing declared precisions remain directly comparable.
/// Arithmetic across differing precisions fails with
/// [`PrecisionError::PrecisionMismatch`].
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Price {
    /// The raw price value scaled to the canonical fixed precision.
    pub raw: PriceRaw,
    /// The number of decimal places of the declared precision.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `value` is not finite, negative, or exceeds [`PRICE_MAX`].
    /// - If `precision` exceeds the maximum fixed precision.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        if !value.is_finite() {
            anyhow::bail!("invalid `value`, was not finite: {value}")
        }
        if !(0.0..=PRICE_MAX).contains(&value) {
            anyhow::bail!("invalid `value`, was out of range [0.0, {PRICE_MAX}]: {value}")
        }
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Price::new_checked`]).
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] from the given raw canonical value.
    #[must_use]
    pub fn from_raw(raw: PriceRaw, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Creates a zero-valued [`Price`] with the given `precision`.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self::new(0.0, precision)
    }

    /// Returns whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the value as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the result of adding `other`, checking precisions match.
    ///
    /// # Errors
    ///
    /// Returns [`PrecisionError::PrecisionMismatch`] if precisions differ.
    pub fn checked_add(&self, other: Self) -> Result<Self, PrecisionError> {
        self.check_precision(other)?;
        Ok(Self::from_raw(self.raw + other.raw, self.precision))
    }

    /// Returns the result of subtracting `other`, checking precisions match.
    ///
    /// # Errors
    ///
    /// Returns [`PrecisionError::PrecisionMismatch`] if precisions differ.
    pub fn checked_sub(&self, other: Self) -> Result<Self, PrecisionError> {
        self.check_precision(other)?;
        Ok(Self::from_raw(self.raw - other.raw, self.precision))
    }

    fn check_precision(&self, other: Self) -> Result<(), PrecisionError> {
        if self.precision != other.precision {
            return Err(PrecisionError::PrecisionMismatch {
                lhs: self.precision,
                rhs: other.precision,
            });
        }
        Ok(())
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Add for Price {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the precisions differ; use [`Price::checked_add`] where the
    /// operand scales are not statically known to match.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect(FAILED)
    }
}

impl Sub for Price {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the precisions differ; use [`Price::checked_sub`] where the
    /// operand scales are not statically known to match.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect(FAILED)
    }
}

impl FromStr for Price {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let float_from_input = value
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("Error parsing `input` string '{value}' as f64: {e}"))?;
        let precision = value.split('.').next_back().filter(|_| value.contains('.'));
        Self::new_checked(
            float_from_input,
            precision.map_or(0, |decimals| decimals.len() as u8),
        )
    }
}

impl From<&str> for Price {
    /// Creates a [`Price`] from a decimal string, inferring precision.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid decimal string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Price),
            self.precision as usize,
            self.as_f64()
        )
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
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
        let price = Price::new(10.25, 2);
        assert_eq!(price.precision, 2);
        assert_eq!(price.as_f64(), 10.25);
        assert_eq!(price.to_string(), "10.25");
        assert!(!price.is_zero());
    }

    #[rstest]
    fn test_new_checked_rejects_negative() {
        assert!(Price::new_checked(-1.0, 2).is_err());
    }

    #[rstest]
    fn test_new_checked_rejects_non_finite() {
        assert!(Price::new_checked(f64::NAN, 2).is_err());
        assert!(Price::new_checked(f64::INFINITY, 2).is_err());
    }

    #[rstest]
    fn test_equality_across_precisions() {
        // Canonical raw representation makes 10.0 and 10.00 equal
        assert_eq!(Price::new(10.0, 1), Price::new(10.00, 2));
        assert!(Price::new(10.0, 1) < Price::new(10.01, 2));
    }

    #[rstest]
    fn test_checked_arithmetic_equal_precision() {
        let a = Price::new(10.50, 2);
        let b = Price::new(0.25, 2);
        assert_eq!(a.checked_add(b).unwrap(), Price::new(10.75, 2));
        assert_eq!(a.checked_sub(b).unwrap(), Price::new(10.25, 2));
    }

    #[rstest]
    fn test_checked_arithmetic_precision_mismatch() {
        let a = Price::new(10.50, 2);
        let b = Price::new(0.250, 3);
        assert_eq!(
            a.checked_add(b),
            Err(PrecisionError::PrecisionMismatch { lhs: 2, rhs: 3 })
        );
    }

    #[rstest]
    #[case("10.00", 2, 10.0)]
    #[case("1.5", 1, 1.5)]
    #[case("100", 0, 100.0)]
    #[case("0.000000001", 9, 1e-9)]
    fn test_from_str(#[case] input: &str, #[case] precision: u8, #[case] value: f64) {
        let price = Price::from(input);
        assert_eq!(price.precision, precision);
        assert_eq!(price.as_f64(), value);
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::new(1234.56, 2);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1234.56\"");
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, price);
        assert_eq!(deserialized.precision, 2);
    }
}
