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

//! Represents a quantity with a non-negative value and fixed decimal precision.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::fixed::{
    PrecisionError, check_fixed_precision, f64_to_fixed_u64, fixed_u64_to_f64,
};

/// The raw u64 quantity type, scaled to the canonical fixed precision.
pub type QuantityRaw = u64;

/// The maximum valid quantity value.
pub const QUANTITY_MAX: f64 = 18_000_000_000.0;

/// Represents a quantity with a non-negative value and fixed decimal precision.
///
/// The raw backing integer is unsigned, so a quantity cannot represent a
/// negative value by construction. Comparison and hashing use the canonical
/// raw integer; arithmetic across differing precisions fails with
/// [`PrecisionError::PrecisionMismatch`].
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Quantity {
    /// The raw quantity value scaled to the canonical fixed precision.
    pub raw: QuantityRaw,
    /// The number of decimal places of the declared precision.
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `value` is not finite, negative, or exceeds [`QUANTITY_MAX`].
    /// - If `precision` exceeds the maximum fixed precision.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        if !value.is_finite() {
            anyhow::bail!("invalid `value`, was not finite: {value}")
        }
        if !(0.0..=QUANTITY_MAX).contains(&value) {
            anyhow::bail!("invalid `value`, was out of range [0.0, {QUANTITY_MAX}]: {value}")
        }
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_u64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Quantity::new_checked`]).
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] from the given raw canonical value.
    #[must_use]
    pub fn from_raw(raw: QuantityRaw, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Creates a zero-valued [`Quantity`] with the given `precision`.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self::from_raw(0, precision)
    }

    /// Returns whether the quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns whether the quantity is positive (> 0).
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the value as an `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_u64_to_f64(self.raw)
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
    ///
    /// # Panics
    ///
    /// Panics if the result would be negative (quantities are unsigned).
    pub fn checked_sub(&self, other: Self) -> Result<Self, PrecisionError> {
        self.check_precision(other)?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .expect("Error subtracting with underflow");
        Ok(Self::from_raw(raw, self.precision))
    }

    /// Returns the smaller of `self` and `other` by canonical value.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.raw <= other.raw { self } else { other }
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

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Add for Quantity {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the precisions differ; use [`Quantity::checked_add`] where the
    /// operand scales are not statically known to match.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect(FAILED)
    }
}

impl Sub for Quantity {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the precisions differ or the result would be negative.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect(FAILED)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<u64> for Quantity {
    /// Creates a whole-number [`Quantity`] with zero precision.
    fn from(value: u64) -> Self {
        Self::new(value as f64, 0)
    }
}

impl FromStr for Quantity {
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

impl From<&str> for Quantity {
    /// Creates a [`Quantity`] from a decimal string, inferring precision.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid decimal string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Quantity),
            self.precision as usize,
            self.as_f64()
        )
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
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
        let qty = Quantity::new(100.0, 0);
        assert_eq!(qty.as_f64(), 100.0);
        assert_eq!(qty.to_string(), "100");
        assert!(qty.is_positive());
        assert!(!qty.is_zero());
    }

    #[rstest]
    fn test_zero() {
        let qty = Quantity::zero(2);
        assert!(qty.is_zero());
        assert!(!qty.is_positive());
    }

    #[rstest]
    fn test_new_checked_rejects_negative() {
        assert!(Quantity::new_checked(-100.0, 0).is_err());
    }

    #[rstest]
    fn test_arithmetic() {
        let mut qty = Quantity::from(100);
        qty += Quantity::from(40);
        assert_eq!(qty, Quantity::from(140));
        qty -= Quantity::from(40);
        assert_eq!(qty, Quantity::from(100));
    }

    #[rstest]
    fn test_precision_mismatch() {
        let a = Quantity::new(1.0, 0);
        let b = Quantity::new(1.0, 1);
        assert_eq!(
            a.checked_add(b),
            Err(PrecisionError::PrecisionMismatch { lhs: 0, rhs: 1 })
        );
    }

    #[rstest]
    #[should_panic(expected = "underflow")]
    fn test_sub_underflow_panics() {
        let _ = Quantity::from(1) - Quantity::from(2);
    }

    #[rstest]
    fn test_min() {
        assert_eq!(
            Quantity::from(10).min(Quantity::from(3)),
            Quantity::from(3)
        );
    }

    #[rstest]
    fn test_serde_round_trip() {
        let qty = Quantity::new(0.561, 3);
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "\"0.561\"");
        let deserialized: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, qty);
        assert_eq!(deserialized.precision, 3);
    }
}
