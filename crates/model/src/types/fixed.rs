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

//! Fixed-point arithmetic with a canonical 9-decimal integer representation.
//!
//! Raw values are scaled to [`FIXED_PRECISION`] decimals regardless of the
//! declared precision of the owning type, so values of differing precisions
//! remain directly comparable by their raw integers.

use thiserror::Error;

/// The maximum fixed-point precision.
pub const FIXED_PRECISION: u8 = 9;

/// The scalar value corresponding to the maximum precision (10^9).
pub const FIXED_SCALAR: f64 = 1_000_000_000.0;

/// An error when combining values of differing fixed-point scales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PrecisionError {
    /// Arithmetic was attempted across two differing decimal precisions.
    #[error("Precision mismatch: lhs precision {lhs}, rhs precision {rhs}")]
    PrecisionMismatch {
        /// The precision of the left-hand operand.
        lhs: u8,
        /// The precision of the right-hand operand.
        rhs: u8,
    },
}

/// Checks the given fixed-point `precision` is within the valid range.
///
/// # Errors
///
/// Returns an error if `precision` exceeds [`FIXED_PRECISION`].
pub fn check_fixed_precision(precision: u8) -> anyhow::Result<()> {
    if precision > FIXED_PRECISION {
        anyhow::bail!("invalid `precision` greater than max {FIXED_PRECISION}, was {precision}")
    }
    Ok(())
}

/// Converts an `f64` to a raw fixed-point `i64`, rounding to the given `precision`.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_i64(value: f64, precision: u8) -> i64 {
    assert!(precision <= FIXED_PRECISION, "precision exceeded maximum 9");
    let pow1 = 10_i64.pow(u32::from(precision));
    let pow2 = 10_i64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as i64;
    rounded * pow2
}

/// Converts an `f64` to a raw fixed-point `u64`, rounding to the given `precision`.
///
/// # Panics
///
/// Panics if `precision` exceeds [`FIXED_PRECISION`].
#[must_use]
pub fn f64_to_fixed_u64(value: f64, precision: u8) -> u64 {
    assert!(precision <= FIXED_PRECISION, "precision exceeded maximum 9");
    let pow1 = 10_u64.pow(u32::from(precision));
    let pow2 = 10_u64.pow(u32::from(FIXED_PRECISION - precision));
    let rounded = (value * pow1 as f64).round() as u64;
    rounded * pow2
}

/// Converts a raw fixed-point `i64` to an `f64`.
#[must_use]
pub fn fixed_i64_to_f64(value: i64) -> f64 {
    value as f64 / FIXED_SCALAR
}

/// Converts a raw fixed-point `u64` to an `f64`.
#[must_use]
pub fn fixed_u64_to_f64(value: u64) -> f64 {
    value as f64 / FIXED_SCALAR
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0.0)]
    #[case(1, 1.0)]
    #[case(2, 1.1)]
    #[case(9, 0.000_000_001)]
    fn test_f64_to_fixed_i64_round_trip(#[case] precision: u8, #[case] value: f64) {
        let fixed = f64_to_fixed_i64(value, precision);
        assert_eq!(fixed_i64_to_f64(fixed), value);
    }

    #[rstest]
    fn test_rounding_to_precision() {
        assert_eq!(f64_to_fixed_i64(1.2345, 2), 1_230_000_000);
        assert_eq!(f64_to_fixed_i64(1.2355, 2), 1_240_000_000);
        assert_eq!(f64_to_fixed_u64(0.5, 0), 1_000_000_000);
    }

    #[rstest]
    fn test_canonical_scale_is_precision_independent() {
        // 10.00 at precision 2 and 10.0 at precision 1 share the same raw value
        assert_eq!(f64_to_fixed_i64(10.00, 2), f64_to_fixed_i64(10.0, 1));
    }

    #[rstest]
    fn test_check_fixed_precision() {
        assert!(check_fixed_precision(9).is_ok());
        assert!(check_fixed_precision(10).is_err());
    }

    #[rstest]
    #[should_panic(expected = "precision exceeded maximum 9")]
    fn test_invalid_precision_panics() {
        let _ = f64_to_fixed_i64(1.0, 10);
    }
}
