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

//! Functions for correctness checks similar to the *design by contract* philosophy.
//!
//! A condition is a predicate which must be true just prior to the execution of
//! some section of code. An [`anyhow::Result`] is returned with a descriptive
//! message when the condition check fails.

use std::fmt::{Debug, Display};

/// A message prefix that can be used with calls to `expect` or other assertion-related functions.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the `predicate` is false.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_predicate_false(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the string `s` has semantic meaning and contains only ASCII characters.
///
/// # Errors
///
/// This function returns an error:
/// - If `s` is an empty string.
/// - If `s` consists solely of whitespace characters.
/// - If `s` contains one or more non-ASCII or control characters.
#[inline(always)]
pub fn check_valid_string<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    let s = s.as_ref();

    if s.is_empty() {
        anyhow::bail!("invalid string for '{param}', was empty");
    }

    // Ensure string is only traversed once
    let mut has_non_whitespace = false;
    for c in s.chars() {
        if !c.is_whitespace() {
            has_non_whitespace = true;
        }
        if !c.is_ascii() || c.is_ascii_control() {
            anyhow::bail!("invalid string for '{param}' contained an invalid char, was '{s}'");
        }
    }

    if !has_non_whitespace {
        anyhow::bail!("invalid string for '{param}', was all whitespace");
    }

    Ok(())
}

/// Checks the string `s` contains the pattern `pat`.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_string_contains<T: AsRef<str>>(s: T, pat: &str, param: &str) -> anyhow::Result<()> {
    let s = s.as_ref();
    if !s.contains(pat) {
        anyhow::bail!("invalid string for '{param}' did not contain '{pat}', was '{s}'")
    }
    Ok(())
}

/// Checks the `u8` values are equal.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_equal_u8(lhs: u8, rhs: u8, lhs_param: &str, rhs_param: &str) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!(
            "'{lhs_param}' u8 of {lhs} was not equal to '{rhs_param}' u8 of {rhs}"
        )
    }
    Ok(())
}

/// Checks the `value` is positive (> 0).
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_positive_u64(value: u64, param: &str) -> anyhow::Result<()> {
    if value == 0 {
        anyhow::bail!("invalid u64 for '{param}' not positive, was {value}")
    }
    Ok(())
}

/// Checks the `value` is non-negative (>= 0).
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_non_negative_i64(value: i64, param: &str) -> anyhow::Result<()> {
    if value < 0 {
        anyhow::bail!("invalid i64 for '{param}' negative, was {value}")
    }
    Ok(())
}

/// Checks the `key` is **not** in the `map`.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_key_not_in_map<K, V, S>(
    key: &K,
    map: &std::collections::HashMap<K, V, S>,
    key_name: &str,
    map_name: &str,
) -> anyhow::Result<()>
where
    K: std::hash::Hash + Eq + Display + Debug,
    S: std::hash::BuildHasher,
{
    if map.contains_key(key) {
        anyhow::bail!("the '{key_name}' {key} was already in the '{map_name}' map")
    }
    Ok(())
}

/// Checks the `key` is in the `map`.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_key_in_map<K, V, S>(
    key: &K,
    map: &std::collections::HashMap<K, V, S>,
    key_name: &str,
    map_name: &str,
) -> anyhow::Result<()>
where
    K: std::hash::Hash + Eq + Display + Debug,
    S: std::hash::BuildHasher,
{
    if !map.contains_key(key) {
        anyhow::bail!("the '{key_name}' {key} was not in the '{map_name}' map")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_check_predicate_true(#[case] predicate: bool, #[case] expected: bool) {
        assert_eq!(check_predicate_true(predicate, "fail").is_ok(), expected);
    }

    #[rstest]
    #[case("ABC-123", true)]
    #[case("with space ok", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("abc\u{0001}", false)]
    #[case("abc\u{00e9}", false)] // non-ASCII
    fn test_check_valid_string(#[case] s: &str, #[case] expected: bool) {
        assert_eq!(check_valid_string(s, "value").is_ok(), expected);
    }

    #[rstest]
    fn test_check_string_contains() {
        assert!(check_string_contains("TRADER-001", "-", "value").is_ok());
        assert!(check_string_contains("TRADER001", "-", "value").is_err());
    }

    #[rstest]
    fn test_check_equal_u8() {
        assert!(check_equal_u8(2, 2, "left", "right").is_ok());
        assert!(check_equal_u8(2, 3, "left", "right").is_err());
    }

    #[rstest]
    fn test_check_positive_u64() {
        assert!(check_positive_u64(1, "qty").is_ok());
        assert!(check_positive_u64(0, "qty").is_err());
    }

    #[rstest]
    fn test_check_non_negative_i64() {
        assert!(check_non_negative_i64(0, "px").is_ok());
        assert!(check_non_negative_i64(-1, "px").is_err());
    }

    #[rstest]
    fn test_check_key_in_map() {
        let mut map = HashMap::new();
        map.insert("a", 1);
        assert!(check_key_in_map(&"a", &map, "key", "map").is_ok());
        assert!(check_key_in_map(&"b", &map, "key", "map").is_err());
        assert!(check_key_not_in_map(&"b", &map, "key", "map").is_ok());
        assert!(check_key_not_in_map(&"a", &map, "key", "map").is_err());
    }
}
