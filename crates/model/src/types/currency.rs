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

//! Represents a medium of exchange in a specified denomination.

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
    sync::OnceLock,
};

use meridian_core::correctness::{FAILED, check_valid_string};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

/// Represents a medium of exchange in a specified denomination with a fixed
/// decimal precision.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Currency {
    /// The currency code (ISO 4217 or crypto ticker).
    pub code: Ustr,
    /// The currency decimal precision.
    pub precision: u8,
}

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` is not a valid string.
    pub fn new_checked<T: AsRef<str>>(code: T, precision: u8) -> anyhow::Result<Self> {
        let code = code.as_ref();
        check_valid_string(code, stringify!(code))?;
        Ok(Self {
            code: Ustr::from(code),
            precision,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `code` is not a valid string.
    pub fn new<T: AsRef<str>>(code: T, precision: u8) -> Self {
        Self::new_checked(code, precision).expect(FAILED)
    }

    /// Returns the registered currency for the given `code`, if known.
    #[must_use]
    pub fn try_from_str(code: &str) -> Option<Self> {
        currency_map().iter().find(|c| c.code == code).copied()
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn AUD() -> Self {
        Self::new("AUD", 2)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn EUR() -> Self {
        Self::new("EUR", 2)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USD() -> Self {
        Self::new("USD", 2)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn BTC() -> Self {
        Self::new("BTC", 8)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn ETH() -> Self {
        Self::new("ETH", 8)
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDT() -> Self {
        Self::new("USDT", 8)
    }
}

fn currency_map() -> &'static [Currency; 6] {
    static CURRENCIES: OnceLock<[Currency; 6]> = OnceLock::new();
    CURRENCIES.get_or_init(|| {
        [
            Currency::AUD(),
            Currency::EUR(),
            Currency::USD(),
            Currency::BTC(),
            Currency::ETH(),
            Currency::USDT(),
        ]
    })
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown currency code: '{s}'"))
    }
}

impl From<&str> for Currency {
    /// Creates a [`Currency`] from a registered code.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a registered currency code.
    fn from(value: &str) -> Self {
        value.parse().expect(FAILED)
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code={}, precision={})",
            stringify!(Currency),
            self.code,
            self.precision
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code: String = Deserialize::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
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
    fn test_registered_currencies() {
        assert_eq!(Currency::USD().precision, 2);
        assert_eq!(Currency::USDT().precision, 8);
        assert_eq!(Currency::from("BTC"), Currency::BTC());
    }

    #[rstest]
    fn test_unknown_code() {
        assert!(Currency::try_from_str("DOGE").is_none());
        assert!("DOGE".parse::<Currency>().is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let currency = Currency::USDT();
        let json = serde_json::to_string(&currency).unwrap();
        assert_eq!(json, "\"USDT\"");
        let deserialized: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, currency);
    }
}
