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

//! Represents a valid instrument ID: a symbol scoped to the venue it trades on.

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identifiers::{Symbol, Venue};

/// Represents a valid instrument ID.
///
/// The symbol and venue combination should uniquely identify the instrument,
/// rendered as `"{symbol}.{venue}"`.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstrumentId {
    /// The instrument ticker symbol.
    pub symbol: Symbol,
    /// The instrument trading venue.
    pub venue: Venue,
}

impl InstrumentId {
    /// Creates a new [`InstrumentId`] instance.
    #[must_use]
    pub fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }
}

impl FromStr for InstrumentId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((symbol_part, venue_part)) => Ok(Self {
                symbol: Symbol::new_checked(symbol_part)?,
                venue: Venue::new_checked(venue_part)?,
            }),
            None => anyhow::bail!(
                "Error parsing `InstrumentId` from '{s}', missing '.' separator between symbol and venue components"
            ),
        }
    }
}

impl From<&str> for InstrumentId {
    /// Creates an [`InstrumentId`] from a `"{symbol}.{venue}"` string.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid instrument ID string.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}.{}\"", self.symbol, self.venue)
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

impl Serialize for InstrumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&value_str).map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::identifiers::stubs::*;

    #[rstest]
    fn test_string_reprs(instrument_id_eth_perp: InstrumentId) {
        assert_eq!(format!("{instrument_id_eth_perp}"), "ETH-PERP.DERIBIT");
        assert_eq!(format!("{instrument_id_eth_perp:?}"), "\"ETH-PERP.DERIBIT\"");
    }

    #[rstest]
    fn test_parse_hyphenated_symbol() {
        let instrument_id = InstrumentId::from("ETH-PERP.DERIBIT");
        assert_eq!(instrument_id.symbol, Symbol::from("ETH-PERP"));
        assert_eq!(instrument_id.venue, Venue::from("DERIBIT"));
    }

    #[rstest]
    fn test_parse_missing_separator() {
        let result = InstrumentId::from_str("ETHPERP");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("missing '.' separator"));
    }

    #[rstest]
    fn test_serde_round_trip(instrument_id_eth_perp: InstrumentId) {
        let json = serde_json::to_string(&instrument_id_eth_perp).unwrap();
        assert_eq!(json, "\"ETH-PERP.DERIBIT\"");
        let deserialized: InstrumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, instrument_id_eth_perp);
    }
}
