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

//! A `UUID4` Universally Unique Identifier (UUID) version 4 (RFC 4122).

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// The length of a hyphenated `UUID4` string value.
pub(crate) const UUID4_LEN: usize = 36;

/// Represents a Universally Unique Identifier (UUID)
/// version 4 based on a 128-bit label as specified in RFC 4122.
#[repr(C)]
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct UUID4 {
    /// The UUID v4 value as fixed-length ASCII bytes.
    pub(crate) value: [u8; UUID4_LEN],
}

impl UUID4 {
    /// Creates a new [`UUID4`] instance.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);

        bytes[6] = (bytes[6] & 0x0F) | 0x40; // Set the version to 4
        bytes[8] = (bytes[8] & 0x3F) | 0x80; // Set the variant to RFC 4122

        Self::from_uuid(Uuid::from_bytes(bytes))
    }

    /// Returns the identifier value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.value).expect("UUID bytes should be valid ASCII")
    }

    fn from_uuid(uuid: Uuid) -> Self {
        let mut value = [0u8; UUID4_LEN];
        uuid.as_hyphenated()
            .encode_lower(&mut value[..]);
        Self { value }
    }
}

impl FromStr for UUID4 {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(value)?;
        Ok(Self::from_uuid(uuid))
    }
}

impl From<&str> for UUID4 {
    /// Creates a [`UUID4`] from a string representation.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid UUID string.
    fn from(value: &str) -> Self {
        value.parse().expect("`value` should be a valid UUID string")
    }
}

impl Default for UUID4 {
    /// Creates a new default [`UUID4`] instance.
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for UUID4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(\"{}\")", stringify!(UUID4), self)
    }
}

impl Display for UUID4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for UUID4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UUID4 {
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
    use uuid::{Uuid, Variant, Version};

    use super::*;

    #[rstest]
    fn test_new_generates_valid_v4() {
        let uuid4 = UUID4::new();
        let parsed = Uuid::parse_str(uuid4.as_str()).unwrap();
        assert_eq!(parsed.get_version(), Some(Version::Random));
        assert_eq!(parsed.get_variant(), Variant::RFC4122);
    }

    #[rstest]
    fn test_uniqueness() {
        let a = UUID4::new();
        let b = UUID4::new();
        assert_ne!(a, b);
    }

    #[rstest]
    fn test_from_str_round_trip() {
        let value = "2d89666b-1a1e-4a75-b193-4eb3b454c757";
        let uuid4 = UUID4::from(value);
        assert_eq!(uuid4.as_str(), value);
        assert_eq!(format!("{uuid4}"), value);
        assert_eq!(format!("{uuid4:?}"), format!("UUID4(\"{value}\")"));
    }

    #[rstest]
    fn test_from_str_invalid() {
        assert!("not-a-uuid".parse::<UUID4>().is_err());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let uuid4 = UUID4::new();
        let json = serde_json::to_string(&uuid4).unwrap();
        let deserialized: UUID4 = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, uuid4);
    }
}
