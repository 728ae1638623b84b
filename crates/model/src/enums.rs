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

//! Enumerations for the trading domain model.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

/// Implements `Serialize`/`Deserialize` in terms of the strum string
/// representation for an enum.
macro_rules! enum_strum_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value: String = Deserialize::deserialize(deserializer)?;
                Self::from_str(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// An account type provided by a trading venue or broker.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// An account with unleveraged cash assets only.
    Cash = 1,
    /// An account which facilitates trading on margin, using account assets as collateral.
    Margin = 2,
}

/// The liquidity side for a specific execution.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySide {
    /// No liquidity side specified.
    NoLiquiditySide = 0,
    /// The order passively provided liquidity to the market (made a market).
    Maker = 1,
    /// The order aggressively took liquidity from the market.
    Taker = 2,
}

/// The order side for a specific order, or action related to orders.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// No order side is specified.
    #[default]
    NoOrderSide = 0,
    /// The order is a BUY.
    Buy = 1,
    /// The order is a SELL.
    Sell = 2,
}

impl OrderSide {
    /// Returns the specified [`OrderSideSpecified`] (BUY or SELL) for this side.
    ///
    /// # Panics
    ///
    /// Panics if `self` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn as_specified(&self) -> OrderSideSpecified {
        match &self {
            Self::Buy => OrderSideSpecified::Buy,
            Self::Sell => OrderSideSpecified::Sell,
            _ => panic!("Order invariant failed: side must be `Buy` or `Sell`"),
        }
    }
}

/// The specified order side (BUY or SELL).
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(clippy::enum_variant_names)]
pub enum OrderSideSpecified {
    /// The order is a BUY.
    Buy = 1,
    /// The order is a SELL.
    Sell = 2,
}

impl OrderSideSpecified {
    /// Returns the opposite order side.
    #[must_use]
    pub fn opposite(&self) -> Self {
        match &self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Converts this specified side into an [`OrderSide`].
    #[must_use]
    pub fn as_order_side(&self) -> OrderSide {
        match &self {
            Self::Buy => OrderSide::Buy,
            Self::Sell => OrderSide::Sell,
        }
    }
}

/// The status for a specific order.
///
/// An order is considered _working_ (non-terminal) for the following status:
///  - `INITIALIZED`
///  - `SUBMITTED`
///  - `ACCEPTED`
///  - `WORKING`
///  - `PARTIALLY_FILLED`
///
/// An order is considered _closed_ (terminal) for the following status:
///  - `DENIED`
///  - `REJECTED`
///  - `CANCELED`
///  - `EXPIRED`
///  - `FILLED`
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The order is initialized (instantiated) within the system.
    Initialized = 1,
    /// The order was denied by the system, either for being invalid, unprocessable or exceeding a risk limit.
    Denied = 2,
    /// The order was submitted to the trading venue (awaiting acknowledgement).
    Submitted = 3,
    /// The order was acknowledged by the trading venue as being received and valid.
    Accepted = 4,
    /// The order is resting on the venue order book, available for execution.
    Working = 5,
    /// The order has been partially filled on the trading venue.
    PartiallyFilled = 6,
    /// The order has been completely filled on the trading venue (closed/done).
    Filled = 7,
    /// The order was canceled (closed/done).
    Canceled = 8,
    /// The order reached its time-in-force expiration (closed/done).
    Expired = 9,
    /// The order was rejected by the trading venue.
    Rejected = 10,
}

impl OrderStatus {
    /// Returns whether the status is terminal (no further transitions are legal).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Denied | Self::Rejected | Self::Canceled | Self::Expired | Self::Filled
        )
    }
}

/// The type of order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// A market order to buy or sell at the best available price in the current market.
    Market = 1,
    /// A limit order to buy or sell at a specific price or better.
    Limit = 2,
}

/// The market side for a specific position, or action related to positions.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// No position in the market (quantity is zero).
    #[default]
    Flat = 1,
    /// A long position in the market (a positive net quantity of buys).
    Long = 2,
    /// A short position in the market (a negative net quantity of buys).
    Short = 3,
}

/// The time in force for a specific order.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    AsRefStr,
    FromRepr,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good Till Canceled (GTC): the order remains active until canceled.
    Gtc = 1,
    /// Immediate Or Cancel (IOC): the order executes immediately, any unfilled portion is canceled.
    Ioc = 2,
    /// Fill Or Kill (FOK): the order executes in full immediately, or is canceled entirely.
    Fok = 3,
    /// Day: the order remains active until the end of the trading session.
    Day = 4,
}

impl TimeInForce {
    /// Returns whether this time in force is valid for market orders.
    ///
    /// Market orders must have a time in force drawn from GTC, IOC or FOK.
    #[must_use]
    pub fn is_valid_for_market_order(&self) -> bool {
        matches!(self, Self::Gtc | Self::Ioc | Self::Fok)
    }
}

enum_strum_serde!(AccountType);
enum_strum_serde!(LiquiditySide);
enum_strum_serde!(OrderSide);
enum_strum_serde!(OrderSideSpecified);
enum_strum_serde!(OrderStatus);
enum_strum_serde!(OrderType);
enum_strum_serde!(PositionSide);
enum_strum_serde!(TimeInForce);

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_order_side_specified() {
        assert_eq!(OrderSide::Buy.as_specified(), OrderSideSpecified::Buy);
        assert_eq!(OrderSideSpecified::Buy.opposite(), OrderSideSpecified::Sell);
        assert_eq!(OrderSideSpecified::Sell.as_order_side(), OrderSide::Sell);
    }

    #[rstest]
    #[should_panic(expected = "side must be")]
    fn test_no_order_side_as_specified_panics() {
        let _ = OrderSide::NoOrderSide.as_specified();
    }

    #[rstest]
    #[case(OrderStatus::Initialized, false)]
    #[case(OrderStatus::Submitted, false)]
    #[case(OrderStatus::Accepted, false)]
    #[case(OrderStatus::Working, false)]
    #[case(OrderStatus::PartiallyFilled, false)]
    #[case(OrderStatus::Denied, true)]
    #[case(OrderStatus::Rejected, true)]
    #[case(OrderStatus::Canceled, true)]
    #[case(OrderStatus::Expired, true)]
    #[case(OrderStatus::Filled, true)]
    fn test_order_status_is_terminal(#[case] status: OrderStatus, #[case] expected: bool) {
        assert_eq!(status.is_terminal(), expected);
    }

    #[rstest]
    #[case(TimeInForce::Gtc, true)]
    #[case(TimeInForce::Ioc, true)]
    #[case(TimeInForce::Fok, true)]
    #[case(TimeInForce::Day, false)]
    fn test_time_in_force_valid_for_market(#[case] tif: TimeInForce, #[case] expected: bool) {
        assert_eq!(tif.is_valid_for_market_order(), expected);
    }

    #[rstest]
    fn test_strum_serde_round_trip() {
        let json = serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap();
        assert_eq!(json, "\"PARTIALLY_FILLED\"");
        let status: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, OrderStatus::PartiallyFilled);

        let side: OrderSide = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(side, OrderSide::Buy);
    }
}
