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

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};

use super::OrderEventType;
use crate::{
    events::{
        OrderAccepted, OrderAmended, OrderCanceled, OrderDenied, OrderExpired, OrderFilled,
        OrderInitialized, OrderRejected, OrderSubmitted, OrderWorking,
    },
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId, VenueOrderId},
};

/// Wraps an order event allowing polymorphism over the tagged sum.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OrderEventAny {
    Initialized(OrderInitialized),
    Denied(OrderDenied),
    Submitted(OrderSubmitted),
    Accepted(OrderAccepted),
    Rejected(OrderRejected),
    Working(OrderWorking),
    Amended(OrderAmended),
    Canceled(OrderCanceled),
    Expired(OrderExpired),
    Filled(OrderFilled),
}

impl OrderEventAny {
    /// Returns the [`OrderEventType`] tag for the event.
    #[must_use]
    pub fn event_type(&self) -> OrderEventType {
        match self {
            Self::Initialized(_) => OrderEventType::Initialized,
            Self::Denied(_) => OrderEventType::Denied,
            Self::Submitted(_) => OrderEventType::Submitted,
            Self::Accepted(_) => OrderEventType::Accepted,
            Self::Rejected(_) => OrderEventType::Rejected,
            Self::Working(_) => OrderEventType::Working,
            Self::Amended(_) => OrderEventType::Amended,
            Self::Canceled(_) => OrderEventType::Canceled,
            Self::Expired(_) => OrderEventType::Expired,
            Self::Filled(_) => OrderEventType::Filled,
        }
    }

    /// Returns the kind of the event as a string slice.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initialized(_) => stringify!(OrderInitialized),
            Self::Denied(_) => stringify!(OrderDenied),
            Self::Submitted(_) => stringify!(OrderSubmitted),
            Self::Accepted(_) => stringify!(OrderAccepted),
            Self::Rejected(_) => stringify!(OrderRejected),
            Self::Working(_) => stringify!(OrderWorking),
            Self::Amended(_) => stringify!(OrderAmended),
            Self::Canceled(_) => stringify!(OrderCanceled),
            Self::Expired(_) => stringify!(OrderExpired),
            Self::Filled(_) => stringify!(OrderFilled),
        }
    }

    /// Returns the trader ID associated with the event.
    #[must_use]
    pub fn trader_id(&self) -> TraderId {
        match self {
            Self::Initialized(event) => event.trader_id,
            Self::Denied(event) => event.trader_id,
            Self::Submitted(event) => event.trader_id,
            Self::Accepted(event) => event.trader_id,
            Self::Rejected(event) => event.trader_id,
            Self::Working(event) => event.trader_id,
            Self::Amended(event) => event.trader_id,
            Self::Canceled(event) => event.trader_id,
            Self::Expired(event) => event.trader_id,
            Self::Filled(event) => event.trader_id,
        }
    }

    /// Returns the strategy ID associated with the event.
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Initialized(event) => event.strategy_id,
            Self::Denied(event) => event.strategy_id,
            Self::Submitted(event) => event.strategy_id,
            Self::Accepted(event) => event.strategy_id,
            Self::Rejected(event) => event.strategy_id,
            Self::Working(event) => event.strategy_id,
            Self::Amended(event) => event.strategy_id,
            Self::Canceled(event) => event.strategy_id,
            Self::Expired(event) => event.strategy_id,
            Self::Filled(event) => event.strategy_id,
        }
    }

    /// Returns the instrument ID associated with the event.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Initialized(event) => event.instrument_id,
            Self::Denied(event) => event.instrument_id,
            Self::Submitted(event) => event.instrument_id,
            Self::Accepted(event) => event.instrument_id,
            Self::Rejected(event) => event.instrument_id,
            Self::Working(event) => event.instrument_id,
            Self::Amended(event) => event.instrument_id,
            Self::Canceled(event) => event.instrument_id,
            Self::Expired(event) => event.instrument_id,
            Self::Filled(event) => event.instrument_id,
        }
    }

    /// Returns the client order ID associated with the event.
    #[must_use]
    pub fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Initialized(event) => event.client_order_id,
            Self::Denied(event) => event.client_order_id,
            Self::Submitted(event) => event.client_order_id,
            Self::Accepted(event) => event.client_order_id,
            Self::Rejected(event) => event.client_order_id,
            Self::Working(event) => event.client_order_id,
            Self::Amended(event) => event.client_order_id,
            Self::Canceled(event) => event.client_order_id,
            Self::Expired(event) => event.client_order_id,
            Self::Filled(event) => event.client_order_id,
        }
    }

    /// Returns the venue order ID associated with the event, if assigned.
    #[must_use]
    pub fn venue_order_id(&self) -> Option<VenueOrderId> {
        match self {
            Self::Initialized(_) | Self::Denied(_) | Self::Submitted(_) | Self::Rejected(_) => None,
            Self::Accepted(event) => Some(event.venue_order_id),
            Self::Working(event) => Some(event.venue_order_id),
            Self::Amended(event) => Some(event.venue_order_id),
            Self::Canceled(event) => event.venue_order_id,
            Self::Expired(event) => event.venue_order_id,
            Self::Filled(event) => Some(event.venue_order_id),
        }
    }

    /// Returns the unique identifier for the event.
    #[must_use]
    pub fn event_id(&self) -> UUID4 {
        match self {
            Self::Initialized(event) => event.event_id,
            Self::Denied(event) => event.event_id,
            Self::Submitted(event) => event.event_id,
            Self::Accepted(event) => event.event_id,
            Self::Rejected(event) => event.event_id,
            Self::Working(event) => event.event_id,
            Self::Amended(event) => event.event_id,
            Self::Canceled(event) => event.event_id,
            Self::Expired(event) => event.event_id,
            Self::Filled(event) => event.event_id,
        }
    }

    /// Returns the UNIX timestamp (nanoseconds) when the event occurred.
    #[must_use]
    pub fn ts_event(&self) -> UnixNanos {
        match self {
            Self::Initialized(event) => event.ts_event,
            Self::Denied(event) => event.ts_event,
            Self::Submitted(event) => event.ts_event,
            Self::Accepted(event) => event.ts_event,
            Self::Rejected(event) => event.ts_event,
            Self::Working(event) => event.ts_event,
            Self::Amended(event) => event.ts_event,
            Self::Canceled(event) => event.ts_event,
            Self::Expired(event) => event.ts_event,
            Self::Filled(event) => event.ts_event,
        }
    }
}

impl Display for OrderEventAny {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(event) => write!(f, "{event}"),
            Self::Denied(event) => write!(f, "{event}"),
            Self::Submitted(event) => write!(f, "{event}"),
            Self::Accepted(event) => write!(f, "{event}"),
            Self::Rejected(event) => write!(f, "{event}"),
            Self::Working(event) => write!(f, "{event}"),
            Self::Amended(event) => write!(f, "{event}"),
            Self::Canceled(event) => write!(f, "{event}"),
            Self::Expired(event) => write!(f, "{event}"),
            Self::Filled(event) => write!(f, "{event}"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::events::order::stubs::*;

    #[rstest]
    fn test_accessors() {
        let event = OrderEventAny::Filled(order_filled_buy_100_at_10());
        assert_eq!(event.event_type(), OrderEventType::Filled);
        assert_eq!(event.kind(), "OrderFilled");
        assert_eq!(event.client_order_id(), Default::default());
        assert_eq!(event.strategy_id(), Default::default());
        assert!(event.venue_order_id().is_some());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let event = OrderEventAny::Initialized(order_initialized_market_buy());
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: OrderEventAny = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
