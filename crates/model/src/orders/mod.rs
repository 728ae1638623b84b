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

//! The order entity and its lifecycle state machine.
//!
//! An [`Order`] is created by an [`OrderInitialized`] event and thereafter
//! driven exclusively by applying further order events. Illegal transitions
//! fail with [`OrderError::InvalidStateTransition`] without mutating state.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    enums::{LiquiditySide, OrderSide, OrderStatus, OrderType, TimeInForce},
    events::{
        OrderAccepted, OrderAmended, OrderCanceled, OrderDenied, OrderEventAny, OrderExpired,
        OrderFilled, OrderInitialized, OrderRejected, OrderSubmitted, OrderWorking,
    },
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
        VenueOrderId,
    },
    types::{Price, Quantity},
};

/// An error within order state or event application.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The event type is not legal from the current order status.
    #[error("Invalid state transition from {status} on {event}")]
    InvalidStateTransition {
        /// The order status the event arrived in.
        status: OrderStatus,
        /// The kind of the offending event.
        event: &'static str,
    },
    /// An amendment was attempted on a MARKET order.
    #[error("Amend not supported for MARKET orders")]
    AmendNotSupported,
    /// An amendment would reduce the quantity below the filled quantity.
    #[error("Amend quantity {quantity} below filled quantity {filled_qty}")]
    QuantityBelowFilled {
        /// The requested amendment quantity.
        quantity: Quantity,
        /// The quantity already filled.
        filled_qty: Quantity,
    },
    /// The time in force is invalid for the order type.
    #[error("Invalid time in force {time_in_force} for MARKET order, must be GTC, IOC or FOK")]
    TimeInForceInvalid {
        /// The offending time in force.
        time_in_force: TimeInForce,
    },
    /// A fill would exceed the order quantity.
    #[error("Fill quantity {last_qty} exceeds leaves quantity {leaves_qty}")]
    OverFill {
        /// The fill quantity.
        last_qty: Quantity,
        /// The remaining open quantity.
        leaves_qty: Quantity,
    },
    /// The order quantity was not positive.
    #[error("Order quantity was not positive")]
    QuantityNonPositive,
    /// A LIMIT order was initialized without a price.
    #[error("LIMIT order requires a price")]
    PriceRequired,
    /// The order side was unspecified.
    #[error("Order side was not specified")]
    SideUnspecified,
}

impl OrderStatus {
    /// Transitions the status for the given `event`.
    ///
    /// For fill events the returned status is `PartiallyFilled`; the fill
    /// handler promotes it to `Filled` once `filled_qty == quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidStateTransition`] if the event type is not
    /// legal from the current status.
    #[rustfmt::skip]
    pub fn transition(&self, event: &OrderEventAny) -> Result<Self, OrderError> {
        let new_status = match (self, event) {
            (Self::Initialized, OrderEventAny::Submitted(_)) => Self::Submitted,
            (Self::Initialized, OrderEventAny::Denied(_)) => Self::Denied,
            (Self::Submitted, OrderEventAny::Denied(_)) => Self::Denied,
            (Self::Submitted, OrderEventAny::Accepted(_)) => Self::Accepted,
            (Self::Submitted, OrderEventAny::Rejected(_)) => Self::Rejected,
            (Self::Submitted, OrderEventAny::Canceled(_)) => Self::Canceled,  // Covers FOK and IOC cases
            (Self::Submitted, OrderEventAny::Filled(_)) => Self::PartiallyFilled,  // Covers immediate fills
            (Self::Accepted, OrderEventAny::Working(_)) => Self::Working,
            (Self::Accepted, OrderEventAny::Rejected(_)) => Self::Rejected,  // Covers post-ack rejections
            (Self::Accepted, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::Accepted, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::Accepted, OrderEventAny::Filled(_)) => Self::PartiallyFilled,
            (Self::Working, OrderEventAny::Amended(_)) => Self::Working,
            (Self::Working, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::Working, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::Working, OrderEventAny::Rejected(_)) => Self::Rejected,
            (Self::Working, OrderEventAny::Filled(_)) => Self::PartiallyFilled,
            (Self::PartiallyFilled, OrderEventAny::Canceled(_)) => Self::Canceled,
            (Self::PartiallyFilled, OrderEventAny::Expired(_)) => Self::Expired,
            (Self::PartiallyFilled, OrderEventAny::Filled(_)) => Self::PartiallyFilled,
            _ => {
                return Err(OrderError::InvalidStateTransition {
                    status: *self,
                    event: event.kind(),
                });
            }
        };
        Ok(new_status)
    }
}

/// Represents an order in a market.
///
/// The entity is driven exclusively by events: construct from an
/// [`OrderInitialized`] and mutate only through [`Order::apply`]. Orders are
/// retained after reaching a terminal status for audit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    /// The current order status.
    pub status: OrderStatus,
    /// The trader ID associated with the order.
    pub trader_id: TraderId,
    /// The strategy ID associated with the order.
    pub strategy_id: StrategyId,
    /// The instrument ID for the order.
    pub instrument_id: InstrumentId,
    /// The client order ID (primary key for the order lifetime).
    pub client_order_id: ClientOrderId,
    /// The venue order ID (assigned by the venue on acceptance).
    pub venue_order_id: Option<VenueOrderId>,
    /// The position ID associated with the order.
    pub position_id: Option<PositionId>,
    /// The account ID associated with the order.
    pub account_id: Option<AccountId>,
    /// The order side.
    pub side: OrderSide,
    /// The order type.
    pub order_type: OrderType,
    /// The order quantity.
    pub quantity: Quantity,
    /// The order price (for limit orders).
    pub price: Option<Price>,
    /// The order time in force.
    pub time_in_force: TimeInForce,
    /// The liquidity side of the last execution.
    pub liquidity_side: Option<LiquiditySide>,
    /// The total quantity filled so far.
    pub filled_qty: Quantity,
    /// The quantity remaining open.
    pub leaves_qty: Quantity,
    /// The fill-quantity-weighted average fill price (defined once filled).
    pub avg_px: Option<f64>,
    /// The trade match ID of the last fill.
    pub last_trade_id: Option<TradeId>,
    /// The event ID of the initialization event.
    pub init_id: UUID4,
    /// UNIX timestamp (nanoseconds) when the order was initialized.
    pub ts_init: UnixNanos,
    /// UNIX timestamp (nanoseconds) of the last applied event.
    pub ts_last: UnixNanos,
    previous_status: Option<OrderStatus>,
    trade_ids: Vec<TradeId>,
    events: Vec<OrderEventAny>,
}

impl Order {
    /// Creates a new [`Order`] from the given initialization event, with
    /// correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the quantity is not positive.
    /// - If the order side is not specified.
    /// - If a MARKET order has a time in force other than GTC, IOC or FOK.
    /// - If a LIMIT order has no price.
    pub fn new_checked(init: OrderInitialized) -> Result<Self, OrderError> {
        if !init.quantity.is_positive() {
            return Err(OrderError::QuantityNonPositive);
        }
        if init.order_side == OrderSide::NoOrderSide {
            return Err(OrderError::SideUnspecified);
        }
        match init.order_type {
            OrderType::Market => {
                if !init.time_in_force.is_valid_for_market_order() {
                    return Err(OrderError::TimeInForceInvalid {
                        time_in_force: init.time_in_force,
                    });
                }
            }
            OrderType::Limit => {
                if init.price.is_none() {
                    return Err(OrderError::PriceRequired);
                }
            }
        }

        Ok(Self {
            status: OrderStatus::Initialized,
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: None,
            position_id: None,
            account_id: None,
            side: init.order_side,
            order_type: init.order_type,
            quantity: init.quantity,
            price: init.price,
            time_in_force: init.time_in_force,
            liquidity_side: None,
            filled_qty: Quantity::zero(init.quantity.precision),
            leaves_qty: init.quantity,
            avg_px: None,
            last_trade_id: None,
            init_id: init.event_id,
            ts_init: init.ts_event,
            ts_last: init.ts_event,
            previous_status: None,
            trade_ids: Vec::new(),
            events: vec![OrderEventAny::Initialized(init)],
        })
    }

    /// Applies the given `event` to the order through the state machine.
    ///
    /// A duplicate fill (same `trade_id` as one already applied) is an
    /// idempotent no-op returning `Ok`.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the event type is not legal from the current status.
    /// - If an amendment targets a MARKET order, or reduces the quantity below
    ///   the filled quantity.
    /// - If a fill would exceed the order quantity.
    pub fn apply(&mut self, event: OrderEventAny) -> Result<(), OrderError> {
        if let OrderEventAny::Filled(fill) = &event {
            if self.trade_ids.contains(&fill.trade_id) {
                log::debug!(
                    "Duplicate {} for {} ignored",
                    fill.trade_id,
                    self.client_order_id
                );
                return Ok(());
            }
        }

        let new_status = self.status.transition(&event)?;

        // Validate payloads before any mutation
        match &event {
            OrderEventAny::Amended(amended) => {
                if self.order_type == OrderType::Market {
                    return Err(OrderError::AmendNotSupported);
                }
                if let Some(quantity) = amended.quantity {
                    if quantity < self.filled_qty {
                        return Err(OrderError::QuantityBelowFilled {
                            quantity,
                            filled_qty: self.filled_qty,
                        });
                    }
                }
            }
            OrderEventAny::Filled(fill) => {
                if fill.last_qty > self.leaves_qty {
                    return Err(OrderError::OverFill {
                        last_qty: fill.last_qty,
                        leaves_qty: self.leaves_qty,
                    });
                }
            }
            _ => {}
        }

        self.previous_status = Some(self.status);
        self.status = new_status;

        match &event {
            OrderEventAny::Denied(e) => self.denied(e),
            OrderEventAny::Submitted(e) => self.submitted(e),
            OrderEventAny::Accepted(e) => self.accepted(e),
            OrderEventAny::Rejected(e) => self.rejected(e),
            OrderEventAny::Working(e) => self.working(e),
            OrderEventAny::Amended(e) => self.amended(e),
            OrderEventAny::Canceled(e) => self.canceled(e),
            OrderEventAny::Expired(e) => self.expired(e),
            OrderEventAny::Filled(e) => self.filled(e),
            OrderEventAny::Initialized(_) => unreachable!("initialization covered by transition"),
        }

        self.ts_last = event.ts_event();
        self.events.push(event);
        Ok(())
    }

    fn denied(&mut self, _event: &OrderDenied) {
        // Do nothing else
    }

    fn submitted(&mut self, event: &OrderSubmitted) {
        self.account_id = Some(event.account_id);
    }

    fn accepted(&mut self, event: &OrderAccepted) {
        self.venue_order_id = Some(event.venue_order_id);
        self.account_id = Some(event.account_id);
    }

    fn rejected(&mut self, _event: &OrderRejected) {
        // Do nothing else
    }

    fn working(&mut self, event: &OrderWorking) {
        self.venue_order_id = Some(event.venue_order_id);
    }

    fn amended(&mut self, event: &OrderAmended) {
        if let Some(quantity) = event.quantity {
            self.quantity = quantity;
            self.leaves_qty = self.quantity - self.filled_qty;
        }
        if let Some(price) = event.price {
            self.price = Some(price);
        }
    }

    fn canceled(&mut self, _event: &OrderCanceled) {
        // Do nothing else
    }

    fn expired(&mut self, _event: &OrderExpired) {
        // Do nothing else
    }

    fn filled(&mut self, event: &OrderFilled) {
        let filled_prev = self.filled_qty.as_f64();
        let last_qty = event.last_qty.as_f64();
        let last_px = event.last_px.as_f64();

        self.avg_px = Some(match self.avg_px {
            Some(avg_px) => avg_px.mul_add(filled_prev, last_px * last_qty)
                / (filled_prev + last_qty),
            None => last_px,
        });

        self.filled_qty += event.last_qty;
        self.leaves_qty = self.quantity - self.filled_qty;
        self.venue_order_id = Some(event.venue_order_id);
        if event.position_id.is_some() {
            self.position_id = event.position_id;
        }
        self.liquidity_side = Some(event.liquidity_side);
        self.trade_ids.push(event.trade_id);
        self.last_trade_id = Some(event.trade_id);

        if self.filled_qty == self.quantity {
            self.status = OrderStatus::Filled;
        }
    }

    /// Returns all events applied to the order, in application order.
    #[must_use]
    pub fn events(&self) -> &[OrderEventAny] {
        &self.events
    }

    /// Returns the last event applied to the order.
    #[must_use]
    pub fn last_event(&self) -> &OrderEventAny {
        // SAFETY: Unwrap safe as `events` always starts with the init event
        self.events.last().unwrap()
    }

    /// Returns the number of events applied to the order.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns the trade match IDs of all applied fills.
    #[must_use]
    pub fn trade_ids(&self) -> &[TradeId] {
        &self.trade_ids
    }

    /// Returns the status prior to the last applied event.
    #[must_use]
    pub fn previous_status(&self) -> Option<OrderStatus> {
        self.previous_status
    }

    /// Returns whether the order is on the BUY side.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == OrderSide::Buy
    }

    /// Returns whether the order is on the SELL side.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == OrderSide::Sell
    }

    /// Returns whether the order will take liquidity aggressively.
    #[must_use]
    pub fn is_aggressive(&self) -> bool {
        self.order_type == OrderType::Market
    }

    /// Returns whether the order rests passively in the book.
    #[must_use]
    pub fn is_passive(&self) -> bool {
        self.order_type != OrderType::Market
    }

    /// Returns whether the order is open (non-terminal).
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Returns whether the order is closed (terminal).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns whether the order is in flight (submitted, awaiting the venue
    /// acknowledgement).
    #[must_use]
    pub fn is_inflight(&self) -> bool {
        self.status == OrderStatus::Submitted
    }
}

impl From<OrderInitialized> for Order {
    /// Creates an [`Order`] from the given initialization event.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Order::new_checked`]).
    fn from(init: OrderInitialized) -> Self {
        Self::new_checked(init).expect("invalid `OrderInitialized`")
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.client_order_id == other.client_order_id
    }
}

impl Eq for Order {}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} {} {} {}, status={}, client_order_id={}, venue_order_id={}, filled_qty={}, avg_px={})",
            stringify!(Order),
            self.side,
            self.quantity,
            self.instrument_id,
            self.order_type,
            self.status,
            self.client_order_id,
            self.venue_order_id
                .map_or("None".to_string(), |id| format!("{id}")),
            self.filled_qty,
            self.avg_px.map_or("None".to_string(), |px| format!("{px}")),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        events::order::stubs::*,
        types::{Price, Quantity},
    };

    fn market_buy_order() -> Order {
        Order::from(order_initialized_market_buy())
    }

    fn limit_sell_order() -> Order {
        Order::from(order_initialized_limit_sell(
            Price::new(10.00, 2),
            Quantity::from(100),
        ))
    }

    fn fill(order: &Order, trade_id: &str, qty: u64, px: f64) -> OrderEventAny {
        OrderEventAny::Filled(order_filled(
            order.client_order_id,
            TradeId::from(trade_id),
            order.side,
            Quantity::from(qty),
            Price::new(px, 2),
        ))
    }

    #[rstest]
    fn test_initialized() {
        let order = market_buy_order();
        assert_eq!(order.status, OrderStatus::Initialized);
        assert_eq!(order.event_count(), 1);
        assert_eq!(order.filled_qty, Quantity::zero(0));
        assert_eq!(order.leaves_qty, Quantity::from(100));
        assert!(order.avg_px.is_none());
        assert!(order.is_buy());
        assert!(order.is_aggressive());
        assert!(order.is_open());
        assert!(!order.is_closed());
    }

    #[rstest]
    fn test_market_order_requires_valid_time_in_force() {
        let mut init = order_initialized_market_buy();
        init.time_in_force = TimeInForce::Day;
        assert_eq!(
            Order::new_checked(init),
            Err(OrderError::TimeInForceInvalid {
                time_in_force: TimeInForce::Day
            })
        );
    }

    #[rstest]
    fn test_limit_order_requires_price() {
        let mut init = order_initialized_market_buy();
        init.order_type = OrderType::Limit;
        init.price = None;
        assert_eq!(Order::new_checked(init), Err(OrderError::PriceRequired));
    }

    #[rstest]
    fn test_zero_quantity_rejected() {
        let mut init = order_initialized_market_buy();
        init.quantity = Quantity::zero(0);
        assert_eq!(Order::new_checked(init), Err(OrderError::QuantityNonPositive));
    }

    #[rstest]
    fn test_lifecycle_to_filled() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Submitted);
        assert!(order.is_inflight());

        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.venue_order_id, Some(VenueOrderId::default()));

        order.apply(fill(&order, "E-1", 100, 10.00)).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled_qty, Quantity::from(100));
        assert!(order.leaves_qty.is_zero());
        assert_eq!(order.avg_px, Some(10.00));
        assert!(order.is_closed());
    }

    #[rstest]
    fn test_partial_then_complete_weighted_avg_px() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();

        order.apply(fill(&order, "E-1", 40, 10.00)).unwrap();
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty, Quantity::from(40));
        assert_eq!(order.leaves_qty, Quantity::from(60));
        assert_eq!(order.avg_px, Some(10.00));

        order.apply(fill(&order, "E-2", 60, 10.50)).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled_qty, Quantity::from(100));
        // (40 * 10.00 + 60 * 10.50) / 100
        assert_eq!(order.avg_px, Some(10.30));
    }

    #[rstest]
    fn test_duplicate_fill_is_noop() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();

        let fill_event = fill(&order, "E-1", 30, 10.00);
        order.apply(fill_event).unwrap();
        let event_count = order.event_count();

        // Second application of the same execution ID returns success without mutation
        order.apply(fill_event).unwrap();
        assert_eq!(order.filled_qty, Quantity::from(30));
        assert_eq!(order.event_count(), event_count);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
    }

    #[rstest]
    fn test_over_fill_rejected() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();

        let result = order.apply(fill(&order, "E-1", 150, 10.00));
        assert!(matches!(result, Err(OrderError::OverFill { .. })));
        assert!(order.filled_qty.is_zero());
    }

    #[rstest]
    fn test_amend_market_order_not_supported() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Working(order_working(order.client_order_id)))
            .unwrap();

        let amended = OrderAmended::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::default(),
            Some(Quantity::from(50)),
            None,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
        );
        let result = order.apply(OrderEventAny::Amended(amended));
        assert_eq!(result, Err(OrderError::AmendNotSupported));
        assert_eq!(order.status, OrderStatus::Working);
        assert_eq!(order.quantity, Quantity::from(100));
    }

    #[rstest]
    fn test_amend_limit_order() {
        let mut order = limit_sell_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Working(order_working(order.client_order_id)))
            .unwrap();

        let amended = OrderAmended::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::default(),
            Some(Quantity::from(150)),
            Some(Price::new(10.50, 2)),
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
        );
        order.apply(OrderEventAny::Amended(amended)).unwrap();
        assert_eq!(order.status, OrderStatus::Working);
        assert_eq!(order.quantity, Quantity::from(150));
        assert_eq!(order.leaves_qty, Quantity::from(150));
        assert_eq!(order.price, Some(Price::new(10.50, 2)));
    }

    #[rstest]
    fn test_amend_below_filled_quantity_rejected() {
        let mut order = limit_sell_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Working(order_working(order.client_order_id)))
            .unwrap();
        order.apply(fill(&order, "E-1", 60, 10.00)).unwrap();

        let amended = OrderAmended::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::default(),
            Some(Quantity::from(50)),
            None,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
        );
        let result = order.apply(OrderEventAny::Amended(amended));
        assert!(matches!(result, Err(OrderError::QuantityBelowFilled { .. })));
        assert_eq!(order.quantity, Quantity::from(100));
    }

    #[rstest]
    fn test_denied_from_submitted() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Denied(order_denied(order.client_order_id, "risk-limit")))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Denied);
        assert!(order.is_closed());
    }

    #[rstest]
    fn test_terminal_status_refuses_events() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Rejected(order_rejected(order.client_order_id, "no margin")))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Rejected);

        let result =
            order.apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)));
        assert_eq!(
            result,
            Err(OrderError::InvalidStateTransition {
                status: OrderStatus::Rejected,
                event: "OrderAccepted",
            })
        );
        assert_eq!(order.status, OrderStatus::Rejected);
    }

    #[rstest]
    fn test_invariant_avg_px_none_iff_unfilled() {
        let mut order = market_buy_order();
        assert!(order.avg_px.is_none() == order.filled_qty.is_zero());
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        order.apply(fill(&order, "E-1", 10, 10.00)).unwrap();
        assert!(order.avg_px.is_none() == order.filled_qty.is_zero());
    }

    #[rstest]
    fn test_cancel_from_partially_filled() {
        let mut order = limit_sell_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
            .unwrap();
        order
            .apply(OrderEventAny::Working(order_working(order.client_order_id)))
            .unwrap();
        order.apply(fill(&order, "E-1", 40, 10.00)).unwrap();
        order
            .apply(OrderEventAny::Canceled(order_canceled(order.client_order_id)))
            .unwrap();

        assert_eq!(order.status, OrderStatus::Canceled);
        assert_eq!(order.filled_qty, Quantity::from(40));
        assert!(order.is_closed());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let mut order = market_buy_order();
        order
            .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
            .unwrap();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, order);
        assert_eq!(deserialized.status, order.status);
        assert_eq!(deserialized.event_count(), order.event_count());
    }
}
