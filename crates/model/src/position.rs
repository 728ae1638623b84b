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

//! Represents a position in a market, the result of accumulated fills.

use std::fmt::{Display, Formatter};

use meridian_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSideSpecified, PositionSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
    },
    types::{Currency, Money, Quantity},
};

/// Represents a position in a market.
///
/// A position accumulates fills for one `(strategy, instrument)` pair. The
/// position may be flat, long or short; the side is always derived from the
/// net signed quantity, so `side == Flat` exactly when `quantity` is zero.
/// Realized PnL accrues from the closing portion of opposing fills as
/// `(exit - avg_px_open) * closed_qty * side_sign`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    /// The position ID.
    pub id: PositionId,
    /// The trader ID associated with the position.
    pub trader_id: TraderId,
    /// The strategy ID associated with the position.
    pub strategy_id: StrategyId,
    /// The instrument ID for the position.
    pub instrument_id: InstrumentId,
    /// The account ID associated with the position.
    pub account_id: AccountId,
    /// The client order ID for the order which opened the position.
    pub opening_order_id: ClientOrderId,
    /// The client order ID for the order which closed the position.
    pub closing_order_id: Option<ClientOrderId>,
    /// The entry direction from the opening fill.
    pub entry: OrderSideSpecified,
    /// The current position side.
    pub side: PositionSide,
    /// The current signed quantity (positive for long, negative for short).
    pub signed_qty: f64,
    /// The current open quantity.
    pub quantity: Quantity,
    /// The peak directional quantity reached over the position lifetime.
    pub peak_qty: Quantity,
    /// The quantity decimal precision.
    pub size_precision: u8,
    /// The average open price.
    pub avg_px_open: f64,
    /// The average close price.
    pub avg_px_close: Option<f64>,
    /// The settlement currency (taken from the opening fill price currency).
    pub currency: Currency,
    /// The realized PnL over the position lifetime, excluding commissions.
    pub realized_pnl: Money,
    /// The trade match IDs of all applied fills.
    pub trade_ids: Vec<TradeId>,
    /// UNIX timestamp (nanoseconds) when the position was initialized.
    pub ts_init: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position was opened.
    pub ts_opened: UnixNanos,
    /// UNIX timestamp (nanoseconds) of the last fill.
    pub ts_last: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position was closed.
    pub ts_closed: Option<UnixNanos>,
    events: Vec<OrderFilled>,
    closed_qty: f64,
}

impl Position {
    /// Creates a new [`Position`] instance, opened by the given `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `fill` carries no position ID, no specified order side, or a
    /// zero quantity.
    #[must_use]
    pub fn new(fill: OrderFilled) -> Self {
        let position_id = fill
            .position_id
            .expect("`fill` for position opening should have a `position_id`");
        assert!(
            fill.last_qty.is_positive(),
            "`fill` for position opening should have a positive quantity"
        );
        let entry = fill.specified_side();

        let mut position = Self {
            id: position_id,
            trader_id: fill.trader_id,
            strategy_id: fill.strategy_id,
            instrument_id: fill.instrument_id,
            account_id: fill.account_id,
            opening_order_id: fill.client_order_id,
            closing_order_id: None,
            entry,
            side: PositionSide::Flat,
            signed_qty: 0.0,
            quantity: Quantity::zero(fill.last_qty.precision),
            peak_qty: Quantity::zero(fill.last_qty.precision),
            size_precision: fill.last_qty.precision,
            avg_px_open: fill.last_px.as_f64(),
            avg_px_close: None,
            currency: fill.currency,
            realized_pnl: Money::zero(fill.currency),
            trade_ids: Vec::new(),
            ts_init: fill.ts_init,
            ts_opened: fill.ts_event,
            ts_last: fill.ts_event,
            ts_closed: None,
            events: Vec::new(),
            closed_qty: 0.0,
        };
        position
            .apply(&fill)
            .expect("opening fill should always apply");
        position
    }

    /// Applies the given `fill` to the position.
    ///
    /// # Errors
    ///
    /// Returns an error if the fill's `trade_id` has already been applied.
    pub fn apply(&mut self, fill: &OrderFilled) -> anyhow::Result<()> {
        if self.trade_ids.contains(&fill.trade_id) {
            anyhow::bail!("duplicate {} already applied to position {}", fill.trade_id, self.id)
        }

        let last_px = fill.last_px.as_f64();
        let last_qty = fill.last_qty.as_f64();

        match fill.specified_side() {
            OrderSideSpecified::Buy => self.fill_signed(last_qty, last_px, fill),
            OrderSideSpecified::Sell => self.fill_signed(-last_qty, last_px, fill),
        }

        self.quantity = Quantity::new(self.signed_qty.abs(), self.size_precision);
        if self.quantity > self.peak_qty {
            self.peak_qty = self.quantity;
        }

        self.side = if self.signed_qty > 0.0 {
            PositionSide::Long
        } else if self.signed_qty < 0.0 {
            PositionSide::Short
        } else {
            PositionSide::Flat
        };

        if self.side == PositionSide::Flat {
            self.closing_order_id = Some(fill.client_order_id);
            self.ts_closed = Some(fill.ts_event);
        }

        self.ts_last = fill.ts_event;
        self.trade_ids.push(fill.trade_id);
        self.events.push(*fill);
        Ok(())
    }

    fn fill_signed(&mut self, fill_signed_qty: f64, last_px: f64, fill: &OrderFilled) {
        let open_signed = self.signed_qty;

        if open_signed == 0.0 || open_signed.signum() == fill_signed_qty.signum() {
            // Opening (or reopening) vs increasing: weighted average open price
            if open_signed == 0.0 {
                self.entry = fill.specified_side();
                self.opening_order_id = fill.client_order_id;
                self.closing_order_id = None;
                self.avg_px_open = last_px;
                self.avg_px_close = None;
                self.closed_qty = 0.0;
                self.peak_qty = Quantity::zero(self.size_precision);
                self.ts_opened = fill.ts_event;
                self.ts_closed = None;
            } else {
                let open_abs = open_signed.abs();
                let fill_abs = fill_signed_qty.abs();
                self.avg_px_open = (self.avg_px_open * open_abs + last_px * fill_abs)
                    / (open_abs + fill_abs);
            }
            self.signed_qty += fill_signed_qty;
            return;
        }

        // Opposing fill: reduce, possibly flip
        let side_sign = open_signed.signum();
        let closed_qty = fill_signed_qty.abs().min(open_signed.abs());
        let pnl = (last_px - self.avg_px_open) * closed_qty * side_sign;
        self.realized_pnl += Money::new(pnl, self.currency);

        self.avg_px_close = match self.avg_px_close {
            Some(avg_px_close) => Some(
                (avg_px_close * self.closed_qty + last_px * closed_qty)
                    / (self.closed_qty + closed_qty),
            ),
            None => Some(last_px),
        };
        self.closed_qty += closed_qty;

        let residual = fill_signed_qty.abs() - closed_qty;
        if residual > 0.0 {
            // Flip: the residual opens a new side at the fill price
            self.signed_qty = residual * fill_signed_qty.signum();
            self.entry = fill.specified_side();
            self.opening_order_id = fill.client_order_id;
            self.avg_px_open = last_px;
            self.avg_px_close = None;
            self.closed_qty = 0.0;
            self.peak_qty = Quantity::new(residual, self.size_precision);
            self.ts_opened = fill.ts_event;
        } else {
            self.signed_qty += fill_signed_qty;
        }
    }

    /// Returns the number of fill events applied to the position.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns all fill events applied to the position.
    #[must_use]
    pub fn events(&self) -> &[OrderFilled] {
        &self.events
    }

    /// Returns the last fill event applied to the position.
    #[must_use]
    pub fn last_event(&self) -> Option<&OrderFilled> {
        self.events.last()
    }

    /// Returns whether the position is open (not flat).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat
    }

    /// Returns whether the position is closed (flat).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.side == PositionSide::Flat
    }

    /// Returns whether the position is long.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    /// Returns whether the position is short.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Returns whether the given order side opposes the position side.
    #[must_use]
    pub fn is_opposite_side(&self, side: crate::enums::OrderSide) -> bool {
        match self.side {
            PositionSide::Long => side == crate::enums::OrderSide::Sell,
            PositionSide::Short => side == crate::enums::OrderSide::Buy,
            PositionSide::Flat => false,
        }
    }

    /// Returns the side of an order which would close the position.
    #[must_use]
    pub fn closing_order_side(&self) -> crate::enums::OrderSide {
        match self.side {
            PositionSide::Long => crate::enums::OrderSide::Sell,
            PositionSide::Short => crate::enums::OrderSide::Buy,
            PositionSide::Flat => crate::enums::OrderSide::NoOrderSide,
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Position {}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} {} {}, id={})",
            stringify!(Position),
            self.side,
            self.quantity,
            self.instrument_id,
            self.id,
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
        enums::OrderSide,
        events::order::stubs::order_filled,
        identifiers::{ClientOrderId, TradeId},
        types::{Price, Quantity},
    };

    fn fill_with_position_id(
        trade_id: &str,
        side: OrderSide,
        qty: u64,
        px: f64,
    ) -> OrderFilled {
        let mut fill = order_filled(
            ClientOrderId::default(),
            TradeId::from(trade_id),
            side,
            Quantity::from(qty),
            Price::new(px, 2),
        );
        fill.position_id = Some(PositionId::from("P-001"));
        fill
    }

    #[rstest]
    fn test_open_long() {
        let position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));

        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.quantity, Quantity::from(100));
        assert_eq!(position.signed_qty, 100.0);
        assert_eq!(position.avg_px_open, 10.00);
        assert_eq!(position.entry, OrderSideSpecified::Buy);
        assert!(position.is_open());
        assert!(!position.is_closed());
        assert_eq!(position.event_count(), 1);
    }

    #[rstest]
    fn test_increase_long_weighted_avg_px() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 40, 10.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Buy, 60, 10.50))
            .unwrap();

        assert_eq!(position.quantity, Quantity::from(100));
        assert_eq!(position.avg_px_open, 10.30);
        assert_eq!(position.side, PositionSide::Long);
    }

    #[rstest]
    fn test_reduce_realizes_pnl() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Sell, 50, 11.00))
            .unwrap();

        assert_eq!(position.side, PositionSide::Long);
        assert_eq!(position.quantity, Quantity::from(50));
        assert_eq!(position.realized_pnl, Money::new(50.0, Currency::USDT()));
        assert_eq!(position.avg_px_close, Some(11.00));
    }

    #[rstest]
    fn test_close_to_flat() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Sell, 100, 11.00))
            .unwrap();

        assert_eq!(position.side, PositionSide::Flat);
        assert!(position.quantity.is_zero());
        assert!(position.is_closed());
        assert!(position.ts_closed.is_some());
        assert_eq!(position.realized_pnl, Money::new(100.0, Currency::USDT()));
        assert_eq!(position.closing_order_id, Some(ClientOrderId::default()));
    }

    #[rstest]
    fn test_flip_long_to_short() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Sell, 150, 11.00))
            .unwrap();

        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.quantity, Quantity::from(50));
        assert_eq!(position.avg_px_open, 11.00);
        assert_eq!(position.entry, OrderSideSpecified::Sell);
        // Realized PnL from the closed portion: (11.00 - 10.00) * 100
        assert_eq!(position.realized_pnl, Money::new(100.0, Currency::USDT()));
    }

    #[rstest]
    fn test_short_reduce_realizes_pnl() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Sell, 100, 11.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Buy, 100, 10.00))
            .unwrap();

        assert_eq!(position.side, PositionSide::Flat);
        // Short PnL: (10.00 - 11.00) * 100 * -1
        assert_eq!(position.realized_pnl, Money::new(100.0, Currency::USDT()));
    }

    #[rstest]
    fn test_duplicate_trade_id_rejected() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        let result = position.apply(&fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));

        assert!(result.is_err());
        assert_eq!(position.quantity, Quantity::from(100));
        assert_eq!(position.event_count(), 1);
    }

    #[rstest]
    fn test_signed_qty_matches_fill_sum() {
        let mut position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        position
            .apply(&fill_with_position_id("E-2", OrderSide::Sell, 30, 10.00))
            .unwrap();
        position
            .apply(&fill_with_position_id("E-3", OrderSide::Buy, 10, 10.00))
            .unwrap();

        // 100 - 30 + 10
        assert_eq!(position.signed_qty, 80.0);
        assert_eq!(position.quantity, Quantity::from(80));
    }

    #[rstest]
    fn test_closing_order_side() {
        let position = Position::new(fill_with_position_id("E-1", OrderSide::Buy, 100, 10.00));
        assert_eq!(position.closing_order_side(), OrderSide::Sell);
        assert!(position.is_opposite_side(OrderSide::Sell));
        assert!(!position.is_opposite_side(OrderSide::Buy));
    }
}
