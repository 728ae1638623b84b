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

//! Order event stubs for testing.

use meridian_core::{UUID4, UnixNanos};
use ustr::Ustr;

use crate::{
    enums::{LiquiditySide, OrderSide, OrderType, TimeInForce},
    events::{
        OrderAccepted, OrderCanceled, OrderDenied, OrderFilled, OrderInitialized, OrderRejected,
        OrderSubmitted, OrderWorking,
    },
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, StrategyId, TradeId, TraderId, VenueOrderId,
    },
    types::{Currency, Price, Quantity},
};

#[must_use]
pub fn order_initialized_market_buy() -> OrderInitialized {
    OrderInitialized::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::default(),
        OrderSide::Buy,
        OrderType::Market,
        Quantity::from(100),
        None,
        TimeInForce::Gtc,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_initialized_limit_sell(price: Price, quantity: Quantity) -> OrderInitialized {
    OrderInitialized::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::default(),
        OrderSide::Sell,
        OrderType::Limit,
        quantity,
        Some(price),
        TimeInForce::Gtc,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_submitted(client_order_id: ClientOrderId) -> OrderSubmitted {
    OrderSubmitted::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        AccountId::default(),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_accepted(client_order_id: ClientOrderId) -> OrderAccepted {
    OrderAccepted::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        VenueOrderId::default(),
        AccountId::default(),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_working(client_order_id: ClientOrderId) -> OrderWorking {
    OrderWorking::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        VenueOrderId::default(),
        AccountId::default(),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_rejected(client_order_id: ClientOrderId, reason: &str) -> OrderRejected {
    OrderRejected::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        AccountId::default(),
        Ustr::from(reason),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_denied(client_order_id: ClientOrderId, reason: &str) -> OrderDenied {
    OrderDenied::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        Ustr::from(reason),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_canceled(client_order_id: ClientOrderId) -> OrderCanceled {
    OrderCanceled::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        Some(VenueOrderId::default()),
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

#[must_use]
pub fn order_filled(
    client_order_id: ClientOrderId,
    trade_id: TradeId,
    order_side: OrderSide,
    last_qty: Quantity,
    last_px: Price,
) -> OrderFilled {
    OrderFilled::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        client_order_id,
        VenueOrderId::default(),
        AccountId::default(),
        trade_id,
        order_side,
        OrderType::Market,
        last_qty,
        last_px,
        Currency::USDT(),
        LiquiditySide::Taker,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
        None,
        None,
    )
}

#[must_use]
pub fn order_filled_buy_100_at_10() -> OrderFilled {
    order_filled(
        ClientOrderId::default(),
        TradeId::from("E-001"),
        OrderSide::Buy,
        Quantity::from(100),
        Price::new(10.00, 2),
    )
}
