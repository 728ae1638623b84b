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

//! Identifier stubs for testing.

use rstest::fixture;

use crate::identifiers::{
    AccountId, ClientId, ClientOrderId, InstrumentId, PositionId, StrategyId, Symbol, TradeId,
    TraderId, Venue, VenueOrderId,
};

#[fixture]
pub fn trader_id() -> TraderId {
    TraderId::default()
}

#[fixture]
pub fn strategy_id() -> StrategyId {
    StrategyId::default()
}

#[fixture]
pub fn strategy_id_ema_cross() -> StrategyId {
    StrategyId::from("EMACross-001")
}

#[fixture]
pub fn client_id() -> ClientId {
    ClientId::default()
}

#[fixture]
pub fn client_order_id() -> ClientOrderId {
    ClientOrderId::default()
}

#[fixture]
pub fn venue_order_id() -> VenueOrderId {
    VenueOrderId::default()
}

#[fixture]
pub fn position_id() -> PositionId {
    PositionId::default()
}

#[fixture]
pub fn account_id() -> AccountId {
    AccountId::default()
}

#[fixture]
pub fn trade_id() -> TradeId {
    TradeId::default()
}

#[fixture]
pub fn symbol_eth_perp() -> Symbol {
    Symbol::from("ETH-PERP")
}

#[fixture]
pub fn venue_deribit() -> Venue {
    Venue::from("DERIBIT")
}

#[fixture]
pub fn instrument_id_eth_perp() -> InstrumentId {
    InstrumentId::from("ETH-PERP.DERIBIT")
}

#[fixture]
pub fn instrument_id_btc_usdt() -> InstrumentId {
    InstrumentId::from("BTCUSDT.BINANCE")
}
