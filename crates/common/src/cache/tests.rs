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

use ahash::AHashMap;
use bytes::Bytes;
use meridian_core::{UUID4, UnixNanos};
use meridian_model::{
    accounts::Account,
    enums::{AccountType, OrderSide},
    events::{AccountState, OrderEventAny, order::stubs::*},
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId, TradeId, VenueOrderId},
    orders::Order,
    position::Position,
    types::{AccountBalance, Currency, Money, Price, Quantity},
};
use rstest::rstest;

use crate::cache::{Cache, CacheError};

fn cash_account() -> Account {
    Account::new(AccountState::new(
        AccountId::from("SIM-001"),
        AccountType::Cash,
        Some(Currency::USD()),
        vec![AccountBalance::new(
            Money::from("100.00 USD"),
            Money::from("0.00 USD"),
            Money::from("100.00 USD"),
        )],
        vec![],
        true,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    ))
}

fn market_order() -> Order {
    Order::from(order_initialized_market_buy())
}

fn position_for_order(order: &Order) -> Position {
    let mut fill = order_filled(
        order.client_order_id,
        TradeId::from("E-1"),
        OrderSide::Buy,
        Quantity::from(100),
        Price::new(10.00, 2),
    );
    fill.position_id = Some(PositionId::from("P-001"));
    Position::new(fill)
}

#[rstest]
fn test_add_then_get_account() {
    let mut cache = Cache::default();
    let account = cash_account();
    cache.add_account(account.clone()).unwrap();

    assert_eq!(cache.account(&account.id), Some(&account));
    assert_eq!(cache.account_for_venue(&account.id.get_issuer()), Some(&account));
    assert_eq!(cache.accounts().len(), 1);
}

#[rstest]
fn test_add_account_twice_fails() {
    let mut cache = Cache::default();
    cache.add_account(cash_account()).unwrap();
    let result = cache.add_account(cash_account());

    assert!(matches!(result, Err(CacheError::AlreadyExists { .. })));
}

#[rstest]
fn test_update_account_not_found() {
    let mut cache = Cache::default();
    let result = cache.update_account(cash_account());

    assert!(matches!(result, Err(CacheError::NotFound { .. })));
}

#[rstest]
fn test_add_then_get_order() {
    let mut cache = Cache::default();
    let order = market_order();
    cache.add_order(order.clone()).unwrap();

    assert_eq!(cache.order(&order.client_order_id), Some(&order));
    assert!(cache.order_exists(&order.client_order_id));
    assert!(cache.is_order_open(&order.client_order_id));
    assert_eq!(cache.orders(None).len(), 1);
    assert_eq!(cache.orders(Some(&order.strategy_id)).len(), 1);
    assert_eq!(cache.orders(Some(&StrategyId::from("Unknown-9"))).len(), 0);
}

#[rstest]
fn test_add_order_twice_fails() {
    let mut cache = Cache::default();
    cache.add_order(market_order()).unwrap();
    let result = cache.add_order(market_order());

    assert!(matches!(result, Err(CacheError::AlreadyExists { .. })));
}

#[rstest]
fn test_update_order_maintains_working_index() {
    let mut cache = Cache::default();
    let mut order = market_order();
    cache.add_order(order.clone()).unwrap();

    order
        .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
        .unwrap();
    order
        .apply(OrderEventAny::Accepted(order_accepted(order.client_order_id)))
        .unwrap();
    cache.update_order(&order).unwrap();

    // Venue order ID becomes resolvable after acceptance
    assert_eq!(
        cache.client_order_id(&VenueOrderId::default()),
        Some(&order.client_order_id)
    );
    assert!(cache.is_order_open(&order.client_order_id));

    order
        .apply(OrderEventAny::Canceled(order_canceled(order.client_order_id)))
        .unwrap();
    cache.update_order(&order).unwrap();

    // Terminal order leaves the working index on this update, but is retained
    assert!(!cache.is_order_open(&order.client_order_id));
    assert_eq!(cache.orders_open(None).len(), 0);
    assert_eq!(cache.orders_closed(None).len(), 1);
    assert!(cache.order(&order.client_order_id).is_some());
    assert!(cache.check_integrity());
}

#[rstest]
fn test_update_order_not_found() {
    let mut cache = Cache::default();
    let result = cache.update_order(&market_order());

    assert!(matches!(result, Err(CacheError::NotFound { .. })));
}

#[rstest]
fn test_add_then_get_position() {
    let mut cache = Cache::default();
    let order = market_order();
    cache.add_order(order.clone()).unwrap();
    let position = position_for_order(&order);
    cache.add_position(position.clone()).unwrap();

    assert_eq!(cache.position(&position.id), Some(&position));
    assert!(cache.position_exists(&position.id));
    assert_eq!(cache.position_id(&order.client_order_id), Some(&position.id));
    assert_eq!(cache.positions_open(None).len(), 1);
    assert_eq!(
        cache
            .positions_open_for_instrument(&position.instrument_id, Some(&position.strategy_id))
            .len(),
        1
    );
}

#[rstest]
fn test_update_position_maintains_open_index() {
    let mut cache = Cache::default();
    let order = market_order();
    let mut position = position_for_order(&order);
    cache.add_position(position.clone()).unwrap();

    let mut closing_fill = order_filled(
        order.client_order_id,
        TradeId::from("E-2"),
        OrderSide::Sell,
        Quantity::from(100),
        Price::new(11.00, 2),
    );
    closing_fill.position_id = Some(position.id);
    position.apply(&closing_fill).unwrap();
    cache.update_position(&position).unwrap();

    // Flat position leaves the open index on this update, but is retained
    assert_eq!(cache.positions_open(None).len(), 0);
    assert_eq!(cache.positions_closed(None).len(), 1);
    assert!(cache.position(&position.id).is_some());
    assert!(cache.check_integrity());
}

#[rstest]
fn test_build_index_from_loaded_state() {
    let mut cache = Cache::default();
    let mut order = market_order();
    order
        .apply(OrderEventAny::Submitted(order_submitted(order.client_order_id)))
        .unwrap();
    cache.add_order(order.clone()).unwrap();
    let position = position_for_order(&order);
    cache.add_position(position.clone()).unwrap();

    cache.clear_index();
    cache.build_index();

    assert!(cache.order_exists(&order.client_order_id));
    assert!(cache.is_order_open(&order.client_order_id));
    assert!(cache.position_exists(&position.id));
    assert!(cache.check_integrity());
}

#[rstest]
fn test_strategy_state_round_trip() {
    let mut cache = Cache::default();
    let strategy_id = StrategyId::from("S-001");

    let mut state = AHashMap::new();
    state.insert("window".to_string(), Bytes::from_static(b"\x00\x01"));
    cache.update_strategy(&strategy_id, state).unwrap();

    let loaded = cache.load_strategy(&strategy_id).unwrap();
    assert_eq!(loaded.get("window"), Some(&Bytes::from_static(b"\x00\x01")));

    cache.delete_strategy(&strategy_id).unwrap();
    // Memory-only cache: deleted state loads as empty
    assert!(cache.load_strategy(&strategy_id).unwrap().is_empty());
}

#[rstest]
fn test_flush_clears_all_records() {
    let mut cache = Cache::default();
    cache.add_account(cash_account()).unwrap();
    cache.add_order(market_order()).unwrap();

    cache.flush();

    assert!(cache.accounts().is_empty());
    assert!(cache.orders(None).is_empty());
    assert!(cache.positions(None).is_empty());
}

#[rstest]
fn test_check_residuals() {
    let mut cache = Cache::default();
    assert!(!cache.check_residuals());

    cache.add_order(market_order()).unwrap();
    assert!(cache.check_residuals());
}
