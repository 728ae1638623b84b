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

use meridian_core::{UUID4, UnixNanos, datetime::NANOSECONDS_IN_SECOND};
use meridian_model::{
    enums::{OrderSide, OrderStatus, OrderType, PositionSide, TimeInForce},
    events::{OrderEventAny, order::stubs::*},
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TradeId, TraderId},
    orders::Order,
    position::Position,
    types::{Currency, Money, Price, Quantity},
};
use rstest::rstest;

use crate::{
    engine::stubs::TestEngine,
    messages::{AmendOrder, CancelOrder, FlattenPosition, SubmitOrder, TradingCommand},
};

fn market_order_init(
    client_order_id: &str,
    side: OrderSide,
    quantity: u64,
) -> meridian_model::events::OrderInitialized {
    meridian_model::events::OrderInitialized::new(
        TraderId::default(),
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::new(client_order_id),
        side,
        OrderType::Market,
        Quantity::from(quantity),
        None,
        TimeInForce::Gtc,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

fn submit_market_order(rig: &mut TestEngine, client_order_id: &str, side: OrderSide, quantity: u64) {
    let order = Order::from(market_order_init(client_order_id, side, quantity));
    let cmd = SubmitOrder::new(
        TraderId::default(),
        None,
        StrategyId::default(),
        order,
        None,
        UUID4::new(),
        UnixNanos::default(),
    );
    rig.engine.execute(TradingCommand::SubmitOrder(cmd));
}

fn accept(rig: &mut TestEngine, client_order_id: &str) {
    let event = order_accepted(ClientOrderId::new(client_order_id));
    rig.engine.process(&OrderEventAny::Accepted(event));
}

fn fill(
    rig: &mut TestEngine,
    client_order_id: &str,
    trade_id: &str,
    side: OrderSide,
    quantity: u64,
    price: f64,
) {
    let event = order_filled(
        ClientOrderId::new(client_order_id),
        TradeId::from(trade_id),
        side,
        Quantity::from(quantity),
        Price::new(price, 2),
    );
    rig.engine.process(&OrderEventAny::Filled(event));
}

fn single_open_position(rig: &TestEngine) -> Position {
    let cache = rig.cache.borrow();
    let positions = cache.positions_open(None);
    assert_eq!(positions.len(), 1, "expected exactly one open position");
    positions[0].clone()
}

#[rstest]
fn test_market_buy_single_fill() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");
    fill(&mut rig, "O-A", "E-1", OrderSide::Buy, 100, 10.00);

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Filled);
    assert_eq!(order.filled_qty, Quantity::from(100));
    assert_eq!(order.avg_px, Some(10.00));
    assert!(!cache.is_order_open(&order.client_order_id));
    drop(cache);

    let position = single_open_position(&rig);
    assert_eq!(position.side, PositionSide::Long);
    assert_eq!(position.quantity, Quantity::from(100));
    assert_eq!(position.avg_px_open, 10.00);

    assert_eq!(rig.client.submit_count(), 1);
    assert_eq!(
        rig.handler.kinds(),
        vec!["OrderSubmitted", "OrderAccepted", "OrderFilled", "PositionOpened"]
    );
    assert!(rig.engine.check_integrity());
}

#[rstest]
fn test_partial_then_complete_fill() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-B", OrderSide::Buy, 100);
    accept(&mut rig, "O-B");
    fill(&mut rig, "O-B", "E-1", OrderSide::Buy, 40, 10.00);

    {
        let cache = rig.cache.borrow();
        let order = cache.order(&ClientOrderId::new("O-B")).unwrap();
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty, Quantity::from(40));
        assert!(cache.is_order_open(&order.client_order_id));
    }

    fill(&mut rig, "O-B", "E-2", OrderSide::Buy, 60, 10.50);

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-B")).unwrap();
    assert_eq!(order.status, OrderStatus::Filled);
    assert_eq!(order.filled_qty, Quantity::from(100));
    // (40 * 10.00 + 60 * 10.50) / 100
    assert_eq!(order.avg_px, Some(10.30));
    drop(cache);

    let position = single_open_position(&rig);
    assert_eq!(position.quantity, Quantity::from(100));
    assert_eq!(position.avg_px_open, 10.30);
    assert!(rig.engine.check_integrity());
}

#[rstest]
fn test_position_flip() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");
    fill(&mut rig, "O-A", "E-1", OrderSide::Buy, 100, 10.00);

    submit_market_order(&mut rig, "O-B", OrderSide::Sell, 150);
    accept(&mut rig, "O-B");
    fill(&mut rig, "O-B", "E-2", OrderSide::Sell, 150, 11.00);

    let position = single_open_position(&rig);
    assert_eq!(position.side, PositionSide::Short);
    assert_eq!(position.quantity, Quantity::from(50));
    assert_eq!(position.avg_px_open, 11.00);
    // Realized PnL from the closed portion: (11.00 - 10.00) * 100
    assert_eq!(position.realized_pnl, Money::new(100.0, Currency::USDT()));
    assert!(rig.engine.check_integrity());
}

#[rstest]
fn test_duplicate_fill_is_noop() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");
    fill(&mut rig, "O-A", "E-X", OrderSide::Buy, 30, 10.00);
    let events_after_first = rig.handler.event_count();

    // Same execution ID applied again
    fill(&mut rig, "O-A", "E-X", OrderSide::Buy, 30, 10.00);

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.filled_qty, Quantity::from(30));
    drop(cache);

    let position = single_open_position(&rig);
    assert_eq!(position.quantity, Quantity::from(30));
    assert_eq!(position.event_count(), 1);
    assert_eq!(rig.handler.event_count(), events_after_first);
}

#[rstest]
fn test_amend_market_order_rejected() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");

    let cmd = AmendOrder::new(
        TraderId::default(),
        None,
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::new("O-A"),
        None,
        Some(Quantity::from(50)),
        None,
        UUID4::new(),
        UnixNanos::default(),
    );
    rig.engine.execute(TradingCommand::AmendOrder(cmd));

    // The amend never reaches the client and state is unchanged
    assert_eq!(rig.client.amend_count(), 0);
    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert_eq!(order.quantity, Quantity::from(100));
}

#[rstest]
fn test_cancel_queued_until_accepted() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);

    let cmd = CancelOrder::new(
        TraderId::default(),
        None,
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::new("O-A"),
        None,
        UUID4::new(),
        UnixNanos::default(),
    );
    rig.engine.execute(TradingCommand::CancelOrder(cmd));

    // The order is still awaiting the venue ack so the cancel is held back
    assert_eq!(rig.client.cancel_count(), 0);

    accept(&mut rig, "O-A");
    assert_eq!(rig.client.cancel_count(), 1);
}

#[rstest]
fn test_cancel_discarded_on_rejection() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);

    let cmd = CancelOrder::new(
        TraderId::default(),
        None,
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        ClientOrderId::new("O-A"),
        None,
        UUID4::new(),
        UnixNanos::default(),
    );
    rig.engine.execute(TradingCommand::CancelOrder(cmd));

    let event = order_rejected(ClientOrderId::new("O-A"), "insufficient margin");
    rig.engine.process(&OrderEventAny::Rejected(event));

    // The rejection closed the order so the queued cancel is a no-op
    assert_eq!(rig.client.cancel_count(), 0);
    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Rejected);
    assert!(!cache.is_order_open(&order.client_order_id));
}

#[rstest]
fn test_orphan_event_dropped() {
    let mut rig = TestEngine::new();

    let event = order_accepted(ClientOrderId::new("O-UNKNOWN"));
    rig.engine.process(&OrderEventAny::Accepted(event));

    assert!(rig.cache.borrow().orders(None).is_empty());
    assert_eq!(rig.handler.event_count(), 0);
}

#[rstest]
fn test_order_created_from_initialized_event() {
    let mut rig = TestEngine::new();

    let init = market_order_init("O-EXT", OrderSide::Buy, 10);
    rig.engine.process(&OrderEventAny::Initialized(init));

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-EXT")).unwrap();
    assert_eq!(order.status, OrderStatus::Initialized);
    assert_eq!(rig.handler.kinds(), vec!["OrderInitialized"]);
}

#[rstest]
fn test_invalid_transition_logged_and_dropped() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");
    // A second acceptance is illegal from ACCEPTED
    accept(&mut rig, "O-A");

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert_eq!(order.event_count(), 3); // init, submitted, accepted
}

#[rstest]
fn test_account_state_snapshot_replaced() {
    let mut rig = TestEngine::new();

    let event = account_state(
        "SIM-001",
        "100.00 USD",
        "0.00 USD",
        "100.00 USD",
    );
    rig.engine.process_account(&event);
    {
        let cache = rig.cache.borrow();
        let account = cache.account(&event.account_id).unwrap();
        assert_eq!(account.balance_total(None), Some(Money::from("100.00 USD")));
    }

    let event = account_state(
        "SIM-001",
        "250.00 USD",
        "50.00 USD",
        "200.00 USD",
    );
    rig.engine.process_account(&event);

    let cache = rig.cache.borrow();
    let account = cache.account(&event.account_id).unwrap();
    assert_eq!(account.balance_total(None), Some(Money::from("250.00 USD")));
    assert_eq!(account.event_count(), 2);
}

#[rstest]
fn test_flatten_position_submits_closing_order() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");
    fill(&mut rig, "O-A", "E-1", OrderSide::Buy, 100, 10.00);

    let cmd = FlattenPosition::new(
        TraderId::default(),
        None,
        StrategyId::default(),
        InstrumentId::from("ETH-PERP.DERIBIT"),
        None,
        UUID4::new(),
        UnixNanos::default(),
    );
    rig.engine.execute(TradingCommand::FlattenPosition(cmd));

    assert_eq!(rig.client.submit_count(), 2);
    let commands = rig.client.commands.borrow();
    let TradingCommand::SubmitOrder(closing) = commands.last().unwrap() else {
        panic!("expected a closing SubmitOrder");
    };
    assert_eq!(closing.order.side, OrderSide::Sell);
    assert_eq!(closing.order.quantity, Quantity::from(100));
    assert_eq!(closing.order.order_type, OrderType::Market);
}

#[rstest]
fn test_command_timeout_emitted() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    assert!(rig.engine.next_deadline().is_some());

    // No venue acknowledgement arrives within the 5s default timeout
    rig.clock.borrow_mut().advance_time(6 * NANOSECONDS_IN_SECOND);
    rig.engine.check_timeouts();

    assert!(rig.engine.next_deadline().is_none());
    assert!(rig.handler.kinds().contains(&"OrderCommandTimeout".to_string()));

    // Order state was never speculatively mutated
    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Submitted);
}

#[rstest]
fn test_ack_resolves_inflight_deadline() {
    let mut rig = TestEngine::new();

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);
    accept(&mut rig, "O-A");

    assert!(rig.engine.next_deadline().is_none());

    rig.clock.borrow_mut().advance_time(6 * NANOSECONDS_IN_SECOND);
    rig.engine.check_timeouts();
    assert!(!rig.handler.kinds().contains(&"OrderCommandTimeout".to_string()));
}

#[rstest]
fn test_failed_client_submission_denies_order() {
    let mut rig = TestEngine::new();
    rig.client.fail_submit.set(true);

    submit_market_order(&mut rig, "O-A", OrderSide::Buy, 100);

    let cache = rig.cache.borrow();
    let order = cache.order(&ClientOrderId::new("O-A")).unwrap();
    assert_eq!(order.status, OrderStatus::Denied);
    assert!(!cache.is_order_open(&order.client_order_id));
    drop(cache);

    assert!(rig.handler.kinds().contains(&"OrderDenied".to_string()));
}

fn account_state(
    account_id: &str,
    total: &str,
    locked: &str,
    free: &str,
) -> meridian_model::events::AccountState {
    meridian_model::events::AccountState::new(
        meridian_model::identifiers::AccountId::from(account_id),
        meridian_model::enums::AccountType::Cash,
        Some(Currency::USD()),
        vec![meridian_model::types::AccountBalance::new(
            Money::from(total),
            Money::from(locked),
            Money::from(free),
        )],
        vec![],
        true,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}
