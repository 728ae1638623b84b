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

//! Provides a generic `ExecutionEngine` for all environments.
//!
//! The execution engine is the sole mutator of orders, positions and accounts.
//! Its two entry points are command ingress from strategies
//! ([`ExecutionEngine::execute`]) and event ingress from execution clients
//! ([`ExecutionEngine::process`] / [`ExecutionEngine::process_account`]).
//! Events for a single client order ID are applied strictly in arrival order;
//! applied events are published synchronously to registered strategy
//! subscribers before ingress returns.

pub mod config;

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Debug,
    rc::Rc,
};

use meridian_common::{
    cache::Cache,
    clock::Clock,
    generators::{client_order_id::ClientOrderIdGenerator, position_id::PositionIdGenerator},
};
use meridian_core::{UUID4, UnixNanos, datetime::NANOSECONDS_IN_SECOND};
use meridian_model::{
    accounts::Account,
    enums::{OrderType, TimeInForce},
    events::{
        AccountState, OrderDenied, OrderEventAny, OrderFilled, OrderInitialized, OrderSubmitted,
        PositionChanged, PositionClosed, PositionEventAny, PositionOpened,
    },
    identifiers::{
        ClientId, ClientOrderId, InstrumentId, PositionId, StrategyId, TraderId, Venue,
    },
    orders::{Order, OrderError},
    position::Position,
};
use ustr::Ustr;

pub use crate::engine::config::ExecutionEngineConfig;
use crate::{
    client::ExecutionClient,
    messages::{
        AmendOrder, CancelOrder, FlattenPosition, OrderCommandTimeout, SubmitOrder, TradingCommand,
    },
};

/// An event published by the engine to its strategy subscribers.
#[derive(Clone, Debug)]
pub enum ExecutionEvent {
    /// An applied order event.
    Order(OrderEventAny),
    /// A derived position event.
    Position(PositionEventAny),
    /// An applied account state snapshot.
    Account(AccountState),
    /// A synthetic command timeout notification.
    CommandTimeout(OrderCommandTimeout),
}

/// A subscriber receiving execution events for one strategy.
///
/// `on_event` is invoked synchronously on the engine thread for each applied
/// event tagged with the subscriber's strategy ID, and must not block:
/// long-running strategy work must be posted to a strategy-owned worker.
pub trait ExecutionEventHandler {
    /// Handles the given `event`.
    fn on_event(&self, event: &ExecutionEvent);
}

#[derive(Clone, Debug)]
struct InflightCommand {
    trader_id: TraderId,
    strategy_id: StrategyId,
    instrument_id: InstrumentId,
    command_id: UUID4,
    command_kind: &'static str,
    deadline: UnixNanos,
}

/// Central execution engine responsible for orchestrating order routing and
/// state reconciliation.
///
/// All collaborators (clock, cache, clients, subscribers) are explicit and
/// passed in at construction or registration; the engine holds no process-wide
/// state.
pub struct ExecutionEngine {
    clock: Rc<RefCell<dyn Clock>>,
    cache: Rc<RefCell<Cache>>,
    trader_id: TraderId,
    clients: HashMap<ClientId, Rc<dyn ExecutionClient>>,
    default_client: Option<Rc<dyn ExecutionClient>>,
    routing_map: HashMap<Venue, ClientId>,
    subscribers: HashMap<StrategyId, Vec<Rc<dyn ExecutionEventHandler>>>,
    pos_id_generator: PositionIdGenerator,
    cl_ord_id_generators: HashMap<StrategyId, ClientOrderIdGenerator>,
    pending_cancels: HashMap<ClientOrderId, CancelOrder>,
    inflight_commands: HashMap<ClientOrderId, InflightCommand>,
    config: ExecutionEngineConfig,
}

impl Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ExecutionEngine))
            .field("trader_id", &self.trader_id)
            .field("client_count", &self.clients.len())
            .finish()
    }
}

impl ExecutionEngine {
    /// Creates a new [`ExecutionEngine`] instance.
    pub fn new(
        trader_id: TraderId,
        clock: Rc<RefCell<dyn Clock>>,
        cache: Rc<RefCell<Cache>>,
        config: Option<ExecutionEngineConfig>,
    ) -> Self {
        Self {
            clock: clock.clone(),
            cache,
            trader_id,
            clients: HashMap::new(),
            default_client: None,
            routing_map: HashMap::new(),
            subscribers: HashMap::new(),
            pos_id_generator: PositionIdGenerator::new(trader_id, clock),
            cl_ord_id_generators: HashMap::new(),
            pending_cancels: HashMap::new(),
            inflight_commands: HashMap::new(),
            config: config.unwrap_or_default(),
        }
    }

    /// Returns the trader ID the engine operates for.
    #[must_use]
    pub fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    /// Checks the integrity of cached execution data.
    #[must_use]
    pub fn check_integrity(&self) -> bool {
        self.cache.borrow().check_integrity()
    }

    /// Returns whether all registered execution clients are connected.
    #[must_use]
    pub fn check_connected(&self) -> bool {
        self.clients.values().all(|client| client.is_connected())
    }

    /// Returns whether all registered execution clients are disconnected.
    #[must_use]
    pub fn check_disconnected(&self) -> bool {
        self.clients.values().all(|client| !client.is_connected())
    }

    /// Checks for residual open orders and positions in the cache.
    #[must_use]
    pub fn check_residuals(&self) -> bool {
        self.cache.borrow().check_residuals()
    }

    // -- REGISTRATION ----------------------------------------------------------------------------

    /// Registers a new execution client, routing its venue to it.
    ///
    /// # Errors
    ///
    /// Returns an error if a client with the same ID is already registered.
    pub fn register_client(&mut self, client: Rc<dyn ExecutionClient>) -> anyhow::Result<()> {
        if self.clients.contains_key(&client.client_id()) {
            anyhow::bail!("Client already registered with ID {}", client.client_id());
        }

        self.routing_map.insert(client.venue(), client.client_id());

        log::info!("Registered client {}", client.client_id());
        self.clients.insert(client.client_id(), client);
        Ok(())
    }

    /// Registers a default execution client for fallback routing.
    pub fn register_default_client(&mut self, client: Rc<dyn ExecutionClient>) {
        log::info!("Registered default client {}", client.client_id());
        self.default_client = Some(client);
    }

    /// Sets routing for a specific venue to a given client ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the client ID is not registered.
    pub fn register_venue_routing(
        &mut self,
        client_id: ClientId,
        venue: Venue,
    ) -> anyhow::Result<()> {
        if !self.clients.contains_key(&client_id) {
            anyhow::bail!("No client registered with ID {client_id}");
        }

        self.routing_map.insert(venue, client_id);
        log::info!("Set client {client_id} routing for {venue}");
        Ok(())
    }

    /// Deregisters the execution client with the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no client is registered with the given ID.
    pub fn deregister_client(&mut self, client_id: ClientId) -> anyhow::Result<()> {
        if self.clients.remove(&client_id).is_some() {
            self.routing_map.retain(|_, mapped_id| mapped_id != &client_id);
            log::info!("Deregistered client {client_id}");
            Ok(())
        } else {
            anyhow::bail!("No client registered with ID {client_id}")
        }
    }

    /// Registers a subscriber to receive execution events for the given
    /// `strategy_id`.
    pub fn register_subscriber(
        &mut self,
        strategy_id: StrategyId,
        handler: Rc<dyn ExecutionEventHandler>,
    ) {
        self.subscribers.entry(strategy_id).or_default().push(handler);
        log::info!("Registered subscriber for {strategy_id}");
    }

    // -- COMMANDS --------------------------------------------------------------------------------

    /// Loads persistent state into the cache and rebuilds indices.
    ///
    /// # Errors
    ///
    /// Returns an error if any cache operation fails.
    #[allow(clippy::await_holding_refcell_ref)]
    pub async fn load_cache(&mut self) -> anyhow::Result<()> {
        {
            let mut cache = self.cache.borrow_mut();
            cache.clear_index();
            cache.cache_all().await?;
            cache.build_index();
            let _ = cache.check_integrity();
        }

        self.set_position_id_counts();
        log::info!("Loaded cache");
        Ok(())
    }

    /// Executes the given trading `command`, validating and routing it to the
    /// appropriate execution client.
    pub fn execute(&mut self, command: TradingCommand) {
        if self.config.debug {
            log::debug!("<--[CMD] {command:?}");
        }

        let client = if let Some(client) = command
            .client_id()
            .and_then(|client_id| self.clients.get(&client_id))
            .or_else(|| {
                self.routing_map
                    .get(&command.instrument_id().venue)
                    .and_then(|client_id| self.clients.get(client_id))
            })
            .or(self.default_client.as_ref())
        {
            client.clone()
        } else {
            log::error!(
                "No execution client found for command: client_id={:?}, venue={}, command={command}",
                command.client_id(),
                command.instrument_id().venue,
            );
            return;
        };

        match command {
            TradingCommand::SubmitOrder(cmd) => self.handle_submit_order(&client, cmd),
            TradingCommand::CancelOrder(cmd) => self.handle_cancel_order(&client, cmd),
            TradingCommand::AmendOrder(cmd) => self.handle_amend_order(&client, cmd),
            TradingCommand::FlattenPosition(cmd) => self.handle_flatten_position(&client, cmd),
        }
    }

    // -- COMMAND HANDLERS ------------------------------------------------------------------------

    fn handle_submit_order(&mut self, client: &Rc<dyn ExecutionClient>, cmd: SubmitOrder) {
        let client_order_id = cmd.client_order_id;
        if self.cache.borrow().order_exists(&client_order_id) {
            log::error!("Cannot submit order: {client_order_id} already exists");
            return;
        }

        let mut order = cmd.order.clone();
        if let Err(e) = self.cache.borrow_mut().add_order(order.clone()) {
            log::error!("Error adding order to cache: {e}");
            return;
        }

        // Record submission intent before forwarding to the client
        let ts_now = self.clock.borrow().timestamp_ns();
        let submitted = OrderSubmitted::new(
            cmd.trader_id,
            cmd.strategy_id,
            cmd.instrument_id,
            client_order_id,
            client.account_id(),
            UUID4::new(),
            ts_now,
            ts_now,
        );
        if !self.apply_event_to_order(&mut order, OrderEventAny::Submitted(submitted)) {
            return;
        }

        if let Err(e) = client.submit_order(&cmd) {
            log::error!("Error submitting order to client: {e}");
            self.deny_order(&mut order, &format!("failed-to-submit-order-to-client: {e}"));
            return;
        }

        self.register_inflight(
            cmd.trader_id,
            cmd.strategy_id,
            cmd.instrument_id,
            client_order_id,
            cmd.command_id,
            stringify!(SubmitOrder),
        );
    }

    fn handle_cancel_order(&mut self, client: &Rc<dyn ExecutionClient>, cmd: CancelOrder) {
        let order = match self.cache.borrow().order(&cmd.client_order_id) {
            Some(order) => order.clone(),
            None => {
                log::error!("Cannot cancel order: {} not found in the cache", cmd.client_order_id);
                return;
            }
        };

        if order.is_closed() {
            log::warn!(
                "Cannot cancel order: {} already closed with status {}",
                cmd.client_order_id,
                order.status,
            );
            return;
        }

        if order.is_inflight() {
            // The venue has not yet acknowledged the submission: queue the
            // cancel and release it upon acceptance
            log::debug!("Queueing {cmd} until venue acknowledgement");
            self.pending_cancels.insert(cmd.client_order_id, cmd);
            return;
        }

        if let Err(e) = client.cancel_order(&cmd) {
            log::error!("Error canceling order: {e}");
            return;
        }

        self.register_inflight(
            cmd.trader_id,
            cmd.strategy_id,
            cmd.instrument_id,
            cmd.client_order_id,
            cmd.command_id,
            stringify!(CancelOrder),
        );
    }

    fn handle_amend_order(&mut self, client: &Rc<dyn ExecutionClient>, cmd: AmendOrder) {
        let order = match self.cache.borrow().order(&cmd.client_order_id) {
            Some(order) => order.clone(),
            None => {
                log::error!("Cannot amend order: {} not found in the cache", cmd.client_order_id);
                return;
            }
        };

        if order.order_type == OrderType::Market {
            log::error!(
                "Cannot amend order: {} (amend not supported for MARKET orders)",
                cmd.client_order_id,
            );
            return;
        }
        if order.is_closed() {
            log::warn!(
                "Cannot amend order: {} already closed with status {}",
                cmd.client_order_id,
                order.status,
            );
            return;
        }
        if let Some(quantity) = cmd.quantity {
            if quantity < order.filled_qty {
                log::error!(
                    "Cannot amend order: quantity {quantity} below filled quantity {}",
                    order.filled_qty,
                );
                return;
            }
        }

        if let Err(e) = client.amend_order(&cmd) {
            log::error!("Error amending order: {e}");
            return;
        }

        self.register_inflight(
            cmd.trader_id,
            cmd.strategy_id,
            cmd.instrument_id,
            cmd.client_order_id,
            cmd.command_id,
            stringify!(AmendOrder),
        );
    }

    fn handle_flatten_position(&mut self, client: &Rc<dyn ExecutionClient>, cmd: FlattenPosition) {
        let position = {
            let cache = self.cache.borrow();
            let position = match cmd.position_id {
                Some(position_id) => cache.position(&position_id),
                None => cache
                    .positions_open_for_instrument(&cmd.instrument_id, Some(&cmd.strategy_id))
                    .into_iter()
                    .next(),
            };
            match position {
                Some(position) if position.is_open() => position.clone(),
                _ => {
                    log::warn!(
                        "Cannot flatten position: no open position for {} {}",
                        cmd.instrument_id,
                        cmd.strategy_id,
                    );
                    return;
                }
            }
        };

        let ts_now = self.clock.borrow().timestamp_ns();
        let client_order_id = self.generate_client_order_id(cmd.strategy_id);
        let init = OrderInitialized::new(
            cmd.trader_id,
            cmd.strategy_id,
            cmd.instrument_id,
            client_order_id,
            position.closing_order_side(),
            OrderType::Market,
            position.quantity,
            None,
            TimeInForce::Gtc,
            UUID4::new(),
            ts_now,
            ts_now,
        );
        let order = match Order::new_checked(init) {
            Ok(order) => order,
            Err(e) => {
                log::error!("Error initializing flattening order: {e}");
                return;
            }
        };

        log::info!("Flattening {position} with closing order {client_order_id}");
        let submit = SubmitOrder::new(
            cmd.trader_id,
            cmd.client_id,
            cmd.strategy_id,
            order,
            Some(position.id),
            UUID4::new(),
            ts_now,
        );
        self.handle_submit_order(client, submit);
    }

    // -- EVENT HANDLERS --------------------------------------------------------------------------

    /// Processes the given order `event`, applying it through the order state
    /// machine and reconciling position state.
    pub fn process(&mut self, event: &OrderEventAny) {
        if self.config.debug {
            log::debug!("<--[EVT] {event:?}");
        }

        let client_order_id = event.client_order_id();

        // Any venue event for the order resolves its in-flight command
        self.inflight_commands.remove(&client_order_id);

        let cached = self.cache.borrow().order(&client_order_id).cloned();
        let mut order = match cached {
            Some(order) => order,
            None => {
                // Attempt resolution through the venue order ID index
                let resolved = {
                    let cache = self.cache.borrow();
                    event
                        .venue_order_id()
                        .and_then(|venue_order_id| cache.client_order_id(&venue_order_id))
                        .and_then(|resolved_id| cache.order(resolved_id))
                        .cloned()
                };

                match resolved {
                    Some(order) => order,
                    None => {
                        if let OrderEventAny::Initialized(init) = event {
                            self.create_order(*init);
                        } else {
                            log::warn!(
                                "Orphan event: {client_order_id} not found in the cache to apply {event}, dropping",
                            );
                        }
                        return;
                    }
                }
            }
        };

        match event {
            OrderEventAny::Filled(fill) => {
                // Duplicate executions are an idempotent no-op
                if order.trade_ids().contains(&fill.trade_id) {
                    log::debug!("Duplicate {} for {client_order_id} ignored", fill.trade_id);
                    return;
                }

                let mut fill = *fill;
                if fill.position_id.is_none() {
                    fill.position_id = Some(self.determine_position_id(&fill));
                }

                if self.apply_event_to_order(&mut order, OrderEventAny::Filled(fill)) {
                    self.handle_order_fill(fill);
                }
            }
            OrderEventAny::Accepted(_) => {
                if self.apply_event_to_order(&mut order, *event) {
                    // Release any cancel queued while awaiting the venue ack
                    if let Some(cancel) = self.pending_cancels.remove(&client_order_id) {
                        log::info!("Releasing queued {cancel}");
                        self.forward_cancel(cancel);
                    }
                }
            }
            OrderEventAny::Rejected(_) => {
                if self.pending_cancels.remove(&client_order_id).is_some() {
                    // The order never became live so the queued cancel is moot
                    log::debug!("Discarded queued cancel for rejected {client_order_id}");
                }
                self.apply_event_to_order(&mut order, *event);
            }
            _ => {
                self.apply_event_to_order(&mut order, *event);
            }
        }
    }

    /// Processes the given account state `event`, replacing the account
    /// snapshot atomically.
    pub fn process_account(&mut self, event: &AccountState) {
        if self.config.debug {
            log::debug!("<--[EVT] {event:?}");
        }

        let existing = self.cache.borrow().account(&event.account_id).cloned();
        let result = match existing {
            Some(mut account) => {
                account.apply(event.clone());
                self.cache.borrow_mut().update_account(account)
            }
            None => self.cache.borrow_mut().add_account(Account::new(event.clone())),
        };

        if let Err(e) = result {
            log::error!("Error caching account state: {e}");
            return;
        }

        self.publish_to_all(&ExecutionEvent::Account(event.clone()));
    }

    /// Sweeps in-flight commands, emitting a synthetic [`OrderCommandTimeout`]
    /// to the originating strategy for each expired deadline.
    pub fn check_timeouts(&mut self) {
        let now = self.clock.borrow().timestamp_ns();
        let expired: Vec<ClientOrderId> = self
            .inflight_commands
            .iter()
            .filter(|(_, inflight)| inflight.deadline <= now)
            .map(|(client_order_id, _)| *client_order_id)
            .collect();

        for client_order_id in expired {
            let Some(inflight) = self.inflight_commands.remove(&client_order_id) else {
                continue;
            };
            log::warn!(
                "Command timeout: {} {} for {client_order_id} unresolved after {}s",
                inflight.command_kind,
                inflight.command_id,
                self.config.command_timeout_secs,
            );

            let timeout = OrderCommandTimeout {
                trader_id: inflight.trader_id,
                strategy_id: inflight.strategy_id,
                instrument_id: inflight.instrument_id,
                client_order_id,
                command_id: inflight.command_id,
                command_kind: inflight.command_kind,
                event_id: UUID4::new(),
                ts_event: now,
            };
            self.publish(
                inflight.strategy_id,
                &ExecutionEvent::CommandTimeout(timeout),
            );
        }
    }

    /// Returns the earliest in-flight command deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<UnixNanos> {
        self.inflight_commands
            .values()
            .map(|inflight| inflight.deadline)
            .min()
    }

    // -- INTERNAL --------------------------------------------------------------------------------

    fn create_order(&mut self, init: OrderInitialized) {
        let order = match Order::new_checked(init) {
            Ok(order) => order,
            Err(e) => {
                log::error!("Error initializing order from event: {e}");
                return;
            }
        };

        if let Err(e) = self.cache.borrow_mut().add_order(order.clone()) {
            log::error!("Error adding order to cache: {e}");
            return;
        }

        self.publish(
            init.strategy_id,
            &ExecutionEvent::Order(OrderEventAny::Initialized(init)),
        );
    }

    fn apply_event_to_order(&mut self, order: &mut Order, event: OrderEventAny) -> bool {
        if let Err(e) = order.apply(event) {
            match e {
                OrderError::InvalidStateTransition { .. } => {
                    log::warn!("InvalidStateTransition: {e}, did not apply {event}");
                }
                _ => {
                    log::error!("Error applying event: {e}, did not apply {event}");
                }
            }
            return false;
        }

        if let Err(e) = self.cache.borrow_mut().update_order(order) {
            // In-memory state is not rolled back; flag for reconciliation
            log::error!("Error updating order in cache: {e}, flagged for reconciliation");
        }

        self.publish(order.strategy_id, &ExecutionEvent::Order(event));
        true
    }

    fn determine_position_id(&mut self, fill: &OrderFilled) -> PositionId {
        let open_position_id = self
            .cache
            .borrow()
            .positions_open_for_instrument(&fill.instrument_id, Some(&fill.strategy_id))
            .into_iter()
            .next()
            .map(|position| position.id);

        match open_position_id {
            Some(position_id) => position_id,
            None => {
                let position_id = self.pos_id_generator.generate(fill.strategy_id, false);
                if self.config.debug {
                    log::debug!("Generated {position_id} for {}", fill.client_order_id);
                }
                position_id
            }
        }
    }

    fn handle_order_fill(&mut self, fill: OrderFilled) {
        let position_id = fill
            .position_id
            .expect("fill `position_id` should be set before position handling");

        if self.cache.borrow().account(&fill.account_id).is_none() {
            log::warn!(
                "No account found for {} when handling {fill}",
                fill.account_id,
            );
        }

        let ts_init = self.clock.borrow().timestamp_ns();
        let existing = self.cache.borrow().position(&position_id).cloned();

        match existing {
            None => {
                let position = Position::new(fill);
                if let Err(e) = self.cache.borrow_mut().add_position(position.clone()) {
                    log::error!("Error adding position to cache: {e}");
                    return;
                }
                let event = PositionOpened::create(&position, &fill, UUID4::new(), ts_init);
                self.publish(
                    position.strategy_id,
                    &ExecutionEvent::Position(PositionEventAny::Opened(event)),
                );
            }
            Some(mut position) => {
                let was_closed = position.is_closed();
                if let Err(e) = position.apply(&fill) {
                    log::error!("Error applying fill to position: {e}");
                    return;
                }
                if let Err(e) = self.cache.borrow_mut().update_position(&position) {
                    log::error!("Error updating position in cache: {e}, flagged for reconciliation");
                }

                let event = if was_closed {
                    PositionEventAny::Opened(PositionOpened::create(
                        &position,
                        &fill,
                        UUID4::new(),
                        ts_init,
                    ))
                } else if position.is_closed() {
                    PositionEventAny::Closed(PositionClosed::create(
                        &position,
                        &fill,
                        UUID4::new(),
                        ts_init,
                    ))
                } else {
                    PositionEventAny::Changed(PositionChanged::create(
                        &position,
                        &fill,
                        UUID4::new(),
                        ts_init,
                    ))
                };
                self.publish(position.strategy_id, &ExecutionEvent::Position(event));
            }
        }
    }

    fn forward_cancel(&mut self, cancel: CancelOrder) {
        let client = cancel
            .client_id
            .and_then(|client_id| self.clients.get(&client_id))
            .or_else(|| {
                self.routing_map
                    .get(&cancel.instrument_id.venue)
                    .and_then(|client_id| self.clients.get(client_id))
            })
            .or(self.default_client.as_ref())
            .cloned();

        match client {
            Some(client) => {
                if let Err(e) = client.cancel_order(&cancel) {
                    log::error!("Error canceling order: {e}");
                    return;
                }
                self.register_inflight(
                    cancel.trader_id,
                    cancel.strategy_id,
                    cancel.instrument_id,
                    cancel.client_order_id,
                    cancel.command_id,
                    stringify!(CancelOrder),
                );
            }
            None => log::error!("No execution client found for queued {cancel}"),
        }
    }

    fn deny_order(&mut self, order: &mut Order, reason: &str) {
        log::error!("Order denied: {reason}, client_order_id={}", order.client_order_id);

        let ts_now = self.clock.borrow().timestamp_ns();
        let denied = OrderDenied::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            Ustr::from(reason),
            UUID4::new(),
            ts_now,
            ts_now,
        );

        self.apply_event_to_order(order, OrderEventAny::Denied(denied));
    }

    fn register_inflight(
        &mut self,
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        command_id: UUID4,
        command_kind: &'static str,
    ) {
        let deadline = self.clock.borrow().timestamp_ns()
            + self.config.command_timeout_secs * NANOSECONDS_IN_SECOND;
        self.inflight_commands.insert(
            client_order_id,
            InflightCommand {
                trader_id,
                strategy_id,
                instrument_id,
                command_id,
                command_kind,
                deadline,
            },
        );
    }

    fn generate_client_order_id(&mut self, strategy_id: StrategyId) -> ClientOrderId {
        let trader_id = self.trader_id;
        let clock = self.clock.clone();
        self.cl_ord_id_generators
            .entry(strategy_id)
            .or_insert_with(|| ClientOrderIdGenerator::new(trader_id, strategy_id, clock, 0))
            .generate()
    }

    fn set_position_id_counts(&mut self) {
        let cache = self.cache.borrow();
        let positions = cache.positions(None);

        let mut counts: HashMap<StrategyId, usize> = HashMap::new();
        for position in positions {
            *counts.entry(position.strategy_id).or_insert(0) += 1;
        }
        drop(cache);

        self.pos_id_generator.reset();
        for (strategy_id, count) in counts {
            self.pos_id_generator.set_count(count, strategy_id);
            log::info!("Set PositionId count for {strategy_id} to {count}");
        }
    }

    fn publish(&self, strategy_id: StrategyId, event: &ExecutionEvent) {
        if let Some(handlers) = self.subscribers.get(&strategy_id) {
            for handler in handlers {
                handler.on_event(event);
            }
        }
    }

    fn publish_to_all(&self, event: &ExecutionEvent) {
        for handlers in self.subscribers.values() {
            for handler in handlers {
                handler.on_event(event);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod stubs;
#[cfg(test)]
mod tests;
