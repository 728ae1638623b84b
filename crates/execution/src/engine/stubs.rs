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

//! Execution engine stubs for testing.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use meridian_common::{cache::Cache, clock::TestClock};
use meridian_model::identifiers::{AccountId, ClientId, TraderId, Venue};

use crate::{
    client::ExecutionClient,
    engine::{ExecutionEngine, ExecutionEngineConfig, ExecutionEvent, ExecutionEventHandler},
    messages::{AmendOrder, CancelOrder, SubmitOrder, TradingCommand},
};

/// A recording execution client which accepts every command.
pub struct StubExecutionClient {
    pub commands: RefCell<Vec<TradingCommand>>,
    pub fail_submit: Cell<bool>,
    connected: Cell<bool>,
}

impl StubExecutionClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            fail_submit: Cell::new(false),
            connected: Cell::new(true),
        }
    }

    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.borrow().len()
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|command| matches!(command, TradingCommand::CancelOrder(_)))
            .count()
    }

    #[must_use]
    pub fn amend_count(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|command| matches!(command, TradingCommand::AmendOrder(_)))
            .count()
    }

    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|command| matches!(command, TradingCommand::SubmitOrder(_)))
            .count()
    }
}

impl Default for StubExecutionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionClient for StubExecutionClient {
    fn client_id(&self) -> ClientId {
        ClientId::new("STUB")
    }

    fn account_id(&self) -> AccountId {
        AccountId::default() // SIM-001
    }

    fn venue(&self) -> Venue {
        Venue::new("DERIBIT")
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn start(&self) -> anyhow::Result<()> {
        self.connected.set(true);
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        self.connected.set(false);
        Ok(())
    }

    fn submit_order(&self, cmd: &SubmitOrder) -> anyhow::Result<()> {
        if self.fail_submit.get() {
            anyhow::bail!("venue unavailable")
        }
        self.commands
            .borrow_mut()
            .push(TradingCommand::SubmitOrder(cmd.clone()));
        Ok(())
    }

    fn amend_order(&self, cmd: &AmendOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(TradingCommand::AmendOrder(cmd.clone()));
        Ok(())
    }

    fn cancel_order(&self, cmd: &CancelOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(TradingCommand::CancelOrder(cmd.clone()));
        Ok(())
    }
}

/// A recording strategy subscriber.
pub struct RecordingHandler {
    pub events: RefCell<Vec<ExecutionEvent>>,
}

impl RecordingHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|event| match event {
                ExecutionEvent::Order(event) => event.kind().to_string(),
                ExecutionEvent::Position(event) => match event {
                    meridian_model::events::PositionEventAny::Opened(_) => {
                        "PositionOpened".to_string()
                    }
                    meridian_model::events::PositionEventAny::Changed(_) => {
                        "PositionChanged".to_string()
                    }
                    meridian_model::events::PositionEventAny::Closed(_) => {
                        "PositionClosed".to_string()
                    }
                },
                ExecutionEvent::Account(_) => "AccountState".to_string(),
                ExecutionEvent::CommandTimeout(_) => "OrderCommandTimeout".to_string(),
            })
            .collect()
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEventHandler for RecordingHandler {
    fn on_event(&self, event: &ExecutionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// An assembled engine test rig: engine, shared clock, stub client and a
/// recording subscriber for the default strategy.
pub struct TestEngine {
    pub engine: ExecutionEngine,
    pub clock: Rc<RefCell<TestClock>>,
    pub cache: Rc<RefCell<Cache>>,
    pub client: Rc<StubExecutionClient>,
    pub handler: Rc<RecordingHandler>,
}

impl TestEngine {
    #[must_use]
    pub fn new() -> Self {
        let clock = Rc::new(RefCell::new(TestClock::new()));
        let cache = Rc::new(RefCell::new(Cache::default()));
        let client = Rc::new(StubExecutionClient::new());
        let handler = Rc::new(RecordingHandler::new());

        let mut engine = ExecutionEngine::new(
            TraderId::default(),
            clock.clone(),
            cache.clone(),
            Some(ExecutionEngineConfig::default()),
        );
        engine
            .register_client(client.clone())
            .expect("client registration should succeed");
        engine.register_subscriber(
            meridian_model::identifiers::StrategyId::default(),
            handler.clone(),
        );

        Self {
            engine,
            clock,
            cache,
            client,
            handler,
        }
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
