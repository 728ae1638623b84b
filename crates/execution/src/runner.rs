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

//! The single-threaded cooperative ingress loop for the execution engine.
//!
//! The engine runs as a synchronous consumer of two queues: trading commands
//! from strategies and events from execution clients. Producers enqueue from
//! any thread through the cloneable channel senders; all state mutation
//! happens on the thread driving [`run`]. Per-queue FIFO ordering is
//! preserved; no ordering is promised across the two queues.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, select, unbounded};
use meridian_model::events::{AccountState, OrderEventAny};

use crate::{engine::ExecutionEngine, messages::TradingCommand};

const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// A message on the engine's event ingress queue.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// An order event from an execution client.
    Order(OrderEventAny),
    /// An account state event from an execution client.
    Account(AccountState),
}

/// The channel endpoints feeding an engine ingress loop.
pub struct ExecutionQueues {
    /// The producer for trading commands (clone per strategy thread).
    pub command_tx: Sender<TradingCommand>,
    /// The producer for venue events (clone per execution client).
    pub event_tx: Sender<EngineEvent>,
    /// The producer for the shutdown signal.
    pub signal_tx: Sender<()>,
    command_rx: Receiver<TradingCommand>,
    event_rx: Receiver<EngineEvent>,
    signal_rx: Receiver<()>,
}

impl ExecutionQueues {
    /// Creates a new set of unbounded engine ingress queues.
    #[must_use]
    pub fn new() -> Self {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let (signal_tx, signal_rx) = unbounded();
        Self {
            command_tx,
            event_tx,
            signal_tx,
            command_rx,
            event_rx,
            signal_rx,
        }
    }
}

impl Default for ExecutionQueues {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the engine ingress loop on the calling thread until a shutdown signal
/// arrives or every producer has disconnected.
///
/// The loop blocks on the queues with a bounded timeout so that in-flight
/// command deadlines are swept promptly even while the queues are idle.
pub fn run(mut engine: ExecutionEngine, queues: &ExecutionQueues) {
    log::info!("Execution engine ingress loop starting");

    loop {
        let timeout = next_wakeup(&engine);

        select! {
            recv(queues.command_rx) -> msg => match msg {
                Ok(command) => engine.execute(command),
                Err(_) => {
                    log::debug!("Command channel disconnected");
                    break;
                }
            },
            recv(queues.event_rx) -> msg => match msg {
                Ok(EngineEvent::Order(event)) => engine.process(&event),
                Ok(EngineEvent::Account(event)) => engine.process_account(&event),
                Err(_) => {
                    log::debug!("Event channel disconnected");
                    break;
                }
            },
            recv(queues.signal_rx) -> _ => {
                log::info!("Shutdown signal received");
                break;
            }
            default(timeout) => {}
        }

        engine.check_timeouts();
    }

    log::info!("Execution engine ingress loop stopped");
}

/// Drains both queues without blocking, applying everything currently
/// enqueued, then sweeps command deadlines. Intended for deterministic
/// single-threaded drivers (e.g. backtests and tests).
pub fn drain(engine: &mut ExecutionEngine, queues: &ExecutionQueues) {
    loop {
        match queues.command_rx.recv_timeout(Duration::ZERO) {
            Ok(command) => engine.execute(command),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
        }
    }
    loop {
        match queues.event_rx.recv_timeout(Duration::ZERO) {
            Ok(EngineEvent::Order(event)) => engine.process(&event),
            Ok(EngineEvent::Account(event)) => engine.process_account(&event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
        }
    }
    engine.check_timeouts();
}

fn next_wakeup(engine: &ExecutionEngine) -> Duration {
    // Poll faster while a command deadline is outstanding
    if engine.next_deadline().is_some() {
        Duration::from_millis(10)
    } else {
        DEFAULT_TICK
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_queues_fan_in() {
        let queues = ExecutionQueues::new();
        let command_tx = queues.command_tx.clone();
        let event_tx = queues.event_tx.clone();

        drop(command_tx);
        drop(event_tx);

        // The original endpoints remain usable after producer clones drop
        assert!(queues.signal_tx.send(()).is_ok());
        assert!(queues.signal_rx.try_recv().is_ok());
    }
}
