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
use meridian_model::identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId};

/// A synthetic notification that a trading command was not acknowledged by the
/// venue within its timeout.
///
/// Emitted by the engine to the originating strategy; the command is marked
/// unresolved and order state is never speculatively mutated.
#[derive(Clone, Copy, Debug)]
pub struct OrderCommandTimeout {
    /// The trader ID associated with the event.
    pub trader_id: TraderId,
    /// The strategy ID associated with the event.
    pub strategy_id: StrategyId,
    /// The instrument ID associated with the event.
    pub instrument_id: InstrumentId,
    /// The client order ID the unresolved command targeted.
    pub client_order_id: ClientOrderId,
    /// The unique identifier of the unresolved command.
    pub command_id: UUID4,
    /// The kind of the unresolved command.
    pub command_kind: &'static str,
    /// The unique identifier for the event.
    pub event_id: UUID4,
    /// UNIX timestamp (nanoseconds) when the timeout fired.
    pub ts_event: UnixNanos,
}

impl Display for OrderCommandTimeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, client_order_id={}, command_kind={}, command_id={}, ts_event={})",
            stringify!(OrderCommandTimeout),
            self.instrument_id,
            self.client_order_id,
            self.command_kind,
            self.command_id,
            self.ts_event,
        )
    }
}
