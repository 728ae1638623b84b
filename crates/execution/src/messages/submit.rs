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
use meridian_model::{
    identifiers::{ClientId, ClientOrderId, InstrumentId, PositionId, StrategyId, TraderId},
    orders::Order,
};

/// A command to submit the given order to its venue.
#[derive(Clone, Debug)]
pub struct SubmitOrder {
    /// The trader ID associated with the command.
    pub trader_id: TraderId,
    /// The execution client ID to route to, if explicitly routed.
    pub client_id: Option<ClientId>,
    /// The strategy ID associated with the command.
    pub strategy_id: StrategyId,
    /// The instrument ID associated with the command.
    pub instrument_id: InstrumentId,
    /// The client order ID of the order to submit.
    pub client_order_id: ClientOrderId,
    /// The order to submit.
    pub order: Order,
    /// The position ID to associate the order with, if targeted.
    pub position_id: Option<PositionId>,
    /// The unique identifier for the command.
    pub command_id: UUID4,
    /// UNIX timestamp (nanoseconds) when the command was initialized.
    pub ts_init: UnixNanos,
}

impl SubmitOrder {
    /// Creates a new [`SubmitOrder`] command for the given `order`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        client_id: Option<ClientId>,
        strategy_id: StrategyId,
        order: Order,
        position_id: Option<PositionId>,
        command_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id,
            client_id,
            strategy_id,
            instrument_id: order.instrument_id,
            client_order_id: order.client_order_id,
            order,
            position_id,
            command_id,
            ts_init,
        }
    }
}

impl Display for SubmitOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, client_order_id={}, position_id={})",
            stringify!(SubmitOrder),
            self.instrument_id,
            self.client_order_id,
            self.position_id
                .map_or("None".to_string(), |position_id| format!("{position_id}")),
        )
    }
}
