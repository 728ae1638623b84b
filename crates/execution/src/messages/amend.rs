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
    identifiers::{ClientId, ClientOrderId, InstrumentId, StrategyId, TraderId, VenueOrderId},
    types::{Price, Quantity},
};

/// A command to amend the quantity and/or working price of the given order at
/// its venue.
///
/// Not supported for MARKET orders.
#[derive(Clone, Debug)]
pub struct AmendOrder {
    /// The trader ID associated with the command.
    pub trader_id: TraderId,
    /// The execution client ID to route to, if explicitly routed.
    pub client_id: Option<ClientId>,
    /// The strategy ID associated with the command.
    pub strategy_id: StrategyId,
    /// The instrument ID associated with the command.
    pub instrument_id: InstrumentId,
    /// The client order ID of the order to amend.
    pub client_order_id: ClientOrderId,
    /// The venue order ID of the order to amend, if known.
    pub venue_order_id: Option<VenueOrderId>,
    /// The amendment quantity, if changing.
    pub quantity: Option<Quantity>,
    /// The amendment price, if changing.
    pub price: Option<Price>,
    /// The unique identifier for the command.
    pub command_id: UUID4,
    /// UNIX timestamp (nanoseconds) when the command was initialized.
    pub ts_init: UnixNanos,
}

impl AmendOrder {
    /// Creates a new [`AmendOrder`] command.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        client_id: Option<ClientId>,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        venue_order_id: Option<VenueOrderId>,
        quantity: Option<Quantity>,
        price: Option<Price>,
        command_id: UUID4,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id,
            client_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id,
            quantity,
            price,
            command_id,
            ts_init,
        }
    }
}

impl Display for AmendOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, client_order_id={}, quantity={}, price={})",
            stringify!(AmendOrder),
            self.instrument_id,
            self.client_order_id,
            self.quantity
                .map_or("None".to_string(), |quantity| format!("{quantity}")),
            self.price.map_or("None".to_string(), |price| format!("{price}")),
        )
    }
}
