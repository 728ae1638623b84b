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

//! Trading command messages for the execution engine.

use std::fmt::{Display, Formatter};

use meridian_core::{UUID4, UnixNanos};
use meridian_model::identifiers::{ClientId, InstrumentId, StrategyId, TraderId};

pub mod amend;
pub mod cancel;
pub mod flatten;
pub mod submit;
pub mod timeout;

// Re-exports
pub use crate::messages::{
    amend::AmendOrder, cancel::CancelOrder, flatten::FlattenPosition, submit::SubmitOrder,
    timeout::OrderCommandTimeout,
};

/// Wraps a trading command allowing polymorphism over the tagged sum.
#[derive(Clone, Debug)]
pub enum TradingCommand {
    SubmitOrder(SubmitOrder),
    CancelOrder(CancelOrder),
    AmendOrder(AmendOrder),
    FlattenPosition(FlattenPosition),
}

impl TradingCommand {
    /// Returns the kind of the command as a string slice.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SubmitOrder(_) => stringify!(SubmitOrder),
            Self::CancelOrder(_) => stringify!(CancelOrder),
            Self::AmendOrder(_) => stringify!(AmendOrder),
            Self::FlattenPosition(_) => stringify!(FlattenPosition),
        }
    }

    /// Returns the trader ID associated with the command.
    #[must_use]
    pub fn trader_id(&self) -> TraderId {
        match self {
            Self::SubmitOrder(cmd) => cmd.trader_id,
            Self::CancelOrder(cmd) => cmd.trader_id,
            Self::AmendOrder(cmd) => cmd.trader_id,
            Self::FlattenPosition(cmd) => cmd.trader_id,
        }
    }

    /// Returns the client ID associated with the command, if explicitly routed.
    #[must_use]
    pub fn client_id(&self) -> Option<ClientId> {
        match self {
            Self::SubmitOrder(cmd) => cmd.client_id,
            Self::CancelOrder(cmd) => cmd.client_id,
            Self::AmendOrder(cmd) => cmd.client_id,
            Self::FlattenPosition(cmd) => cmd.client_id,
        }
    }

    /// Returns the strategy ID associated with the command.
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::SubmitOrder(cmd) => cmd.strategy_id,
            Self::CancelOrder(cmd) => cmd.strategy_id,
            Self::AmendOrder(cmd) => cmd.strategy_id,
            Self::FlattenPosition(cmd) => cmd.strategy_id,
        }
    }

    /// Returns the instrument ID associated with the command.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::SubmitOrder(cmd) => cmd.instrument_id,
            Self::CancelOrder(cmd) => cmd.instrument_id,
            Self::AmendOrder(cmd) => cmd.instrument_id,
            Self::FlattenPosition(cmd) => cmd.instrument_id,
        }
    }

    /// Returns the unique identifier for the command.
    #[must_use]
    pub fn command_id(&self) -> UUID4 {
        match self {
            Self::SubmitOrder(cmd) => cmd.command_id,
            Self::CancelOrder(cmd) => cmd.command_id,
            Self::AmendOrder(cmd) => cmd.command_id,
            Self::FlattenPosition(cmd) => cmd.command_id,
        }
    }

    /// Returns the UNIX timestamp (nanoseconds) when the command was initialized.
    #[must_use]
    pub fn ts_init(&self) -> UnixNanos {
        match self {
            Self::SubmitOrder(cmd) => cmd.ts_init,
            Self::CancelOrder(cmd) => cmd.ts_init,
            Self::AmendOrder(cmd) => cmd.ts_init,
            Self::FlattenPosition(cmd) => cmd.ts_init,
        }
    }
}

impl Display for TradingCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmitOrder(cmd) => write!(f, "{cmd}"),
            Self::CancelOrder(cmd) => write!(f, "{cmd}"),
            Self::AmendOrder(cmd) => write!(f, "{cmd}"),
            Self::FlattenPosition(cmd) => write!(f, "{cmd}"),
        }
    }
}
