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

//! Position events, derived by the execution engine from applied fills.

pub mod changed;
pub mod closed;
pub mod opened;

use serde::{Deserialize, Serialize};

pub use crate::events::position::{
    changed::PositionChanged, closed::PositionClosed, opened::PositionOpened,
};
use crate::identifiers::{PositionId, StrategyId};

/// Wraps a position event allowing polymorphism over the tagged sum.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum PositionEventAny {
    Opened(PositionOpened),
    Changed(PositionChanged),
    Closed(PositionClosed),
}

impl PositionEventAny {
    /// Returns the position ID associated with the event.
    #[must_use]
    pub fn position_id(&self) -> PositionId {
        match self {
            Self::Opened(event) => event.position_id,
            Self::Changed(event) => event.position_id,
            Self::Closed(event) => event.position_id,
        }
    }

    /// Returns the strategy ID associated with the event.
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Opened(event) => event.strategy_id,
            Self::Changed(event) => event.strategy_id,
            Self::Closed(event) => event.strategy_id,
        }
    }
}
