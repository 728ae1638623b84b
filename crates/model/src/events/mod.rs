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

//! Events for the trading domain model.
//!
//! Events drive all entity state: orders apply order events, accounts apply
//! account state snapshots, and position events are derived by the execution
//! engine from fills. Every event carries a unique `event_id` and both the
//! occurrence (`ts_event`) and initialization (`ts_init`) timestamps.

pub mod account;
pub mod order;
pub mod position;

// Re-exports
pub use crate::events::{
    account::state::AccountState,
    order::{
        accepted::OrderAccepted, amended::OrderAmended, any::OrderEventAny,
        canceled::OrderCanceled, denied::OrderDenied, expired::OrderExpired, filled::OrderFilled,
        initialized::OrderInitialized, rejected::OrderRejected, submitted::OrderSubmitted,
        working::OrderWorking,
    },
    position::{PositionChanged, PositionClosed, PositionEventAny, PositionOpened},
};
