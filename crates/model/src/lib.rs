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

//! Domain model for the Meridian trading engine.
//!
//! The model crate defines the value and identifier types, the order lifecycle
//! state machine, positions, accounts, and the events which drive them. All
//! entities are driven exclusively by events: the only way to mutate an
//! [`orders::Order`] is to apply an [`events::OrderEventAny`] to it.

pub mod accounts;
pub mod enums;
pub mod events;
pub mod identifiers;
pub mod orders;
pub mod position;
pub mod types;
