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

//! Execution engine and components for the Meridian trading engine.
//!
//! The execution engine is the single writer of all core trading state. It
//! validates and routes trading commands from strategies to execution clients,
//! reconciles order and position state from the venue event stream, and
//! publishes every applied event to its registered strategy subscribers.

pub mod client;
pub mod engine;
pub mod messages;
pub mod runner;
