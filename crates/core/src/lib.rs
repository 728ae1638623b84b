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

//! Core functionality for the Meridian trading engine.
//!
//! Provides the foundational value types shared by every other crate in the
//! workspace: nanosecond UTC timestamps, UUID v4 identifiers, datetime helpers,
//! and *design by contract* correctness checks.

pub mod correctness;
pub mod datetime;
pub mod nanos;
pub mod uuid;

// Re-exports
pub use crate::{
    nanos::{DurationNanos, UnixNanos},
    uuid::UUID4,
};
