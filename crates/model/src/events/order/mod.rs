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

//! Order lifecycle events, as received from trading venues or generated by the
//! system.

pub mod accepted;
pub mod amended;
pub mod any;
pub mod canceled;
pub mod denied;
pub mod expired;
pub mod filled;
pub mod initialized;
pub mod rejected;
pub mod submitted;
pub mod working;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

/// Represents a type of order event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderEventType {
    Initialized,
    Denied,
    Submitted,
    Accepted,
    Rejected,
    Working,
    Amended,
    Canceled,
    Expired,
    Filled,
}
