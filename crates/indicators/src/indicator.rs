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

//! A common `Indicator` trait.

use std::fmt::Debug;

use meridian_core::UnixNanos;
use meridian_model::types::Price;

const IMPL_ERR: &str = "is not implemented for";

/// A stateful value derived from a stream of timestamped price inputs.
#[allow(unused_variables)]
pub trait Indicator {
    /// Returns the name of the indicator.
    fn name(&self) -> String;

    /// Returns whether the indicator has received any inputs.
    fn has_inputs(&self) -> bool;

    /// Returns whether the indicator is warmed up and producing values.
    fn initialized(&self) -> bool;

    /// Updates the indicator with the given timestamped price.
    fn handle_price(&mut self, ts: UnixNanos, price: Price) {
        panic!("`handle_price` {IMPL_ERR} `{}`", self.name());
    }

    /// Resets the indicator, clearing all accumulated state.
    fn reset(&mut self);
}

impl Debug for dyn Indicator + Send {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Indicator({})", self.name())
    }
}
