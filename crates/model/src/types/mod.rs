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

//! Value types for the trading domain model.
//!
//! Monetary values carry a fixed decimal precision and compare by canonical
//! integer representation; arithmetic across differing precisions fails with
//! [`PrecisionError::PrecisionMismatch`]. Floating point never participates in
//! equality checks.

pub mod balance;
pub mod currency;
pub mod fixed;
pub mod money;
pub mod price;
pub mod quantity;

// Re-exports
pub use crate::types::{
    balance::{AccountBalance, MarginBalance},
    currency::Currency,
    fixed::{FIXED_PRECISION, FIXED_SCALAR, PrecisionError},
    money::Money,
    price::Price,
    quantity::Quantity,
};
