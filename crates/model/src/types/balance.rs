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

//! Account balance types for a single currency denomination.

use std::fmt::{Display, Formatter};

use meridian_core::correctness::FAILED;
use serde::{Deserialize, Serialize};

use crate::{identifiers::InstrumentId, types::{Currency, Money}};

/// Represents an account balance denominated in a particular currency.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The total account balance.
    pub total: Money,
    /// The account balance locked (assigned to pending orders).
    pub locked: Money,
    /// The account balance free for trading.
    pub free: Money,
}

impl AccountBalance {
    /// Creates a new [`AccountBalance`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If the currencies of `total`, `locked` and `free` are not equal.
    /// - If `total` is not the sum of `locked` and `free`.
    pub fn new_checked(total: Money, locked: Money, free: Money) -> anyhow::Result<Self> {
        if total.currency != locked.currency || total.currency != free.currency {
            anyhow::bail!(
                "balance currency mismatch: total {}, locked {}, free {}",
                total.currency,
                locked.currency,
                free.currency,
            )
        }
        if total.raw != locked.raw + free.raw {
            anyhow::bail!(
                "balance inconsistency: total {total} was not equal to locked {locked} + free {free}"
            )
        }
        Ok(Self {
            total,
            locked,
            free,
        })
    }

    /// Creates a new [`AccountBalance`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`AccountBalance::new_checked`]).
    #[must_use]
    pub fn new(total: Money, locked: Money, free: Money) -> Self {
        Self::new_checked(total, locked, free).expect(FAILED)
    }

    /// Returns the currency of the balance.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.total.currency
    }
}

impl Display for AccountBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(total={}, locked={}, free={})",
            stringify!(AccountBalance),
            self.total,
            self.locked,
            self.free,
        )
    }
}

/// Represents a margin balance for an instrument, denominated in a particular
/// currency.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBalance {
    /// The initial (order) margin requirement.
    pub initial: Money,
    /// The maintenance (position) margin requirement.
    pub maintenance: Money,
    /// The instrument ID the margin is for.
    pub instrument_id: InstrumentId,
}

impl MarginBalance {
    /// Creates a new [`MarginBalance`] instance.
    ///
    /// # Panics
    ///
    /// Panics if the currencies of `initial` and `maintenance` are not equal.
    #[must_use]
    pub fn new(initial: Money, maintenance: Money, instrument_id: InstrumentId) -> Self {
        assert_eq!(
            initial.currency, maintenance.currency,
            "margin balance currencies must match"
        );
        Self {
            initial,
            maintenance,
            instrument_id,
        }
    }

    /// Returns the currency of the margin balance.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.initial.currency
    }
}

impl Display for MarginBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(initial={}, maintenance={}, instrument_id={})",
            stringify!(MarginBalance),
            self.initial,
            self.maintenance,
            self.instrument_id,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_account_balance_display() {
        let balance = AccountBalance::new(
            Money::from("1525000.00 USD"),
            Money::from("25000.00 USD"),
            Money::from("1500000.00 USD"),
        );
        assert_eq!(
            format!("{balance}"),
            "AccountBalance(total=1525000.00 USD, locked=25000.00 USD, free=1500000.00 USD)"
        );
        assert_eq!(balance.currency(), Currency::USD());
    }

    #[rstest]
    fn test_account_balance_inconsistent_sum() {
        let result = AccountBalance::new_checked(
            Money::from("100.00 USD"),
            Money::from("1.00 USD"),
            Money::from("1.00 USD"),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_account_balance_currency_mismatch() {
        let result = AccountBalance::new_checked(
            Money::from("2.00 USD"),
            Money::from("1.00000000 BTC"),
            Money::from("1.00 USD"),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_margin_balance_display() {
        let margin = MarginBalance::new(
            Money::from("5000.00 USD"),
            Money::from("20000.00 USD"),
            InstrumentId::from("ETH-PERP.DERIBIT"),
        );
        assert_eq!(
            format!("{margin}"),
            "MarginBalance(initial=5000.00 USD, maintenance=20000.00 USD, instrument_id=ETH-PERP.DERIBIT)"
        );
    }

    #[rstest]
    fn test_serde_round_trip() {
        let balance = AccountBalance::new(
            Money::from("100.00 USD"),
            Money::from("40.00 USD"),
            Money::from("60.00 USD"),
        );
        let json = serde_json::to_string(&balance).unwrap();
        let deserialized: AccountBalance = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, balance);
    }
}
