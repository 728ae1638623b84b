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

//! Represents a trading account, updated from venue account state events.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::{AccountId, InstrumentId},
    types::{AccountBalance, Currency, MarginBalance, Money},
};

/// Represents a trading account.
///
/// Accounts are created on the first [`AccountState`] event for their ID and
/// thereafter updated in place: each event replaces the balance and margin
/// snapshots atomically. The applied event history is retained for audit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// The type of the account.
    pub account_type: AccountType,
    /// The base currency for the account, if applicable.
    pub base_currency: Option<Currency>,
    /// The current per-currency balances.
    pub balances: IndexMap<Currency, AccountBalance>,
    /// The current per-instrument margin snapshots.
    pub margins: IndexMap<InstrumentId, MarginBalance>,
    events: Vec<AccountState>,
}

impl Account {
    /// Creates a new [`Account`] from the given initial state `event`.
    #[must_use]
    pub fn new(event: AccountState) -> Self {
        let mut account = Self {
            id: event.account_id,
            account_type: event.account_type,
            base_currency: event.base_currency,
            balances: IndexMap::new(),
            margins: IndexMap::new(),
            events: Vec::new(),
        };
        account.apply(event);
        account
    }

    /// Applies the given state `event`, replacing the balance and margin
    /// snapshots atomically.
    pub fn apply(&mut self, event: AccountState) {
        self.balances.clear();
        for balance in &event.balances {
            self.balances.insert(balance.currency(), *balance);
        }
        self.margins.clear();
        for margin in &event.margins {
            self.margins.insert(margin.instrument_id, *margin);
        }
        self.base_currency = event.base_currency;
        self.events.push(event);
    }

    /// Returns the current balance for the given `currency` (or the base
    /// currency when `None`).
    #[must_use]
    pub fn balance(&self, currency: Option<Currency>) -> Option<&AccountBalance> {
        let currency = currency.or(self.base_currency)?;
        self.balances.get(&currency)
    }

    /// Returns the current total balance for the given `currency`.
    #[must_use]
    pub fn balance_total(&self, currency: Option<Currency>) -> Option<Money> {
        self.balance(currency).map(|balance| balance.total)
    }

    /// Returns the current free balance for the given `currency`.
    #[must_use]
    pub fn balance_free(&self, currency: Option<Currency>) -> Option<Money> {
        self.balance(currency).map(|balance| balance.free)
    }

    /// Returns the current locked balance for the given `currency`.
    #[must_use]
    pub fn balance_locked(&self, currency: Option<Currency>) -> Option<Money> {
        self.balance(currency).map(|balance| balance.locked)
    }

    /// Returns the current margin snapshot for the given `instrument_id`.
    #[must_use]
    pub fn margin(&self, instrument_id: &InstrumentId) -> Option<&MarginBalance> {
        self.margins.get(instrument_id)
    }

    /// Returns all applied state events, in application order.
    #[must_use]
    pub fn events(&self) -> &[AccountState] {
        &self.events
    }

    /// Returns the last applied state event.
    #[must_use]
    pub fn last_event(&self) -> Option<&AccountState> {
        self.events.last()
    }

    /// Returns the number of applied state events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Display for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(id={}, type={}, base={})",
            stringify!(Account),
            self.id,
            self.account_type,
            self.base_currency
                .map_or("None".to_string(), |currency| format!("{currency}")),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_core::{UUID4, UnixNanos};
    use rstest::rstest;

    use super::*;

    fn state_with_usd(total: &str, locked: &str, free: &str) -> AccountState {
        AccountState::new(
            AccountId::from("SIM-001"),
            AccountType::Cash,
            Some(Currency::USD()),
            vec![AccountBalance::new(
                Money::from(total),
                Money::from(locked),
                Money::from(free),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
        )
    }

    #[rstest]
    fn test_new_from_event() {
        let account = Account::new(state_with_usd("100.00 USD", "0.00 USD", "100.00 USD"));
        assert_eq!(account.id, AccountId::from("SIM-001"));
        assert_eq!(account.account_type, AccountType::Cash);
        assert_eq!(
            account.balance_total(None),
            Some(Money::from("100.00 USD"))
        );
        assert_eq!(account.event_count(), 1);
    }

    #[rstest]
    fn test_apply_replaces_snapshot() {
        let mut account = Account::new(state_with_usd("100.00 USD", "0.00 USD", "100.00 USD"));
        account.apply(state_with_usd("250.00 USD", "50.00 USD", "200.00 USD"));

        assert_eq!(account.balance_total(None), Some(Money::from("250.00 USD")));
        assert_eq!(account.balance_locked(None), Some(Money::from("50.00 USD")));
        assert_eq!(account.balance_free(None), Some(Money::from("200.00 USD")));
        assert_eq!(account.event_count(), 2);
    }

    #[rstest]
    fn test_balance_unknown_currency() {
        let account = Account::new(state_with_usd("100.00 USD", "0.00 USD", "100.00 USD"));
        assert!(account.balance(Some(Currency::BTC())).is_none());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let account = Account::new(state_with_usd("100.00 USD", "0.00 USD", "100.00 USD"));
        let json = serde_json::to_string(&account).unwrap();
        let deserialized: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, account);
        assert_eq!(deserialized.balances, account.balances);
    }
}
