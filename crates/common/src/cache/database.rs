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

//! Provides a `Cache` database backing.

use ahash::AHashMap;
use bytes::Bytes;
use meridian_model::{
    accounts::Account,
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId},
    orders::Order,
    position::Position,
};

/// A loaded snapshot of all persisted records.
#[derive(Debug, Default)]
pub struct CacheMap {
    pub accounts: AHashMap<AccountId, Account>,
    pub orders: AHashMap<ClientOrderId, Order>,
    pub positions: AHashMap<PositionId, Position>,
}

/// A backing database adapter for a `Cache`.
///
/// Implementations serialize each record individually and must keep the
/// persistent working-orders and open-positions index sets consistent with the
/// records they store. The in-memory cache remains authoritative in
/// single-process deployments; the adapter is the durable mirror.
#[async_trait::async_trait]
pub trait CacheDatabaseAdapter: Send {
    /// Closes the database connection, flushing any pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database fails to close properly.
    fn close(&mut self) -> anyhow::Result<()>;

    /// Removes all persisted records (test and recovery only).
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the database fails.
    fn flush(&mut self) -> anyhow::Result<()>;

    /// Loads all persisted records into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if loading records from the database fails.
    async fn load_all(&self) -> anyhow::Result<CacheMap>;

    /// Loads all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if loading accounts fails.
    async fn load_accounts(&self) -> anyhow::Result<AHashMap<AccountId, Account>>;

    /// Loads all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if loading orders fails.
    async fn load_orders(&self) -> anyhow::Result<AHashMap<ClientOrderId, Order>>;

    /// Loads all positions.
    ///
    /// # Errors
    ///
    /// Returns an error if loading positions fails.
    async fn load_positions(&self) -> anyhow::Result<AHashMap<PositionId, Position>>;

    /// Loads a single account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the account fails.
    async fn load_account(&self, account_id: &AccountId) -> anyhow::Result<Option<Account>>;

    /// Loads a single order by client order ID.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the order fails.
    async fn load_order(&self, client_order_id: &ClientOrderId) -> anyhow::Result<Option<Order>>;

    /// Loads a single position by position ID.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the position fails.
    async fn load_position(&self, position_id: &PositionId) -> anyhow::Result<Option<Position>>;

    /// Loads persisted strategy state by strategy ID.
    ///
    /// # Errors
    ///
    /// Returns an error if loading strategy state fails.
    fn load_strategy(&self, strategy_id: &StrategyId) -> anyhow::Result<AHashMap<String, Bytes>>;

    /// Adds an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if adding the account fails.
    fn add_account(&self, account: &Account) -> anyhow::Result<()>;

    /// Adds an order record.
    ///
    /// # Errors
    ///
    /// Returns an error if adding the order fails.
    fn add_order(&self, order: &Order) -> anyhow::Result<()>;

    /// Adds a position record.
    ///
    /// # Errors
    ///
    /// Returns an error if adding the position fails.
    fn add_position(&self, position: &Position) -> anyhow::Result<()>;

    /// Updates an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if updating the account fails.
    fn update_account(&self, account: &Account) -> anyhow::Result<()>;

    /// Updates an order record, refreshing the working-orders index.
    ///
    /// # Errors
    ///
    /// Returns an error if updating the order fails.
    fn update_order(&self, order: &Order) -> anyhow::Result<()>;

    /// Updates a position record, refreshing the open-positions index.
    ///
    /// # Errors
    ///
    /// Returns an error if updating the position fails.
    fn update_position(&self, position: &Position) -> anyhow::Result<()>;

    /// Updates persisted strategy state.
    ///
    /// # Errors
    ///
    /// Returns an error if updating strategy state fails.
    fn update_strategy(
        &self,
        strategy_id: &StrategyId,
        state: &AHashMap<String, Bytes>,
    ) -> anyhow::Result<()>;

    /// Deletes persisted strategy state.
    ///
    /// # Errors
    ///
    /// Returns an error if deleting strategy state fails.
    fn delete_strategy(&self, strategy_id: &StrategyId) -> anyhow::Result<()>;
}
