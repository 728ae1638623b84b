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

//! A common in-memory `Cache` for execution related data.
//!
//! The cache is the uniform execution database contract: the authoritative
//! in-memory store of all live accounts, orders and positions together with
//! their secondary indices, optionally mirrored to a persistent
//! [`CacheDatabaseAdapter`] backing. Entities are retained after reaching a
//! terminal or flat state for audit.

pub mod config;
pub mod database;
pub mod index;

#[cfg(test)]
mod tests;

use ahash::AHashMap;
use bytes::Bytes;
use meridian_model::{
    accounts::Account,
    identifiers::{AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, Venue, VenueOrderId},
    orders::Order,
    position::Position,
};
use thiserror::Error;

pub use crate::cache::{
    config::{CacheConfig, DatabaseConfig},
    database::{CacheDatabaseAdapter, CacheMap},
    index::CacheIndex,
};

/// An error within cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A record with the key already exists.
    #[error("Already exists: {key}")]
    AlreadyExists {
        /// The offending record key.
        key: String,
    },
    /// No record with the key exists.
    #[error("Not found: {key}")]
    NotFound {
        /// The missing record key.
        key: String,
    },
    /// The backing database failed.
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// A common in-memory `Cache` for execution related data.
pub struct Cache {
    config: CacheConfig,
    index: CacheIndex,
    database: Option<Box<dyn CacheDatabaseAdapter>>,
    accounts: AHashMap<AccountId, Account>,
    orders: AHashMap<ClientOrderId, Order>,
    positions: AHashMap<PositionId, Position>,
    strategy_state: AHashMap<StrategyId, AHashMap<String, Bytes>>,
}

impl Default for Cache {
    /// Creates a new default [`Cache`] instance (in-memory only).
    fn default() -> Self {
        Self::new(Some(CacheConfig::default()), None)
    }
}

impl Cache {
    /// Creates a new [`Cache`] instance.
    #[must_use]
    pub fn new(
        config: Option<CacheConfig>,
        database: Option<Box<dyn CacheDatabaseAdapter>>,
    ) -> Self {
        Self {
            config: config.unwrap_or_default(),
            index: CacheIndex::default(),
            database,
            accounts: AHashMap::new(),
            orders: AHashMap::new(),
            positions: AHashMap::new(),
            strategy_state: AHashMap::new(),
        }
    }

    /// Returns whether the cache has a persistent database backing.
    #[must_use]
    pub fn has_backing(&self) -> bool {
        self.database.is_some()
    }

    // -- COMMANDS --------------------------------------------------------------------------------

    /// Loads all records (accounts, orders, positions) from the backing database.
    ///
    /// # Errors
    ///
    /// Returns an error if loading from the database fails.
    pub async fn cache_all(&mut self) -> Result<(), CacheError> {
        let cache_map = match &self.database {
            Some(database) => database.load_all().await?,
            None => CacheMap::default(),
        };

        log::info!(
            "Cached {} account(s), {} order(s), {} position(s) from database",
            cache_map.accounts.len(),
            cache_map.orders.len(),
            cache_map.positions.len(),
        );

        self.accounts = cache_map.accounts;
        self.orders = cache_map.orders;
        self.positions = cache_map.positions;
        Ok(())
    }

    /// Clears the current cache index.
    pub fn clear_index(&mut self) {
        self.index.clear();
        log::debug!("Cleared index");
    }

    /// Clears the current cache index and rebuilds it from cached state.
    pub fn build_index(&mut self) {
        log::debug!("Building index");
        self.index.clear();

        for account_id in self.accounts.keys() {
            self.index
                .venue_account
                .insert(account_id.get_issuer(), *account_id);
        }

        for (client_order_id, order) in &self.orders {
            let instrument_id = order.instrument_id;
            let strategy_id = order.strategy_id;

            self.index.orders.insert(*client_order_id);
            self.index.order_strategy.insert(*client_order_id, strategy_id);
            self.index.strategies.insert(strategy_id);
            self.index
                .venue_orders
                .entry(instrument_id.venue)
                .or_default()
                .insert(*client_order_id);
            self.index
                .instrument_orders
                .entry(instrument_id)
                .or_default()
                .insert(*client_order_id);
            self.index
                .strategy_orders
                .entry(strategy_id)
                .or_default()
                .insert(*client_order_id);

            if let Some(venue_order_id) = order.venue_order_id {
                self.index
                    .venue_order_ids
                    .insert(venue_order_id, *client_order_id);
                self.index
                    .client_order_ids
                    .insert(*client_order_id, venue_order_id);
            }
            if let Some(position_id) = order.position_id {
                self.index.order_position.insert(*client_order_id, position_id);
            }

            if order.is_open() {
                self.index.orders_open.insert(*client_order_id);
            } else {
                self.index.orders_closed.insert(*client_order_id);
            }
            if order.is_inflight() {
                self.index.orders_inflight.insert(*client_order_id);
            }
        }

        for (position_id, position) in &self.positions {
            let instrument_id = position.instrument_id;
            let strategy_id = position.strategy_id;

            self.index.positions.insert(*position_id);
            self.index
                .position_strategy
                .insert(*position_id, strategy_id);
            self.index.strategies.insert(strategy_id);
            self.index
                .venue_positions
                .entry(instrument_id.venue)
                .or_default()
                .insert(*position_id);
            self.index
                .instrument_positions
                .entry(instrument_id)
                .or_default()
                .insert(*position_id);
            self.index
                .strategy_positions
                .entry(strategy_id)
                .or_default()
                .insert(*position_id);

            if position.is_open() {
                self.index.positions_open.insert(*position_id);
            } else {
                self.index.positions_closed.insert(*position_id);
            }
        }
    }

    /// Checks the integrity of the cache indices against cached state.
    ///
    /// Returns `true` when every index is consistent; any violation is logged
    /// with full context.
    #[must_use]
    pub fn check_integrity(&self) -> bool {
        let mut failures = 0;

        for (client_order_id, order) in &self.orders {
            if !self.index.orders.contains(client_order_id) {
                log::error!("Integrity failure: {client_order_id} not in `index.orders`");
                failures += 1;
            }
            if order.is_open() && !self.index.orders_open.contains(client_order_id) {
                log::error!("Integrity failure: open {client_order_id} not in `index.orders_open`");
                failures += 1;
            }
            if order.is_closed() && !self.index.orders_closed.contains(client_order_id) {
                log::error!(
                    "Integrity failure: closed {client_order_id} not in `index.orders_closed`"
                );
                failures += 1;
            }
        }

        for client_order_id in &self.index.orders_open {
            match self.orders.get(client_order_id) {
                Some(order) if order.is_closed() => {
                    log::error!(
                        "Integrity failure: `index.orders_open` contained closed {client_order_id}"
                    );
                    failures += 1;
                }
                None => {
                    log::error!(
                        "Integrity failure: `index.orders_open` contained unknown {client_order_id}"
                    );
                    failures += 1;
                }
                _ => {}
            }
        }

        for (position_id, position) in &self.positions {
            if position.is_open() != self.index.positions_open.contains(position_id) {
                log::error!(
                    "Integrity failure: {position_id} open state inconsistent with `index.positions_open`"
                );
                failures += 1;
            }
        }

        for position_id in &self.index.positions_open {
            if !self.positions.contains_key(position_id) {
                log::error!(
                    "Integrity failure: `index.positions_open` contained unknown {position_id}"
                );
                failures += 1;
            }
        }

        if failures > 0 {
            log::error!("Integrity check failed with {failures} failure(s)");
            return false;
        }
        true
    }

    /// Checks for residual open orders and positions, logging any found.
    ///
    /// Returns `true` when residual state exists.
    #[must_use]
    pub fn check_residuals(&self) -> bool {
        let mut residuals = false;

        for order in self.orders_open(None) {
            log::warn!("Residual {order}");
            residuals = true;
        }
        for position in self.positions_open(None) {
            log::warn!("Residual {position}");
            residuals = true;
        }

        residuals
    }

    /// Resets the cache, clearing all records and indices (memory only).
    pub fn reset(&mut self) {
        self.accounts.clear();
        self.orders.clear();
        self.positions.clear();
        self.strategy_state.clear();
        self.index.clear();
        log::info!("Reset cache");
    }

    /// Removes all records from the cache and the backing database
    /// (test and recovery only).
    pub fn flush(&mut self) {
        self.reset();
        self.flush_db();
    }

    /// Removes all records from the backing database (test and recovery only).
    pub fn flush_db(&mut self) {
        if let Some(database) = &mut self.database {
            if let Err(e) = database.flush() {
                log::error!("Failed to flush database: {e}");
            } else {
                log::info!("Flushed database");
            }
        }
    }

    /// Closes the cache, closing any backing database connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing database fails to close.
    pub fn close(&mut self) -> anyhow::Result<()> {
        if let Some(database) = &mut self.database {
            database.close()?;
        }
        Ok(())
    }

    // -- ACCOUNTS --------------------------------------------------------------------------------

    /// Adds the given `account` to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AlreadyExists`] if the account ID is already cached.
    pub fn add_account(&mut self, account: Account) -> Result<(), CacheError> {
        if self.accounts.contains_key(&account.id) {
            return Err(CacheError::AlreadyExists {
                key: account.id.to_string(),
            });
        }

        if self.config.debug {
            log::debug!("Adding {account}");
        }

        if let Some(database) = &mut self.database {
            database.add_account(&account)?;
        }

        let account_id = account.id;
        self.index
            .venue_account
            .insert(account_id.get_issuer(), account_id);
        self.accounts.insert(account_id, account);
        Ok(())
    }

    /// Updates the given `account` in the cache, replacing the prior snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if the account ID is not cached.
    pub fn update_account(&mut self, account: Account) -> Result<(), CacheError> {
        if !self.accounts.contains_key(&account.id) {
            return Err(CacheError::NotFound {
                key: account.id.to_string(),
            });
        }

        if let Some(database) = &mut self.database {
            database.update_account(&account)?;
        }

        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Returns a reference to the account for the given `account_id`.
    #[must_use]
    pub fn account(&self, account_id: &AccountId) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    /// Returns a reference to the account for the given `venue`.
    #[must_use]
    pub fn account_for_venue(&self, venue: &Venue) -> Option<&Account> {
        self.index
            .venue_account
            .get(venue)
            .and_then(|account_id| self.accounts.get(account_id))
    }

    /// Returns references to all cached accounts.
    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    // -- ORDERS ----------------------------------------------------------------------------------

    /// Adds the given `order` to the cache, indexed with any given identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AlreadyExists`] if the client order ID is already cached.
    pub fn add_order(&mut self, order: Order) -> Result<(), CacheError> {
        let client_order_id = order.client_order_id;
        if self.orders.contains_key(&client_order_id) {
            return Err(CacheError::AlreadyExists {
                key: client_order_id.to_string(),
            });
        }

        if self.config.debug {
            log::debug!("Adding {order:?}");
        }

        let instrument_id = order.instrument_id;
        let strategy_id = order.strategy_id;

        self.index.orders.insert(client_order_id);
        self.index.orders_open.insert(client_order_id);
        self.index
            .order_strategy
            .insert(client_order_id, strategy_id);
        self.index.strategies.insert(strategy_id);
        self.index
            .venue_orders
            .entry(instrument_id.venue)
            .or_default()
            .insert(client_order_id);
        self.index
            .instrument_orders
            .entry(instrument_id)
            .or_default()
            .insert(client_order_id);
        self.index
            .strategy_orders
            .entry(strategy_id)
            .or_default()
            .insert(client_order_id);

        if let Some(database) = &mut self.database {
            database.add_order(&order)?;
        }

        self.orders.insert(client_order_id, order);
        Ok(())
    }

    /// Indexes the given `venue_order_id` with the given `client_order_id`.
    pub fn add_venue_order_id(
        &mut self,
        client_order_id: &ClientOrderId,
        venue_order_id: &VenueOrderId,
    ) {
        self.index
            .client_order_ids
            .insert(*client_order_id, *venue_order_id);
        self.index
            .venue_order_ids
            .insert(*venue_order_id, *client_order_id);
    }

    /// Updates the given `order` in the cache, refreshing indices.
    ///
    /// Removal from the working-orders index occurs on the update which
    /// transitions the order to a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if the client order ID is not cached.
    pub fn update_order(&mut self, order: &Order) -> Result<(), CacheError> {
        let client_order_id = order.client_order_id;
        if !self.orders.contains_key(&client_order_id) {
            return Err(CacheError::NotFound {
                key: client_order_id.to_string(),
            });
        }

        if let Some(venue_order_id) = order.venue_order_id {
            if !self.index.venue_order_ids.contains_key(&venue_order_id) {
                self.add_venue_order_id(&client_order_id, &venue_order_id);
            }
        }

        if order.is_inflight() {
            self.index.orders_inflight.insert(client_order_id);
        } else {
            self.index.orders_inflight.remove(&client_order_id);
        }

        if order.is_open() {
            self.index.orders_closed.remove(&client_order_id);
            self.index.orders_open.insert(client_order_id);
        } else {
            self.index.orders_open.remove(&client_order_id);
            self.index.orders_closed.insert(client_order_id);
        }

        if let Some(position_id) = order.position_id {
            self.index.order_position.insert(client_order_id, position_id);
        }

        if let Some(database) = &mut self.database {
            database.update_order(order)?;
        }

        self.orders.insert(client_order_id, order.clone());
        Ok(())
    }

    /// Returns a reference to the order for the given `client_order_id`.
    #[must_use]
    pub fn order(&self, client_order_id: &ClientOrderId) -> Option<&Order> {
        self.orders.get(client_order_id)
    }

    /// Returns whether an order for the given `client_order_id` exists.
    #[must_use]
    pub fn order_exists(&self, client_order_id: &ClientOrderId) -> bool {
        self.index.orders.contains(client_order_id)
    }

    /// Returns the client order ID indexed for the given `venue_order_id`.
    #[must_use]
    pub fn client_order_id(&self, venue_order_id: &VenueOrderId) -> Option<&ClientOrderId> {
        self.index.venue_order_ids.get(venue_order_id)
    }

    /// Returns the venue order ID indexed for the given `client_order_id`.
    #[must_use]
    pub fn venue_order_id(&self, client_order_id: &ClientOrderId) -> Option<&VenueOrderId> {
        self.index.client_order_ids.get(client_order_id)
    }

    /// Returns references to all orders, optionally filtered by strategy.
    #[must_use]
    pub fn orders(&self, strategy_id: Option<&StrategyId>) -> Vec<&Order> {
        match strategy_id {
            Some(strategy_id) => self
                .index
                .strategy_orders
                .get(strategy_id)
                .map(|client_order_ids| {
                    client_order_ids
                        .iter()
                        .filter_map(|client_order_id| self.orders.get(client_order_id))
                        .collect()
                })
                .unwrap_or_default(),
            None => self.orders.values().collect(),
        }
    }

    /// Returns references to all open (non-terminal) orders, optionally
    /// filtered by strategy.
    #[must_use]
    pub fn orders_open(&self, strategy_id: Option<&StrategyId>) -> Vec<&Order> {
        self.index
            .orders_open
            .iter()
            .filter_map(|client_order_id| self.orders.get(client_order_id))
            .filter(|order| strategy_id.is_none_or(|id| &order.strategy_id == id))
            .collect()
    }

    /// Returns references to all closed (terminal) orders, optionally filtered
    /// by strategy.
    #[must_use]
    pub fn orders_closed(&self, strategy_id: Option<&StrategyId>) -> Vec<&Order> {
        self.index
            .orders_closed
            .iter()
            .filter_map(|client_order_id| self.orders.get(client_order_id))
            .filter(|order| strategy_id.is_none_or(|id| &order.strategy_id == id))
            .collect()
    }

    /// Returns whether the order for the given `client_order_id` is open.
    #[must_use]
    pub fn is_order_open(&self, client_order_id: &ClientOrderId) -> bool {
        self.index.orders_open.contains(client_order_id)
    }

    // -- POSITIONS -------------------------------------------------------------------------------

    /// Adds the given `position` to the cache, indexed with any given identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::AlreadyExists`] if the position ID is already cached.
    pub fn add_position(&mut self, position: Position) -> Result<(), CacheError> {
        let position_id = position.id;
        if self.positions.contains_key(&position_id) {
            return Err(CacheError::AlreadyExists {
                key: position_id.to_string(),
            });
        }

        if self.config.debug {
            log::debug!("Adding {position}");
        }

        let instrument_id = position.instrument_id;
        let strategy_id = position.strategy_id;

        self.index.positions.insert(position_id);
        self.index.positions_open.insert(position_id);
        self.index
            .position_strategy
            .insert(position_id, strategy_id);
        self.index
            .position_orders
            .entry(position_id)
            .or_default()
            .insert(position.opening_order_id);
        self.index
            .order_position
            .insert(position.opening_order_id, position_id);
        self.index
            .venue_positions
            .entry(instrument_id.venue)
            .or_default()
            .insert(position_id);
        self.index
            .instrument_positions
            .entry(instrument_id)
            .or_default()
            .insert(position_id);
        self.index
            .strategy_positions
            .entry(strategy_id)
            .or_default()
            .insert(position_id);

        if let Some(database) = &mut self.database {
            database.add_position(&position)?;
        }

        self.positions.insert(position_id, position);
        Ok(())
    }

    /// Updates the given `position` in the cache, refreshing indices.
    ///
    /// Removal from the open-positions index occurs on the update which
    /// transitions the position to flat.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if the position ID is not cached.
    pub fn update_position(&mut self, position: &Position) -> Result<(), CacheError> {
        let position_id = position.id;
        if !self.positions.contains_key(&position_id) {
            return Err(CacheError::NotFound {
                key: position_id.to_string(),
            });
        }

        if position.is_open() {
            self.index.positions_open.insert(position_id);
            self.index.positions_closed.remove(&position_id);
        } else {
            self.index.positions_closed.insert(position_id);
            self.index.positions_open.remove(&position_id);
        }

        if let Some(last_event) = position.last_event() {
            self.index
                .position_orders
                .entry(position_id)
                .or_default()
                .insert(last_event.client_order_id);
            self.index
                .order_position
                .insert(last_event.client_order_id, position_id);
        }

        if let Some(database) = &mut self.database {
            database.update_position(position)?;
        }

        self.positions.insert(position_id, position.clone());
        Ok(())
    }

    /// Returns a reference to the position for the given `position_id`.
    #[must_use]
    pub fn position(&self, position_id: &PositionId) -> Option<&Position> {
        self.positions.get(position_id)
    }

    /// Returns whether a position for the given `position_id` exists.
    #[must_use]
    pub fn position_exists(&self, position_id: &PositionId) -> bool {
        self.index.positions.contains(position_id)
    }

    /// Returns the position ID indexed for the given `client_order_id`.
    #[must_use]
    pub fn position_id(&self, client_order_id: &ClientOrderId) -> Option<&PositionId> {
        self.index.order_position.get(client_order_id)
    }

    /// Returns references to all positions, optionally filtered by strategy.
    #[must_use]
    pub fn positions(&self, strategy_id: Option<&StrategyId>) -> Vec<&Position> {
        match strategy_id {
            Some(strategy_id) => self
                .index
                .strategy_positions
                .get(strategy_id)
                .map(|position_ids| {
                    position_ids
                        .iter()
                        .filter_map(|position_id| self.positions.get(position_id))
                        .collect()
                })
                .unwrap_or_default(),
            None => self.positions.values().collect(),
        }
    }

    /// Returns references to all open (non-flat) positions, optionally
    /// filtered by strategy.
    #[must_use]
    pub fn positions_open(&self, strategy_id: Option<&StrategyId>) -> Vec<&Position> {
        self.index
            .positions_open
            .iter()
            .filter_map(|position_id| self.positions.get(position_id))
            .filter(|position| strategy_id.is_none_or(|id| &position.strategy_id == id))
            .collect()
    }

    /// Returns references to all closed (flat) positions, optionally filtered
    /// by strategy.
    #[must_use]
    pub fn positions_closed(&self, strategy_id: Option<&StrategyId>) -> Vec<&Position> {
        self.index
            .positions_closed
            .iter()
            .filter_map(|position_id| self.positions.get(position_id))
            .filter(|position| strategy_id.is_none_or(|id| &position.strategy_id == id))
            .collect()
    }

    /// Returns references to the open positions for the given instrument and
    /// strategy.
    #[must_use]
    pub fn positions_open_for_instrument(
        &self,
        instrument_id: &InstrumentId,
        strategy_id: Option<&StrategyId>,
    ) -> Vec<&Position> {
        self.positions_open(strategy_id)
            .into_iter()
            .filter(|position| &position.instrument_id == instrument_id)
            .collect()
    }

    // -- STRATEGY STATE --------------------------------------------------------------------------

    /// Loads persisted state for the given `strategy_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading from the backing database fails.
    pub fn load_strategy(
        &mut self,
        strategy_id: &StrategyId,
    ) -> Result<AHashMap<String, Bytes>, CacheError> {
        if let Some(state) = self.strategy_state.get(strategy_id) {
            return Ok(state.clone());
        }

        let state = match &self.database {
            Some(database) => database.load_strategy(strategy_id)?,
            None => AHashMap::new(),
        };
        self.strategy_state.insert(*strategy_id, state.clone());
        Ok(state)
    }

    /// Updates persisted state for the given `strategy_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the backing database fails.
    pub fn update_strategy(
        &mut self,
        strategy_id: &StrategyId,
        state: AHashMap<String, Bytes>,
    ) -> Result<(), CacheError> {
        if let Some(database) = &mut self.database {
            database.update_strategy(strategy_id, &state)?;
        }
        self.strategy_state.insert(*strategy_id, state);
        Ok(())
    }

    /// Deletes persisted state for the given `strategy_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if deleting from the backing database fails.
    pub fn delete_strategy(&mut self, strategy_id: &StrategyId) -> Result<(), CacheError> {
        if let Some(database) = &mut self.database {
            database.delete_strategy(strategy_id)?;
        }
        self.strategy_state.remove(strategy_id);
        Ok(())
    }
}
