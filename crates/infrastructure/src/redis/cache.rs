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

//! The Redis-backed persistent variant of the execution database.
//!
//! Records are serialized individually and stored under the trader key:
//!
//! ```text
//! Trader-{trader_id}:Accounts:{account_id}
//! Trader-{trader_id}:Orders:{client_order_id}
//! Trader-{trader_id}:Positions:{position_id}
//! Trader-{trader_id}:Strategies:{strategy_id}:State
//! Trader-{trader_id}:Index:OrdersWorking
//! Trader-{trader_id}:Index:PositionsOpen
//! ```
//!
//! Writes are serialized through a buffered single-writer task and executed in
//! pipelines with bounded exponential retry. When the retry schedule is
//! exhausted the adapter degrades: the failed write is logged for
//! reconciliation and subsequent writes fail with `PersistenceUnavailable`
//! until the store recovers.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use ahash::AHashMap;
use bytes::Bytes;
use meridian_common::{
    cache::{CacheConfig, CacheDatabaseAdapter, CacheMap},
    enums::SerializationEncoding,
};
use meridian_model::{
    accounts::Account,
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId, TraderId},
    orders::Order,
    position::Position,
};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};

use crate::redis::{
    PersistenceError, REDIS_DELIMITER, create_redis_connection, get_trader_key, retry_with_backoff,
};

// Task and connection names
const CACHE_READ: &str = "cache-read";
const CACHE_WRITE: &str = "cache-write";

// Collection keys
const ACCOUNTS: &str = "Accounts";
const ORDERS: &str = "Orders";
const POSITIONS: &str = "Positions";
const STRATEGIES: &str = "Strategies";

// Index keys
const INDEX_ORDERS_WORKING: &str = "Index:OrdersWorking";
const INDEX_POSITIONS_OPEN: &str = "Index:PositionsOpen";

/// A type of database operation.
#[derive(Clone, Debug)]
pub enum DatabaseOperation {
    Insert,
    Update,
    Delete,
    AddToSet,
    RemoveFromSet,
    Close,
}

/// Represents a database command to be performed by the write task.
#[derive(Clone, Debug)]
pub struct DatabaseCommand {
    /// The database operation type.
    pub op_type: DatabaseOperation,
    /// The key for the operation (relative to the trader key).
    pub key: Option<String>,
    /// The data payload for the operation.
    pub payload: Option<Vec<Bytes>>,
}

impl DatabaseCommand {
    /// Creates a new [`DatabaseCommand`] instance.
    #[must_use]
    pub fn new(op_type: DatabaseOperation, key: String, payload: Option<Vec<Bytes>>) -> Self {
        Self {
            op_type,
            key: Some(key),
            payload,
        }
    }

    /// Creates a `Close` command, terminating the write task.
    #[must_use]
    pub fn close() -> Self {
        Self {
            op_type: DatabaseOperation::Close,
            key: None,
            payload: None,
        }
    }
}

/// A Redis-backed `CacheDatabaseAdapter` with per-record serialization.
pub struct RedisCacheDatabase {
    trader_id: TraderId,
    trader_key: String,
    con: ConnectionManager,
    encoding: SerializationEncoding,
    tx: tokio::sync::mpsc::UnboundedSender<DatabaseCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    degraded: Arc<AtomicBool>,
}

impl RedisCacheDatabase {
    /// Creates a new [`RedisCacheDatabase`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established or no
    /// database is configured.
    pub async fn new(trader_id: TraderId, config: CacheConfig) -> anyhow::Result<Self> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No database config"))?;
        let con = create_redis_connection(CACHE_READ, db_config).await?;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<DatabaseCommand>();
        let trader_key = get_trader_key(trader_id);
        let degraded = Arc::new(AtomicBool::new(false));

        let handle = {
            let trader_key = trader_key.clone();
            let config = config.clone();
            let degraded = degraded.clone();
            tokio::spawn(async move {
                if let Err(e) = process_commands(rx, trader_key, config, degraded).await {
                    log::error!("Error in task '{CACHE_WRITE}': {e}");
                }
            })
        };

        Ok(Self {
            trader_id,
            trader_key,
            con,
            encoding: config.encoding,
            tx,
            handle: Some(handle),
            degraded,
        })
    }

    /// Returns the trader ID the database is keyed for.
    #[must_use]
    pub fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    /// Returns the trader key prefix.
    #[must_use]
    pub fn trader_key(&self) -> &str {
        &self.trader_key
    }

    /// Returns the configured record encoding.
    #[must_use]
    pub fn encoding(&self) -> SerializationEncoding {
        self.encoding
    }

    fn send(&self, command: DatabaseCommand) -> anyhow::Result<()> {
        if self.degraded.load(Ordering::Acquire) {
            return Err(PersistenceError::PersistenceUnavailable {
                reason: "store degraded after exhausted write retries".to_string(),
            }
            .into());
        }
        self.tx
            .send(command)
            .map_err(|e| anyhow::anyhow!("Failed to send to channel: {e}"))
    }

    async fn read_record<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let full_key = format!("{}{REDIS_DELIMITER}{key}", self.trader_key);
        let con = self.con.clone();
        let payload: Option<Vec<u8>> = retry_with_backoff(key, || {
            let mut con = con.clone();
            let full_key = full_key.clone();
            async move { con.get(full_key).await }
        })
        .await?;

        match payload {
            Some(bytes) => Ok(Some(deserialize_payload(self.encoding, &bytes)?)),
            None => Ok(None),
        }
    }

    async fn read_collection<K, T, F>(
        &self,
        collection: &str,
        key_fn: F,
    ) -> anyhow::Result<AHashMap<K, T>>
    where
        K: Eq + std::hash::Hash,
        T: DeserializeOwned,
        F: Fn(&T) -> K,
    {
        let pattern = format!("{}{REDIS_DELIMITER}{collection}{REDIS_DELIMITER}*", self.trader_key);
        let mut con = self.con.clone();
        let keys = scan_keys(&mut con, pattern).await?;

        let mut map = AHashMap::with_capacity(keys.len());
        for key in keys {
            let payload: Option<Vec<u8>> = retry_with_backoff(&key, || {
                let mut con = con.clone();
                let key = key.clone();
                async move { con.get(key).await }
            })
            .await?;

            if let Some(bytes) = payload {
                let record: T = deserialize_payload(self.encoding, &bytes)?;
                map.insert(key_fn(&record), record);
            }
        }
        Ok(map)
    }
}

#[async_trait::async_trait]
impl CacheDatabaseAdapter for RedisCacheDatabase {
    fn close(&mut self) -> anyhow::Result<()> {
        log::debug!("Closing");

        if let Err(e) = self.tx.send(DatabaseCommand::close()) {
            log::debug!("Error sending close command: {e:?}");
        }

        if let Some(handle) = self.handle.take() {
            log::debug!("Awaiting task '{CACHE_WRITE}'");
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                tokio::task::block_in_place(|| {
                    if let Err(e) = runtime.block_on(handle) {
                        log::error!("Error awaiting task '{CACHE_WRITE}': {e:?}");
                    }
                });
            } else {
                handle.abort();
            }
        }

        log::debug!("Closed");
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        let mut con = self.con.clone();
        let flush = async move {
            redis::cmd("FLUSHDB")
                .query_async::<()>(&mut con)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to flush database: {e}"))
        };

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| runtime.block_on(flush))
        } else {
            anyhow::bail!("No tokio runtime available to flush database")
        }
    }

    async fn load_all(&self) -> anyhow::Result<CacheMap> {
        let (accounts, orders, positions) = tokio::try_join!(
            self.load_accounts(),
            self.load_orders(),
            self.load_positions(),
        )?;

        Ok(CacheMap {
            accounts,
            orders,
            positions,
        })
    }

    async fn load_accounts(&self) -> anyhow::Result<AHashMap<AccountId, Account>> {
        self.read_collection(ACCOUNTS, |account: &Account| account.id)
            .await
    }

    async fn load_orders(&self) -> anyhow::Result<AHashMap<ClientOrderId, Order>> {
        self.read_collection(ORDERS, |order: &Order| order.client_order_id)
            .await
    }

    async fn load_positions(&self) -> anyhow::Result<AHashMap<PositionId, Position>> {
        self.read_collection(POSITIONS, |position: &Position| position.id)
            .await
    }

    async fn load_account(&self, account_id: &AccountId) -> anyhow::Result<Option<Account>> {
        self.read_record(&format!("{ACCOUNTS}{REDIS_DELIMITER}{account_id}"))
            .await
    }

    async fn load_order(&self, client_order_id: &ClientOrderId) -> anyhow::Result<Option<Order>> {
        self.read_record(&format!("{ORDERS}{REDIS_DELIMITER}{client_order_id}"))
            .await
    }

    async fn load_position(&self, position_id: &PositionId) -> anyhow::Result<Option<Position>> {
        self.read_record(&format!("{POSITIONS}{REDIS_DELIMITER}{position_id}"))
            .await
    }

    fn load_strategy(&self, strategy_id: &StrategyId) -> anyhow::Result<AHashMap<String, Bytes>> {
        let key = format!(
            "{}{REDIS_DELIMITER}{}",
            self.trader_key,
            strategy_state_key(strategy_id),
        );
        let mut con = self.con.clone();
        let load = async move {
            let state: Vec<(String, Vec<u8>)> = con.hgetall(key).await?;
            Ok::<_, redis::RedisError>(state)
        };

        let state = if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| runtime.block_on(load))?
        } else {
            anyhow::bail!("No tokio runtime available to load strategy state")
        };

        Ok(state
            .into_iter()
            .map(|(name, value)| (name, Bytes::from(value)))
            .collect())
    }

    fn add_account(&self, account: &Account) -> anyhow::Result<()> {
        let key = format!("{ACCOUNTS}{REDIS_DELIMITER}{}", account.id);
        let payload = serialize_payload(self.encoding, account)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Insert,
            key,
            Some(vec![payload]),
        ))
    }

    fn add_order(&self, order: &Order) -> anyhow::Result<()> {
        let key = format!("{ORDERS}{REDIS_DELIMITER}{}", order.client_order_id);
        let payload = serialize_payload(self.encoding, order)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Insert,
            key,
            Some(vec![payload]),
        ))?;

        // A new order is non-terminal and belongs in the working index
        self.send(DatabaseCommand::new(
            DatabaseOperation::AddToSet,
            INDEX_ORDERS_WORKING.to_string(),
            Some(vec![Bytes::from(order.client_order_id.to_string())]),
        ))
    }

    fn add_position(&self, position: &Position) -> anyhow::Result<()> {
        let key = format!("{POSITIONS}{REDIS_DELIMITER}{}", position.id);
        let payload = serialize_payload(self.encoding, position)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Insert,
            key,
            Some(vec![payload]),
        ))?;

        self.send(DatabaseCommand::new(
            DatabaseOperation::AddToSet,
            INDEX_POSITIONS_OPEN.to_string(),
            Some(vec![Bytes::from(position.id.to_string())]),
        ))
    }

    fn update_account(&self, account: &Account) -> anyhow::Result<()> {
        let key = format!("{ACCOUNTS}{REDIS_DELIMITER}{}", account.id);
        let payload = serialize_payload(self.encoding, account)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Update,
            key,
            Some(vec![payload]),
        ))
    }

    fn update_order(&self, order: &Order) -> anyhow::Result<()> {
        let key = format!("{ORDERS}{REDIS_DELIMITER}{}", order.client_order_id);
        let payload = serialize_payload(self.encoding, order)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Update,
            key,
            Some(vec![payload]),
        ))?;

        // Leaving the working index happens on the update which makes the
        // order terminal
        let index_op = if order.is_open() {
            DatabaseOperation::AddToSet
        } else {
            DatabaseOperation::RemoveFromSet
        };
        self.send(DatabaseCommand::new(
            index_op,
            INDEX_ORDERS_WORKING.to_string(),
            Some(vec![Bytes::from(order.client_order_id.to_string())]),
        ))
    }

    fn update_position(&self, position: &Position) -> anyhow::Result<()> {
        let key = format!("{POSITIONS}{REDIS_DELIMITER}{}", position.id);
        let payload = serialize_payload(self.encoding, position)?;
        self.send(DatabaseCommand::new(
            DatabaseOperation::Update,
            key,
            Some(vec![payload]),
        ))?;

        let index_op = if position.is_open() {
            DatabaseOperation::AddToSet
        } else {
            DatabaseOperation::RemoveFromSet
        };
        self.send(DatabaseCommand::new(
            index_op,
            INDEX_POSITIONS_OPEN.to_string(),
            Some(vec![Bytes::from(position.id.to_string())]),
        ))
    }

    fn update_strategy(
        &self,
        strategy_id: &StrategyId,
        state: &AHashMap<String, Bytes>,
    ) -> anyhow::Result<()> {
        let key = strategy_state_key(strategy_id);

        // Replace the whole hash so stale fields do not survive
        self.send(DatabaseCommand::new(
            DatabaseOperation::Delete,
            key.clone(),
            None,
        ))?;

        let mut payload = Vec::with_capacity(state.len() * 2);
        for (name, value) in state {
            payload.push(Bytes::from(name.clone()));
            payload.push(value.clone());
        }
        if payload.is_empty() {
            return Ok(());
        }
        self.send(DatabaseCommand::new(
            DatabaseOperation::Insert,
            key,
            Some(payload),
        ))
    }

    fn delete_strategy(&self, strategy_id: &StrategyId) -> anyhow::Result<()> {
        self.send(DatabaseCommand::new(
            DatabaseOperation::Delete,
            strategy_state_key(strategy_id),
            None,
        ))
    }
}

fn strategy_state_key(strategy_id: &StrategyId) -> String {
    format!("{STRATEGIES}{REDIS_DELIMITER}{strategy_id}{REDIS_DELIMITER}State")
}

fn serialize_payload<T: Serialize>(
    encoding: SerializationEncoding,
    value: &T,
) -> anyhow::Result<Bytes> {
    let bytes = match encoding {
        SerializationEncoding::MsgPack => rmp_serde::to_vec_named(value)?,
        SerializationEncoding::Json => serde_json::to_vec(value)?,
    };
    Ok(Bytes::from(bytes))
}

fn deserialize_payload<T: DeserializeOwned>(
    encoding: SerializationEncoding,
    bytes: &[u8],
) -> anyhow::Result<T> {
    let value = match encoding {
        SerializationEncoding::MsgPack => rmp_serde::from_slice(bytes)?,
        SerializationEncoding::Json => serde_json::from_slice(bytes)?,
    };
    Ok(value)
}

async fn scan_keys(
    con: &mut ConnectionManager,
    pattern: String,
) -> anyhow::Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: u64 = 0;
    loop {
        let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(100)
            .query_async(con)
            .await?;
        keys.extend(batch);
        cursor = next;
        if cursor == 0 {
            break;
        }
    }
    Ok(keys)
}

async fn process_commands(
    mut rx: tokio::sync::mpsc::UnboundedReceiver<DatabaseCommand>,
    trader_key: String,
    config: CacheConfig,
    degraded: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    log::debug!("Starting cache write processing");

    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No database config"))?;
    let mut con = create_redis_connection(CACHE_WRITE, db_config).await?;

    // Buffering
    let mut buffer: VecDeque<DatabaseCommand> = VecDeque::new();
    let mut last_drain = Instant::now();
    let buffer_interval = Duration::from_millis(config.buffer_interval_ms.unwrap_or(0));

    // Continue to receive and handle messages until channel is hung up
    loop {
        if last_drain.elapsed() >= buffer_interval && !buffer.is_empty() {
            drain_buffer(&mut con, &trader_key, &mut buffer, &degraded).await;
            last_drain = Instant::now();
        } else {
            match rx.recv().await {
                Some(command) => {
                    if let DatabaseOperation::Close = command.op_type {
                        break;
                    }
                    buffer.push_back(command);
                }
                None => {
                    log::debug!("Command channel closed");
                    break;
                }
            }
        }
    }

    // Drain any remaining messages
    if !buffer.is_empty() {
        drain_buffer(&mut con, &trader_key, &mut buffer, &degraded).await;
    }

    log::debug!("Stopped cache write processing");
    Ok(())
}

async fn drain_buffer(
    con: &mut ConnectionManager,
    trader_key: &str,
    buffer: &mut VecDeque<DatabaseCommand>,
    degraded: &Arc<AtomicBool>,
) {
    let mut pipe = redis::pipe();
    pipe.atomic();

    for command in buffer.drain(..) {
        let key = match command.key {
            Some(key) => format!("{trader_key}{REDIS_DELIMITER}{key}"),
            None => {
                log::error!("Null key found for command: {command:?}");
                continue;
            }
        };

        match command.op_type {
            DatabaseOperation::Insert | DatabaseOperation::Update => {
                match command.payload {
                    Some(payload) if key.contains(STRATEGIES) => {
                        // Strategy state is a hash of name -> value pairs
                        for pair in payload.chunks(2) {
                            if let [name, value] = pair {
                                pipe.hset(&key, name.as_ref(), value.as_ref());
                            }
                        }
                    }
                    Some(payload) => match payload.first() {
                        Some(value) => {
                            pipe.set(&key, value.as_ref());
                        }
                        None => log::error!("Empty `payload` for `set` on {key}"),
                    },
                    None => log::error!("Null `payload` for `set` on {key}"),
                }
            }
            DatabaseOperation::AddToSet => match command.payload.as_ref().and_then(|p| p.first()) {
                Some(member) => {
                    pipe.sadd(&key, member.as_ref());
                }
                None => log::error!("Null `payload` for `sadd` on {key}"),
            },
            DatabaseOperation::RemoveFromSet => {
                match command.payload.as_ref().and_then(|p| p.first()) {
                    Some(member) => {
                        pipe.srem(&key, member.as_ref());
                    }
                    None => log::error!("Null `payload` for `srem` on {key}"),
                }
            }
            DatabaseOperation::Delete => {
                pipe.del(&key);
            }
            DatabaseOperation::Close => panic!("Close command should not be drained"),
        }
    }

    let result = retry_with_backoff("drain-buffer", || {
        let mut con = con.clone();
        let pipe = pipe.clone();
        async move { pipe.query_async::<()>(&mut con).await }
    })
    .await;

    match result {
        Ok(()) => degraded.store(false, Ordering::Release),
        Err(e) => {
            // The divergence is flagged for reconciliation on reconnect
            log::error!("{e}; affected writes dropped, state flagged for reconciliation");
            degraded.store(true, Ordering::Release);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_model::events::order::stubs::order_initialized_market_buy;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_strategy_state_key() {
        let key = strategy_state_key(&StrategyId::from("EMACross-001"));
        assert_eq!(key, "Strategies:EMACross-001:State");
    }

    #[rstest]
    #[case(SerializationEncoding::MsgPack)]
    #[case(SerializationEncoding::Json)]
    fn test_order_payload_round_trip(#[case] encoding: SerializationEncoding) {
        let order = Order::from(order_initialized_market_buy());

        let payload = serialize_payload(encoding, &order).unwrap();
        let deserialized: Order = deserialize_payload(encoding, &payload).unwrap();

        assert_eq!(deserialized, order);
        assert_eq!(deserialized.status, order.status);
        assert_eq!(deserialized.quantity, order.quantity);
    }

    #[rstest]
    fn test_database_command_close() {
        let command = DatabaseCommand::close();
        assert!(matches!(command.op_type, DatabaseOperation::Close));
        assert!(command.key.is_none());
        assert!(command.payload.is_none());
    }
}
