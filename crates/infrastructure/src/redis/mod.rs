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

//! Redis backing implementations.

pub mod cache;

use std::{future::Future, time::Duration};

use meridian_common::cache::DatabaseConfig;
use meridian_model::identifiers::TraderId;
use redis::aio::ConnectionManager;
use thiserror::Error;

pub use crate::redis::cache::RedisCacheDatabase;

/// The delimiter joining key components.
pub const REDIS_DELIMITER: char = ':';

/// The number of attempts for a failing store operation.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// The initial delay before the first retry of a failing store operation.
pub const RETRY_DELAY_INITIAL: Duration = Duration::from_millis(50);

/// An error within persistent store operations.
#[derive(Clone, Debug, Error)]
pub enum PersistenceError {
    /// The store did not recover within the bounded retry schedule.
    #[error("Persistence unavailable: {reason}")]
    PersistenceUnavailable {
        /// The underlying store failure.
        reason: String,
    },
}

/// Creates a managed Redis connection for the given `name` and `config`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn create_redis_connection(
    name: &str,
    config: &DatabaseConfig,
) -> anyhow::Result<ConnectionManager> {
    log::debug!("Creating connection '{name}'");

    let client = redis::Client::open(config.url.as_str())?;
    let connection_config = redis::aio::ConnectionManagerConfig::new()
        .set_connection_timeout(Some(Duration::from_secs(config.timeout_secs)));
    let con = ConnectionManager::new_with_config(client, connection_config).await?;

    log::info!("Created connection '{name}'");
    Ok(con)
}

/// Returns the trader key prefix for the given `trader_id`.
#[must_use]
pub fn get_trader_key(trader_id: TraderId) -> String {
    format!("Trader-{trader_id}")
}

/// Retries the given async store operation with bounded exponential backoff.
///
/// The schedule is [`RETRY_MAX_ATTEMPTS`] attempts starting at
/// [`RETRY_DELAY_INITIAL`], doubling per attempt. Exhaustion surfaces
/// [`PersistenceError::PersistenceUnavailable`].
///
/// # Errors
///
/// Returns [`PersistenceError::PersistenceUnavailable`] if every attempt fails.
pub async fn retry_with_backoff<T, F, Fut>(
    op_name: &str,
    mut op: F,
) -> Result<T, PersistenceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, redis::RedisError>>,
{
    let mut delay = RETRY_DELAY_INITIAL;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < RETRY_MAX_ATTEMPTS => {
                log::warn!(
                    "Transient store error on '{op_name}' (attempt {attempt}/{RETRY_MAX_ATTEMPTS}), retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => {
                log::error!(
                    "Store error on '{op_name}' after {RETRY_MAX_ATTEMPTS} attempts: {e}"
                );
                return Err(PersistenceError::PersistenceUnavailable {
                    reason: e.to_string(),
                });
            }
        }
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
    fn test_get_trader_key() {
        assert_eq!(get_trader_key(TraderId::default()), "Trader-TRADER-001");
    }

    #[rstest]
    fn test_retry_schedule_is_bounded() {
        // 3 attempts: initial try plus two backoff sleeps (50ms, 100ms)
        assert_eq!(RETRY_MAX_ATTEMPTS, 3);
        assert_eq!(RETRY_DELAY_INITIAL, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_retry_with_backoff_exhaustion() {
        let result: Result<(), PersistenceError> = retry_with_backoff("test-op", || async {
            Err(redis::RedisError::from(std::io::Error::other("store down")))
        })
        .await;

        assert!(matches!(
            result,
            Err(PersistenceError::PersistenceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_retry_with_backoff_recovers() {
        let mut failures = 0;
        let result = retry_with_backoff("test-op", || {
            let fail = failures < 2;
            failures += 1;
            async move {
                if fail {
                    Err(redis::RedisError::from(std::io::Error::other("transient")))
                } else {
                    Ok(42_u64)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }
}
