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

use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
};

use chrono::{DateTime, FixedOffset};
use meridian_core::{DurationNanos, UnixNanos, datetime::datetime_to_unix_nanos};
use meridian_model::types::Price;
use thiserror::Error;

use crate::indicator::Indicator;

/// An error within indicator input handling.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// An input timestamp was not UTC-tagged.
    #[error("Timestamp not UTC: {reason}")]
    TimestampNotUtc {
        /// The underlying validation failure.
        reason: String,
    },
}

/// Tracks the minimum and maximum price observed within a sliding time window.
///
/// The representation is a pair of monotonic deques (front = oldest): the
/// min-deque maintains prices in non-decreasing order front to back, the
/// max-deque in non-increasing order. Tail entries which can never again be an
/// extremum are evicted on insert, and front entries are evicted once they age
/// out of the window, so each insert is amortized O(1) and memory stays
/// bounded by the number of distinct extrema in the window.
pub struct WindowedMinMaxPrices {
    /// The sliding window duration (nanoseconds).
    pub lookback: DurationNanos,
    /// The minimum price in the window, once any input has been received.
    pub min_price: Option<Price>,
    /// The maximum price in the window, once any input has been received.
    pub max_price: Option<Price>,
    min_prices: VecDeque<(UnixNanos, Price)>,
    max_prices: VecDeque<(UnixNanos, Price)>,
    has_inputs: bool,
}

impl WindowedMinMaxPrices {
    /// Creates a new [`WindowedMinMaxPrices`] instance with the given
    /// `lookback` window duration (nanoseconds).
    #[must_use]
    pub fn new(lookback: DurationNanos) -> Self {
        Self {
            lookback,
            min_price: None,
            max_price: None,
            min_prices: VecDeque::new(),
            max_prices: VecDeque::new(),
            has_inputs: false,
        }
    }

    /// Adds the given timestamped `price` to the window.
    ///
    /// `ts` must be monotone per stream source; `ts` becomes the new "now"
    /// from which the window cutoff is measured.
    pub fn add(&mut self, ts: UnixNanos, price: Price) {
        self.has_inputs = true;
        let cutoff = ts.saturating_sub(UnixNanos::from(self.lookback));

        // Evict tail entries which the new price supersedes
        while matches!(self.min_prices.back(), Some((_, back)) if *back >= price) {
            self.min_prices.pop_back();
        }
        while matches!(self.max_prices.back(), Some((_, back)) if *back <= price) {
            self.max_prices.pop_back();
        }

        self.min_prices.push_back((ts, price));
        self.max_prices.push_back((ts, price));

        // Evict front entries which have aged out of the window
        while matches!(self.min_prices.front(), Some((front_ts, _)) if *front_ts < cutoff) {
            self.min_prices.pop_front();
        }
        while matches!(self.max_prices.front(), Some((front_ts, _)) if *front_ts < cutoff) {
            self.max_prices.pop_front();
        }

        self.min_price = self.min_prices.front().map(|(_, price)| *price);
        self.max_price = self.max_prices.front().map(|(_, price)| *price);
    }

    /// Adds the given `price` at a chrono datetime boundary.
    ///
    /// # Errors
    ///
    /// Returns [`IndicatorError::TimestampNotUtc`] if `ts` carries a non-zero
    /// UTC offset.
    pub fn add_datetime(
        &mut self,
        ts: DateTime<FixedOffset>,
        price: Price,
    ) -> Result<(), IndicatorError> {
        let ts = datetime_to_unix_nanos(ts, stringify!(ts)).map_err(|e| {
            IndicatorError::TimestampNotUtc {
                reason: e.to_string(),
            }
        })?;
        self.add(ts, price);
        Ok(())
    }
}

impl Indicator for WindowedMinMaxPrices {
    fn name(&self) -> String {
        stringify!(WindowedMinMaxPrices).to_string()
    }

    fn has_inputs(&self) -> bool {
        self.has_inputs
    }

    fn initialized(&self) -> bool {
        self.has_inputs
    }

    fn handle_price(&mut self, ts: UnixNanos, price: Price) {
        self.add(ts, price);
    }

    fn reset(&mut self) {
        self.min_prices.clear();
        self.max_prices.clear();
        self.min_price = None;
        self.max_price = None;
        self.has_inputs = false;
    }
}

impl Debug for WindowedMinMaxPrices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(WindowedMinMaxPrices))
            .field("lookback", &self.lookback)
            .field("min_price", &self.min_price)
            .field("max_price", &self.max_price)
            .finish()
    }
}

impl Display for WindowedMinMaxPrices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.lookback)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};
    use meridian_core::datetime::NANOSECONDS_IN_SECOND;
    use rstest::{fixture, rstest};

    use super::*;

    const SECS: u64 = NANOSECONDS_IN_SECOND;

    #[fixture]
    fn minmax_60s() -> WindowedMinMaxPrices {
        WindowedMinMaxPrices::new(60 * SECS)
    }

    fn px(value: f64) -> Price {
        Price::new(value, 2)
    }

    #[rstest]
    fn test_initial_state(minmax_60s: WindowedMinMaxPrices) {
        assert_eq!(format!("{minmax_60s}"), "WindowedMinMaxPrices(60000000000)");
        assert!(!minmax_60s.has_inputs());
        assert!(minmax_60s.min_price.is_none());
        assert!(minmax_60s.max_price.is_none());
    }

    #[rstest]
    fn test_single_input(mut minmax_60s: WindowedMinMaxPrices) {
        minmax_60s.add(UnixNanos::from(0), px(100.00));
        assert!(minmax_60s.has_inputs());
        assert_eq!(minmax_60s.min_price, Some(px(100.00)));
        assert_eq!(minmax_60s.max_price, Some(px(100.00)));
    }

    #[rstest]
    fn test_window_extrema_with_expiry(mut minmax_60s: WindowedMinMaxPrices) {
        // Adds at t=0s, 20s, 40s, 70s; cutoff after the last add is 10s
        minmax_60s.add(UnixNanos::from(0), px(100.00));
        minmax_60s.add(UnixNanos::from(20 * SECS), px(98.00));
        minmax_60s.add(UnixNanos::from(40 * SECS), px(102.00));
        minmax_60s.add(UnixNanos::from(70 * SECS), px(99.00));

        assert_eq!(minmax_60s.min_price, Some(px(98.00)));
        assert_eq!(minmax_60s.max_price, Some(px(102.00)));
    }

    #[rstest]
    fn test_expiry_of_prior_extremum(mut minmax_60s: WindowedMinMaxPrices) {
        minmax_60s.add(UnixNanos::from(0), px(105.00));
        minmax_60s.add(UnixNanos::from(30 * SECS), px(100.00));
        // The 105.00 high ages out at t=90s
        minmax_60s.add(UnixNanos::from(95 * SECS), px(101.00));

        assert_eq!(minmax_60s.min_price, Some(px(100.00)));
        assert_eq!(minmax_60s.max_price, Some(px(101.00)));
    }

    #[rstest]
    fn test_monotone_deques_bound_memory(mut minmax_60s: WindowedMinMaxPrices) {
        // A monotonically rising series keeps a single min candidate and a
        // full max chain; a new low collapses the min-deque to one entry
        for i in 0..10 {
            minmax_60s.add(UnixNanos::from(i * SECS), px(100.0 + i as f64));
        }
        assert_eq!(minmax_60s.min_price, Some(px(100.00)));
        assert_eq!(minmax_60s.max_price, Some(px(109.00)));

        minmax_60s.add(UnixNanos::from(10 * SECS), px(95.00));
        assert_eq!(minmax_60s.min_price, Some(px(95.00)));
        assert_eq!(minmax_60s.max_price, Some(px(109.00)));
    }

    #[rstest]
    fn test_exact_cutoff_boundary_is_inclusive(mut minmax_60s: WindowedMinMaxPrices) {
        // An entry exactly at ts == cutoff remains in the window (ts >= now - L)
        minmax_60s.add(UnixNanos::from(0), px(98.00));
        minmax_60s.add(UnixNanos::from(60 * SECS), px(100.00));

        assert_eq!(minmax_60s.min_price, Some(px(98.00)));
        assert_eq!(minmax_60s.max_price, Some(px(100.00)));
    }

    #[rstest]
    fn test_add_datetime_requires_utc(mut minmax_60s: WindowedMinMaxPrices) {
        let utc = Utc.timestamp_opt(60, 0).unwrap().fixed_offset();
        assert!(minmax_60s.add_datetime(utc, px(100.00)).is_ok());
        assert_eq!(minmax_60s.min_price, Some(px(100.00)));

        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = Utc.timestamp_opt(120, 0).unwrap().with_timezone(&offset);
        let result = minmax_60s.add_datetime(local, px(90.00));
        assert!(matches!(result, Err(IndicatorError::TimestampNotUtc { .. })));
        // Rejected input leaves the window untouched
        assert_eq!(minmax_60s.min_price, Some(px(100.00)));
    }

    #[rstest]
    fn test_reset(mut minmax_60s: WindowedMinMaxPrices) {
        minmax_60s.add(UnixNanos::from(0), px(100.00));
        minmax_60s.reset();

        assert!(!minmax_60s.has_inputs());
        assert!(minmax_60s.min_price.is_none());
        assert!(minmax_60s.max_price.is_none());
    }
}
