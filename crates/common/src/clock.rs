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

//! Real-time and static `Clock` implementations.
//!
//! The clock is an explicit collaborator passed to components at construction,
//! never process-wide state. [`LiveClock`] reads the system time;
//! [`TestClock`] is set and advanced manually.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use meridian_core::{
    UnixNanos,
    datetime::{NANOSECONDS_IN_MICROSECOND, NANOSECONDS_IN_MILLISECOND, nanos_to_secs},
};

/// A time source for components.
pub trait Clock: Debug {
    /// Returns the current UNIX timestamp in nanoseconds (ns).
    fn timestamp_ns(&self) -> UnixNanos;

    /// Returns the current UNIX timestamp in microseconds (μs).
    fn timestamp_us(&self) -> u64 {
        self.timestamp_ns().as_u64() / NANOSECONDS_IN_MICROSECOND
    }

    /// Returns the current UNIX timestamp in milliseconds (ms).
    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ns().as_u64() / NANOSECONDS_IN_MILLISECOND
    }

    /// Returns the current UNIX timestamp in seconds.
    fn timestamp(&self) -> f64 {
        nanos_to_secs(self.timestamp_ns().as_u64())
    }

    /// Returns the current date and time as a timezone-aware `DateTime<Utc>`.
    fn utc_now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp_ns().as_i64())
    }
}

/// A real-time clock which reads the system time.
#[derive(Clone, Debug, Default)]
pub struct LiveClock;

impl LiveClock {
    /// Creates a new [`LiveClock`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        UnixNanos::from(Utc::now())
    }
}

/// A static test clock which must be set and advanced manually.
#[derive(Clone, Debug, Default)]
pub struct TestClock {
    time: UnixNanos,
}

impl TestClock {
    /// Creates a new [`TestClock`] instance at the UNIX epoch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: UnixNanos::default(),
        }
    }

    /// Sets the clock to the given `time`.
    pub fn set_time(&mut self, time: UnixNanos) {
        self.time = time;
    }

    /// Advances the clock by the given number of nanoseconds.
    pub fn advance_time(&mut self, nanos: u64) {
        self.time += nanos;
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time
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
    fn test_test_clock_set_and_advance() {
        let mut clock = TestClock::new();
        assert_eq!(clock.timestamp_ns(), UnixNanos::default());

        clock.set_time(UnixNanos::from(1_000_000_000));
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(1_000_000_000));
        assert_eq!(clock.timestamp_ms(), 1_000);
        assert_eq!(clock.timestamp(), 1.0);

        clock.advance_time(500_000_000);
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(1_500_000_000));
    }

    #[rstest]
    fn test_live_clock_monotone() {
        let clock = LiveClock::new();
        let a = clock.timestamp_ns();
        let b = clock.timestamp_ns();
        assert!(b >= a);
    }
}
