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

//! Common data and time functions.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};

use crate::nanos::UnixNanos;

/// The number of nanoseconds in one second.
pub const NANOSECONDS_IN_SECOND: u64 = 1_000_000_000;

/// The number of nanoseconds in one millisecond.
pub const NANOSECONDS_IN_MILLISECOND: u64 = 1_000_000;

/// The number of nanoseconds in one microsecond.
pub const NANOSECONDS_IN_MICROSECOND: u64 = 1_000;

/// Converts seconds to nanoseconds (ns).
#[inline]
#[must_use]
pub const fn secs_to_nanos(secs: f64) -> u64 {
    (secs * NANOSECONDS_IN_SECOND as f64) as u64
}

/// Converts milliseconds (ms) to nanoseconds (ns).
#[inline]
#[must_use]
pub const fn millis_to_nanos(millis: f64) -> u64 {
    (millis * NANOSECONDS_IN_MILLISECOND as f64) as u64
}

/// Converts nanoseconds (ns) to seconds.
#[inline]
#[must_use]
pub const fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / NANOSECONDS_IN_SECOND as f64
}

/// Converts nanoseconds (ns) to milliseconds (ms).
#[inline]
#[must_use]
pub const fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOSECONDS_IN_MILLISECOND
}

/// Checks the given datetime is UTC-tagged (zero offset).
///
/// # Errors
///
/// Returns an error if `dt` carries a non-zero UTC offset.
pub fn check_timestamp_utc(dt: &DateTime<FixedOffset>, param: &str) -> anyhow::Result<()> {
    if dt.offset().local_minus_utc() != 0 {
        anyhow::bail!(
            "invalid datetime for '{param}' not UTC, offset was {} seconds",
            dt.offset().local_minus_utc()
        )
    }
    Ok(())
}

/// Converts a UTC-tagged datetime to [`UnixNanos`].
///
/// # Errors
///
/// Returns an error if `dt` carries a non-zero UTC offset.
pub fn datetime_to_unix_nanos(dt: DateTime<FixedOffset>, param: &str) -> anyhow::Result<UnixNanos> {
    check_timestamp_utc(&dt, param)?;
    Ok(UnixNanos::from(dt.with_timezone(&Utc)))
}

/// Returns a formatted `YYYYMMDD-HHMMSS` datetime tag for the given UNIX milliseconds.
#[must_use]
pub fn get_datetime_tag(unix_ms: u64) -> String {
    let datetime = Utc
        .timestamp_millis_opt(unix_ms as i64)
        .single()
        .expect("Invalid UNIX milliseconds");
    format!(
        "{:04}{:02}{:02}-{:02}{:02}{:02}",
        datetime.year(),
        datetime.month(),
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    )
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.5, 1_500_000_000)]
    fn test_secs_to_nanos(#[case] secs: f64, #[case] expected: u64) {
        assert_eq!(secs_to_nanos(secs), expected);
    }

    #[rstest]
    fn test_nanos_round_trips() {
        assert_eq!(nanos_to_secs(2_500_000_000), 2.5);
        assert_eq!(nanos_to_millis(1_000_000), 1);
        assert_eq!(millis_to_nanos(250.0), 250_000_000);
    }

    #[rstest]
    fn test_check_timestamp_utc() {
        let utc = Utc::now().fixed_offset();
        assert!(check_timestamp_utc(&utc, "ts").is_ok());

        let offset = FixedOffset::east_opt(3600).unwrap();
        let local = Utc::now().with_timezone(&offset);
        assert!(check_timestamp_utc(&local, "ts").is_err());
    }

    #[rstest]
    fn test_datetime_to_unix_nanos() {
        let dt = Utc.timestamp_opt(60, 0).unwrap().fixed_offset();
        let nanos = datetime_to_unix_nanos(dt, "ts").unwrap();
        assert_eq!(nanos.as_u64(), 60 * NANOSECONDS_IN_SECOND);
    }

    #[rstest]
    fn test_get_datetime_tag() {
        assert_eq!(get_datetime_tag(0), "19700101-000000");
    }
}
