//! Exchange time zone helpers.
//!
//! What this module provides:
//! - [`parse_exchange_tz`]: Parse an IANA zone name (e.g. "America/New_York").
//! - [`to_exchange_local`]: Wall-clock time of a [`BarTime`] on the exchange's clock.
//!   Aware timestamps are converted through their offset; naive timestamps are
//!   assumed to already be exchange-local and pass through untouched.
//! - [`exchange_year`]: Calendar year of a bar on the exchange's clock.
//!
//! Examples
//! - "2024-07-15T13:45:00Z" in New York is 09:45 (EDT, UTC-4).
//! - "2024-01-15T13:45:00Z" in New York is 08:45 (EST, UTC-5).
//! - "2025-01-01T03:00:00Z" in New York is still 2024-12-31 22:00.

use bar_store::models::bar::BarTime;
use chrono::{Datelike, NaiveDateTime};
use chrono_tz::Tz;

use crate::error::ConfigError;

pub const DEFAULT_EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

pub fn parse_exchange_tz(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse()
        .map_err(|_| ConfigError::UnknownTimeZone(name.to_string()))
}

pub fn to_exchange_local(ts: &BarTime, tz: Tz) -> NaiveDateTime {
    match ts {
        BarTime::Aware(dt) => dt.with_timezone(&tz).naive_local(),
        BarTime::Naive(naive) => *naive,
    }
}

pub fn exchange_year(ts: &BarTime, tz: Tz) -> i32 {
    to_exchange_local(ts, tz).year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn aware(s: &str) -> BarTime {
        s.parse().unwrap()
    }

    #[test]
    fn summer_and_winter_offsets_differ() {
        let july = to_exchange_local(&aware("2024-07-15T13:45:00Z"), DEFAULT_EXCHANGE_TZ);
        assert_eq!((july.hour(), july.minute()), (9, 45));

        let january = to_exchange_local(&aware("2024-01-15T13:45:00Z"), DEFAULT_EXCHANGE_TZ);
        assert_eq!((january.hour(), january.minute()), (8, 45));
    }

    #[test]
    fn naive_passes_through() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(to_exchange_local(&BarTime::Naive(naive), DEFAULT_EXCHANGE_TZ), naive);
    }

    #[test]
    fn new_year_in_utc_is_old_year_in_new_york() {
        assert_eq!(exchange_year(&aware("2025-01-01T03:00:00Z"), DEFAULT_EXCHANGE_TZ), 2024);
        assert_eq!(exchange_year(&aware("2025-01-01T06:00:00Z"), DEFAULT_EXCHANGE_TZ), 2025);
    }

    #[test]
    fn offset_timestamps_convert_to_exchange_clock() {
        // 15:30 in London summer time is 10:30 in New York
        let ts = aware("2024-07-15T15:30:00+01:00");
        let local = to_exchange_local(&ts, DEFAULT_EXCHANGE_TZ);
        assert_eq!((local.hour(), local.minute()), (10, 30));
    }

    #[test]
    fn unknown_zone_is_config_error() {
        assert_eq!(parse_exchange_tz(" America/New_York ").unwrap(), DEFAULT_EXCHANGE_TZ);
        assert_eq!(
            parse_exchange_tz("Mars/Olympus"),
            Err(ConfigError::UnknownTimeZone("Mars/Olympus".into()))
        );
    }
}
