//! Timezone-aware local-day arithmetic.
//!
//! Sessions are stored with UTC instants; every per-day question is
//! asked against the half-open interval `[local midnight, next local
//! midnight)` of the user's IANA timezone, converted to UTC. Cache
//! expiries derive from the same window so a cached daily aggregate
//! can never outlive the local day it describes.

use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Parses an IANA timezone identifier (e.g. `Europe/Sofia`).
pub fn parse_timezone(id: &str) -> Result<Tz> {
    Tz::from_str(id).map_err(|_| Error::invalid_timezone(id))
}

/// The local-day window containing a given instant, as UTC bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDayWindow {
    tz: Tz,
    day: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl LocalDayWindow {
    /// Computes the window containing `now` in the given timezone.
    pub fn compute(timezone: &str, now: DateTime<Utc>) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        let day = now.with_timezone(&tz).date_naive();
        let start = local_midnight(tz, day)?;
        let end = local_midnight(tz, day + Days::new(1))?;
        Ok(Self { tz, day, start, end })
    }

    /// Computes the window for the current instant.
    pub fn current(timezone: &str) -> Result<Self> {
        Self::compute(timezone, Utc::now())
    }

    /// Start of the local day, as a UTC instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Start of the next local day, as a UTC instant (exclusive bound).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Half-open containment check.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Time remaining until the next local midnight. Used as the cache
    /// expiry for daily aggregates, recomputed at every write.
    pub fn until_next_midnight(&self, now: DateTime<Utc>) -> StdDuration {
        (self.end - now).to_std().unwrap_or_default()
    }

    /// Staleness cutoff for streaks: the local midnight two calendar
    /// days before this window's day. A streak last advanced before
    /// this instant has missed more than one full local day.
    pub fn grace_cutoff(&self) -> DateTime<Utc> {
        local_midnight(self.tz, self.day - Days::new(2))
            .unwrap_or(self.start - chrono::Duration::days(2))
    }
}

/// Resolves a local midnight to a UTC instant. When a DST transition
/// makes midnight ambiguous the earliest valid instant wins; when it
/// skips midnight entirely the first valid hour of the day is used.
fn local_midnight(tz: Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .or_else(|| {
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0)?);
            tz.from_local_datetime(&one_am).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::internal(format!("no valid start of day for {date} in {tz}")))
}
