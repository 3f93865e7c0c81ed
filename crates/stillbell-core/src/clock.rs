//! Wall-clock time-of-day values and day/night window logic.
//!
//! `ClockTime` is an immutable hour:minute value, optionally tagged with a
//! weekday, used for both the configured day window boundaries (no weekday)
//! and concrete instants derived from the local calendar (weekday present).
//! The interesting part is `is_daytime`: a window that wraps midnight is
//! attributed to the weekday it *started* on, so a Friday-night window that
//! runs past midnight stays governed by Friday's activation flag.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Active weekdays, numbered 1 (Sunday) through 7 (Saturday).
pub type WeekdaySet = BTreeSet<u8>;

pub const SUNDAY: u8 = 1;
pub const SATURDAY: u8 = 7;

/// Returns the full week, Sunday through Saturday.
pub fn all_weekdays() -> WeekdaySet {
    (SUNDAY..=SATURDAY).collect()
}

/// An immutable wall-clock time of day.
///
/// Equality and hashing consider hour, minute and weekday only; the
/// ordering predicates ignore the weekday entirely. A `None` weekday means
/// the value is weekday-insensitive (a window boundary rather than a
/// concrete instant).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
    second: Option<u32>,
    millisecond: Option<u32>,
    /// 1 = Sunday .. 7 = Saturday.
    weekday: Option<u8>,
}

impl ClockTime {
    /// Create a time of day. Fails if hour or minute is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        Self::validate(hour, minute, None, None, None)?;
        Ok(Self {
            hour,
            minute,
            second: None,
            millisecond: None,
            weekday: None,
        })
    }

    /// Create a weekday-tagged time of day (1 = Sunday .. 7 = Saturday).
    pub fn with_weekday(hour: u32, minute: u32, weekday: u8) -> Result<Self> {
        Self::validate(hour, minute, None, None, Some(weekday))?;
        Ok(Self {
            hour,
            minute,
            second: None,
            millisecond: None,
            weekday: Some(weekday),
        })
    }

    /// Known-valid construction for crate-internal constants.
    pub(crate) const fn from_parts(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            second: None,
            millisecond: None,
            weekday: None,
        }
    }

    fn validate(
        hour: u32,
        minute: u32,
        second: Option<u32>,
        millisecond: Option<u32>,
        weekday: Option<u8>,
    ) -> Result<()> {
        if hour > 23 {
            return Err(CoreError::InvalidArgument(format!("hour out of range: {hour}")));
        }
        if minute > 59 {
            return Err(CoreError::InvalidArgument(format!(
                "minute out of range: {minute}"
            )));
        }
        if let Some(s) = second {
            if s > 59 {
                return Err(CoreError::InvalidArgument(format!("second out of range: {s}")));
            }
        }
        if let Some(ms) = millisecond {
            if ms > 999 {
                return Err(CoreError::InvalidArgument(format!(
                    "millisecond out of range: {ms}"
                )));
            }
        }
        if let Some(d) = weekday {
            if !(SUNDAY..=SATURDAY).contains(&d) {
                return Err(CoreError::InvalidArgument(format!(
                    "weekday out of range: {d}"
                )));
            }
        }
        Ok(())
    }

    /// Derive hour/minute/second/millisecond and weekday from an epoch
    /// instant in the local timezone.
    pub fn from_millis(epoch_millis: i64) -> Result<Self> {
        let utc = DateTime::from_timestamp_millis(epoch_millis).ok_or_else(|| {
            CoreError::InvalidArgument(format!("timestamp out of range: {epoch_millis}"))
        })?;
        Ok(Self::from_local(&utc.with_timezone(&Local)))
    }

    /// Derive from a local calendar instant.
    pub fn from_local(dt: &DateTime<Local>) -> Self {
        Self {
            hour: dt.hour(),
            minute: dt.minute(),
            second: Some(dt.second()),
            millisecond: Some(dt.timestamp_subsec_millis().min(999)),
            weekday: Some(dt.weekday().num_days_from_sunday() as u8 + 1),
        }
    }

    /// Parse `"hh"` or `"hh:mm"`. The result carries no weekday.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        let hour_str = parts.next().unwrap_or("");
        let hour: u32 = hour_str
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidArgument(format!("malformed time string: {s:?}")))?;
        let minute: u32 = match parts.next() {
            Some(m) => m
                .trim()
                .parse()
                .map_err(|_| CoreError::InvalidArgument(format!("malformed time string: {s:?}")))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(CoreError::InvalidArgument(format!(
                "malformed time string: {s:?}"
            )));
        }
        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.millisecond
    }

    /// 1 = Sunday .. 7 = Saturday, if this value is tagged.
    pub fn weekday(&self) -> Option<u8> {
        self.weekday
    }

    /// True iff this time of day comes strictly before `other`.
    /// Weekday tags are ignored.
    pub fn is_before(&self, other: &ClockTime) -> bool {
        self.hour < other.hour || (self.hour == other.hour && self.minute < other.minute)
    }

    /// Hour and minute equal; weekday ignored.
    pub fn is_same_time(&self, other: &ClockTime) -> bool {
        self.hour == other.hour && self.minute == other.minute
    }

    /// Semi-open membership in `[start, end)`.
    ///
    /// A window whose start equals this time is always considered active.
    /// When `end` is not after `start` the window wraps midnight.
    pub fn is_in_interval(&self, start: &ClockTime, end: &ClockTime) -> bool {
        if self.is_same_time(start) {
            true
        } else if start.is_before(end) {
            start.is_before(self) && self.is_before(end)
        } else {
            start.is_before(self) || self.is_before(end)
        }
    }

    /// True iff this instant falls in the active day window on an active
    /// weekday.
    ///
    /// For a midnight-wrapping window, an instant on the morning side
    /// (before `end`) belongs to the day the window started on, so the
    /// activation check uses the previous weekday.
    pub fn is_daytime(&self, start: &ClockTime, end: &ClockTime, active: &WeekdaySet) -> bool {
        if !self.is_in_interval(start, end) {
            return false;
        }
        if start.is_before(end) {
            weekday_active(self.weekday, active)
        } else if self.is_before(end) {
            weekday_active(self.weekday.map(previous_weekday), active)
        } else {
            weekday_active(self.weekday, active)
        }
    }

    /// Membership of this value's weekday in the active set. A value
    /// without a weekday tag is active on any day.
    pub fn is_active_on(&self, active: &WeekdaySet) -> bool {
        weekday_active(self.weekday, active)
    }
}

/// Sunday (1) wraps back to Saturday (7).
pub(crate) fn previous_weekday(weekday: u8) -> u8 {
    if weekday == SUNDAY {
        SATURDAY
    } else {
        weekday - 1
    }
}

fn weekday_active(weekday: Option<u8>, active: &WeekdaySet) -> bool {
    match weekday {
        Some(d) => active.contains(&d),
        None => true,
    }
}

impl PartialEq for ClockTime {
    fn eq(&self, other: &Self) -> bool {
        self.hour == other.hour && self.minute == other.minute && self.weekday == other.weekday
    }
}

impl Eq for ClockTime {}

impl Hash for ClockTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hour.hash(state);
        self.minute.hash(state);
        self.weekday.hash(state);
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
