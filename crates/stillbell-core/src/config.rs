//! Immutable configuration snapshot for the scheduling engine.
//!
//! `BellConfig` is built once (from [`crate::storage::Settings`] or by
//! hand) and passed by reference into every scheduling and trigger
//! evaluation call. The engine never reads configuration from anywhere
//! else.

use serde::{Deserialize, Serialize};

use crate::clock::{all_weekdays, ClockTime, WeekdaySet, SATURDAY, SUNDAY};
use crate::error::ConfigError;

const MINUTE_MILLIS: i64 = 60 * 1000;

/// How a single interrupt should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptSettings {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default)]
    pub vibrate: bool,
    #[serde(default = "default_true")]
    pub show: bool,
    /// Playback volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

fn default_true() -> bool {
    true
}

fn default_volume() -> u32 {
    50
}

impl Default for InterruptSettings {
    fn default() -> Self {
        Self {
            sound: true,
            vibrate: false,
            show: true,
            volume: default_volume(),
        }
    }
}

/// Validated, read-only configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BellConfig {
    /// Mean reminder interval in minutes.
    pub interval_min: u64,
    /// Apply gaussian jitter to each interval.
    pub randomize: bool,
    /// Snap targets to this minute past the hour grid. `None` disables.
    pub normalize_minute: Option<u32>,
    /// Start of the active day window.
    pub day_start: ClockTime,
    /// End of the active day window. May be before `day_start`, in which
    /// case the window wraps midnight.
    pub day_end: ClockTime,
    /// Weekdays the bell is active on, 1 = Sunday .. 7 = Saturday.
    pub active_weekdays: WeekdaySet,
    /// Silent ramp-up before the first meditation period, in seconds.
    pub ramp_up_sec: u64,
    /// Meditation period lengths in minutes, one entry per period.
    pub period_durations_min: Vec<u64>,
    /// Leave meditation mode automatically after the last period.
    pub stop_meditation_automatically: bool,
    /// Presentation of regular reminder rings.
    pub reminder_interrupt: InterruptSettings,
    /// Presentation of meditation period rings.
    pub meditation_interrupt: InterruptSettings,
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            interval_min: 60,
            randomize: false,
            normalize_minute: None,
            day_start: ClockTime::from_parts(9, 0),
            day_end: ClockTime::from_parts(21, 0),
            active_weekdays: all_weekdays(),
            ramp_up_sec: 30,
            period_durations_min: vec![25],
            stop_meditation_automatically: false,
            reminder_interrupt: InterruptSettings::default(),
            meditation_interrupt: InterruptSettings::default(),
        }
    }
}

impl BellConfig {
    /// Mean interval in epoch milliseconds.
    pub fn interval_millis(&self) -> i64 {
        self.interval_min as i64 * MINUTE_MILLIS
    }

    /// Grid offset in milliseconds, if normalization is enabled.
    pub fn normalize_offset_millis(&self) -> Option<i64> {
        self.normalize_minute.map(|m| m as i64 * MINUTE_MILLIS)
    }

    pub fn ramp_up_millis(&self) -> i64 {
        self.ramp_up_sec as i64 * 1000
    }

    /// Number of meditation periods.
    pub fn period_count(&self) -> u32 {
        self.period_durations_min.len() as u32
    }

    /// Duration of the 1-based meditation period, in milliseconds.
    pub fn period_duration_millis(&self, period: u32) -> Option<i64> {
        if period == 0 {
            return None;
        }
        self.period_durations_min
            .get(period as usize - 1)
            .map(|min| *min as i64 * MINUTE_MILLIS)
    }

    /// Whether the given instant is inside the active window on an active
    /// weekday.
    pub fn is_daytime(&self, time: &ClockTime) -> bool {
        time.is_daytime(&self.day_start, &self.day_end, &self.active_weekdays)
    }

    /// Check invariants the scheduler relies on. Callers must validate
    /// before invoking the scheduler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_min == 0 {
            return Err(ConfigError::InvalidValue {
                key: "interval_min".into(),
                message: "interval must be at least one minute".into(),
            });
        }
        if self.active_weekdays.is_empty() {
            return Err(ConfigError::NoActiveWeekdays);
        }
        if let Some(day) = self
            .active_weekdays
            .iter()
            .find(|d| !(SUNDAY..=SATURDAY).contains(d))
        {
            return Err(ConfigError::InvalidValue {
                key: "active_weekdays".into(),
                message: format!("weekday out of range: {day}"),
            });
        }
        if let Some(minute) = self.normalize_minute {
            if minute > 59 {
                return Err(ConfigError::InvalidValue {
                    key: "normalize_minute".into(),
                    message: format!("minute out of range: {minute}"),
                });
            }
        }
        if self.period_durations_min.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "period_durations_min".into(),
                message: "at least one meditation period is required".into(),
            });
        }
        if self.period_durations_min.iter().any(|min| *min == 0) {
            return Err(ConfigError::InvalidValue {
                key: "period_durations_min".into(),
                message: "meditation periods must be at least one minute".into(),
            });
        }
        for (key, interrupt) in [
            ("reminder_interrupt", &self.reminder_interrupt),
            ("meditation_interrupt", &self.meditation_interrupt),
        ] {
            if interrupt.volume > 100 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("volume out of range: {}", interrupt.volume),
                });
            }
        }
        Ok(())
    }
}
