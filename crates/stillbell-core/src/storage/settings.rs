//! TOML-based user settings.
//!
//! Stores the schedule, the day window, meditation parameters and the
//! interrupt presentation at `~/.config/stillbell/config.toml`. The raw
//! `Settings` struct holds TOML-friendly representations (times as
//! `"HH:MM"` strings, weekdays as a number list); `bell_config()` parses
//! and validates them into the immutable [`BellConfig`] snapshot the
//! engine consumes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::{ClockTime, WeekdaySet};
use crate::config::{BellConfig, InterruptSettings};
use crate::error::{ConfigError, Result};

/// Reminder schedule section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Mean interval between rings, minutes.
    #[serde(default = "default_interval_min")]
    pub interval_min: u64,
    #[serde(default)]
    pub randomize: bool,
    /// Minute past the hour to snap rings to. Omit to disable.
    #[serde(default)]
    pub normalize_minute: Option<u32>,
    /// `"HH:MM"`.
    #[serde(default = "default_day_start")]
    pub day_start: String,
    /// `"HH:MM"`.
    #[serde(default = "default_day_end")]
    pub day_end: String,
    /// 1 = Sunday .. 7 = Saturday.
    #[serde(default = "default_weekdays")]
    pub active_weekdays: Vec<u8>,
}

/// Meditation section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationSettings {
    #[serde(default = "default_ramp_up_sec")]
    pub ramp_up_sec: u64,
    /// One entry per period, minutes.
    #[serde(default = "default_periods")]
    pub period_durations_min: Vec<u64>,
    #[serde(default)]
    pub stop_automatically: bool,
}

fn default_interval_min() -> u64 {
    60
}
fn default_day_start() -> String {
    "09:00".into()
}
fn default_day_end() -> String {
    "21:00".into()
}
fn default_weekdays() -> Vec<u8> {
    (1..=7).collect()
}
fn default_ramp_up_sec() -> u64 {
    30
}
fn default_periods() -> Vec<u64> {
    vec![25]
}

/// User settings.
///
/// Serialized to/from TOML at `~/.config/stillbell/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub meditation: MeditationSettings,
    #[serde(default)]
    pub reminder_interrupt: InterruptSettings,
    #[serde(default)]
    pub meditation_interrupt: InterruptSettings,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            interval_min: default_interval_min(),
            randomize: false,
            normalize_minute: None,
            day_start: default_day_start(),
            day_end: default_day_end(),
            active_weekdays: default_weekdays(),
        }
    }
}

impl Default for MeditationSettings {
    fn default() -> Self {
        Self {
            ramp_up_sec: default_ramp_up_sec(),
            period_durations_min: default_periods(),
            stop_automatically: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule: ScheduleSettings::default(),
            meditation: MeditationSettings::default(),
            reminder_interrupt: InterruptSettings::default(),
            meditation_interrupt: InterruptSettings::default(),
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let settings: Settings = toml::from_str(&content).map_err(|e| {
                    ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    }
                })?;
                Ok(settings)
            }
            Err(_) => {
                let settings = Self::default();
                settings.save()?;
                Ok(settings)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Build the validated configuration snapshot the engine consumes.
    pub fn bell_config(&self) -> Result<BellConfig> {
        let day_start = ClockTime::parse(&self.schedule.day_start)?;
        let day_end = ClockTime::parse(&self.schedule.day_end)?;
        let active_weekdays: WeekdaySet = self.schedule.active_weekdays.iter().copied().collect();

        let config = BellConfig {
            interval_min: self.schedule.interval_min,
            randomize: self.schedule.randomize,
            normalize_minute: self.schedule.normalize_minute,
            day_start,
            day_end,
            active_weekdays,
            ramp_up_sec: self.meditation.ramp_up_sec,
            period_durations_min: self.meditation.period_durations_min.clone(),
            stop_meditation_automatically: self.meditation.stop_automatically,
            reminder_interrupt: self.reminder_interrupt.clone(),
            meditation_interrupt: self.meditation_interrupt.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip_through_toml() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.schedule.interval_min, 60);
        assert_eq!(parsed.schedule.day_start, "09:00");
        assert_eq!(parsed.meditation.period_durations_min, vec![25]);
    }

    #[test]
    fn empty_toml_gets_full_defaults() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert_eq!(parsed.schedule.active_weekdays, (1..=7).collect::<Vec<_>>());
        assert!(parsed.reminder_interrupt.sound);
    }

    #[test]
    fn bell_config_parses_times_and_validates() {
        let settings = Settings::default();
        let config = settings.bell_config().unwrap();
        assert_eq!(config.day_start, ClockTime::new(9, 0).unwrap());
        assert_eq!(config.day_end, ClockTime::new(21, 0).unwrap());
        assert_eq!(config.active_weekdays.len(), 7);
    }

    #[test]
    fn bell_config_rejects_bad_time_string() {
        let settings = Settings {
            schedule: ScheduleSettings {
                day_start: "25:00".into(),
                ..ScheduleSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.bell_config().is_err());
    }

    #[test]
    fn bell_config_rejects_empty_weekdays() {
        let settings = Settings {
            schedule: ScheduleSettings {
                active_weekdays: vec![],
                ..ScheduleSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.bell_config().is_err());
    }
}
