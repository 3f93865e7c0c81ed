//! # Stillbell Core Library
//!
//! Scheduling and decision engine for a mindfulness bell: periodic
//! reminders with optional gaussian jitter and minute-grid alignment,
//! restricted to a configurable day window and active weekdays, plus a
//! guided meditation sequence (silent ramp-up followed by timed periods).
//!
//! The core is synchronous and caller-driven: an external timer fires, the
//! caller passes the current [`ReminderMode`] and trigger context into the
//! [`ReminderStateMachine`], and gets back a [`Decision`] describing what
//! to ring, what to log and when to re-arm the timer. The core holds no
//! state across calls except the randomization source.
//!
//! ## Key Components
//!
//! - [`ClockTime`]: wall-clock values and the day/night window logic
//! - [`scheduler`]: pure next-trigger time arithmetic
//! - [`ReminderStateMachine`]: the per-trigger decision engine
//! - [`StatisticsLog`] / [`StatsDb`]: append-only decision history
//! - [`Settings`]: TOML-persisted user settings

pub mod clock;
pub mod config;
pub mod error;
pub mod reminder;
pub mod scheduler;
pub mod statistics;
pub mod storage;

pub use clock::{ClockTime, WeekdaySet};
pub use config::{BellConfig, InterruptSettings};
pub use error::{ConfigError, CoreError, Result, StorageError};
pub use reminder::{
    Decision, InterruptAction, InterruptKind, MuteOracle, NeverMuted, ReminderMode,
    ReminderStateMachine, Reschedule, Trigger,
};
pub use statistics::{NoActionsReason, StatisticsEntry, StatisticsLog, StatisticsSink};
pub use storage::{data_dir, MeditationSettings, ScheduleSettings, Settings, StatsDb};
