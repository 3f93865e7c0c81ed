//! Append-only record of decision events.
//!
//! Every trigger evaluation produces exactly one `StatisticsEntry`; the
//! caller appends it to a sink (the in-memory log here, or the SQLite
//! store in `storage`). Entries are never mutated or removed by the core;
//! retention is an external concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InterruptSettings;
use crate::error::Result;

/// Why a trigger produced no interrupt action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoActionsReason {
    /// The reminder is switched off.
    Inactive,
    /// Silent ramp-up phase before the first meditation period.
    MeditationRampUp,
    /// Trigger came from manual activation, a config change or a reboot,
    /// not from a scheduled ring.
    ManualOrConfigChangeOrReboot,
    /// Target fell outside the active day window.
    NightTime,
    /// The mute oracle asked for silence.
    Muted,
}

/// One decision event. Tagged for JSON persistence like any other
/// event stream in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatisticsEntry {
    MeditationBeginning {
        settings: InterruptSettings,
        periods: u32,
        at: DateTime<Utc>,
    },
    MeditationInterrupting {
        settings: InterruptSettings,
        period: u32,
        periods: u32,
        at: DateTime<Utc>,
    },
    MeditationEnding {
        settings: InterruptSettings,
        auto_stopped: bool,
        at: DateTime<Utc>,
    },
    /// A regular reminder ring.
    Reminder {
        settings: InterruptSettings,
        at: DateTime<Utc>,
    },
    /// A one-shot ring requested outside the schedule.
    RingOnce {
        settings: InterruptSettings,
        at: DateTime<Utc>,
    },
    /// A trigger that produced no interrupt, with the reason. Settings are
    /// present when a ring was configured but withheld.
    Suppressed {
        settings: Option<InterruptSettings>,
        reason: NoActionsReason,
        at: DateTime<Utc>,
    },
    /// The reminder was deactivated.
    Finished { at: DateTime<Utc> },
    /// The timer was re-armed for a new target.
    Rescheduling {
        target_millis: i64,
        period: Option<u32>,
        at: DateTime<Utc>,
    },
}

impl StatisticsEntry {
    /// When the event happened.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            StatisticsEntry::MeditationBeginning { at, .. }
            | StatisticsEntry::MeditationInterrupting { at, .. }
            | StatisticsEntry::MeditationEnding { at, .. }
            | StatisticsEntry::Reminder { at, .. }
            | StatisticsEntry::RingOnce { at, .. }
            | StatisticsEntry::Suppressed { at, .. }
            | StatisticsEntry::Finished { at }
            | StatisticsEntry::Rescheduling { at, .. } => *at,
        }
    }

    /// The serde tag, usable as a storage kind column.
    pub fn kind(&self) -> &'static str {
        match self {
            StatisticsEntry::MeditationBeginning { .. } => "meditation_beginning",
            StatisticsEntry::MeditationInterrupting { .. } => "meditation_interrupting",
            StatisticsEntry::MeditationEnding { .. } => "meditation_ending",
            StatisticsEntry::Reminder { .. } => "reminder",
            StatisticsEntry::RingOnce { .. } => "ring_once",
            StatisticsEntry::Suppressed { .. } => "suppressed",
            StatisticsEntry::Finished { .. } => "finished",
            StatisticsEntry::Rescheduling { .. } => "rescheduling",
        }
    }
}

/// Append-only receiver of statistics entries.
pub trait StatisticsSink {
    fn append(&mut self, entry: StatisticsEntry) -> Result<()>;
}

/// In-memory append-only log. Order is append order, which the caller
/// keeps chronological by serializing trigger evaluations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsLog {
    entries: Vec<StatisticsEntry>,
}

impl StatisticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StatisticsEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StatisticsSink for StatisticsLog {
    fn append(&mut self, entry: StatisticsEntry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }
}
