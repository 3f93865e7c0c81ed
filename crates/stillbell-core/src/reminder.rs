//! Per-trigger decision engine.
//!
//! The engine is a synchronous state machine over [`ReminderMode`]. It does
//! not own the mode or arm timers itself - the caller supplies the current
//! mode with each trigger, executes the returned interrupt action, appends
//! the statistics entry, persists the next period and re-arms the timer
//! from the reschedule instruction. The only state carried across calls is
//! the randomization source.
//!
//! ## Decision shape
//!
//! Every evaluation yields zero or one interrupt action, exactly one
//! statistics entry, zero or one reschedule instruction and an optional
//! auto-stop request. Meditation takes priority over the active reminder;
//! only the end of a meditation leaves the timer un-armed.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::config::{BellConfig, InterruptSettings};
use crate::error::{CoreError, Result};
use crate::scheduler;
use crate::statistics::{NoActionsReason, StatisticsEntry};

/// The mode the reminder is in when a trigger arrives. Owned and persisted
/// by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReminderMode {
    Inactive,
    /// Period 0 is the silent ramp-up; periods 1..=N ring.
    Meditating { period: u32 },
    Active,
}

/// One firing of the external timer.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub now_millis: i64,
    /// True when this trigger comes from a previously armed reschedule,
    /// false for manual activation, config changes and reboots.
    pub rescheduled: bool,
}

impl Trigger {
    pub fn rescheduled(now_millis: i64) -> Self {
        Self {
            now_millis,
            rescheduled: true,
        }
    }

    pub fn manual(now_millis: i64) -> Self {
        Self {
            now_millis,
            rescheduled: false,
        }
    }
}

/// What kind of interrupt to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    Reminder,
    MeditationBeginning,
    MeditationInterrupting,
    MeditationEnding,
}

/// A request to show/sound/vibrate, executed by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterruptAction {
    pub kind: InterruptKind,
    pub settings: InterruptSettings,
}

/// Instruction to re-arm the external timer. Cancel-old-then-schedule-new
/// is the caller's job; each decision supersedes any previous target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reschedule {
    pub target_millis: i64,
    /// Next meditation period to persist, when meditating.
    pub next_period: Option<u32>,
}

/// The outcome of one trigger evaluation, consumed immediately by the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Option<InterruptAction>,
    /// The caller should leave meditation mode (auto-stop after the last
    /// period).
    pub stop_meditation: bool,
    pub entry: StatisticsEntry,
    pub reschedule: Option<Reschedule>,
}

/// Reports whether the platform asks for silence right now.
///
/// Consulted only for rescheduled triggers in active-reminder mode.
/// `strict` additionally treats do-not-disturb-like states as muted.
pub trait MuteOracle {
    fn is_mute_requested(&self, strict: bool) -> bool;
}

/// Oracle for callers without platform mute detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverMuted;

impl MuteOracle for NeverMuted {
    fn is_mute_requested(&self, _strict: bool) -> bool {
        false
    }
}

/// The decision engine. Holds only the randomization source; everything
/// else arrives with the call.
#[derive(Debug)]
pub struct ReminderStateMachine<R: Rng> {
    rng: R,
}

impl<R: Rng> ReminderStateMachine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Evaluate one trigger. Infallible for valid inputs; errors only
    /// surface from malformed timestamps or configuration.
    pub fn evaluate(
        &mut self,
        mode: ReminderMode,
        trigger: &Trigger,
        config: &BellConfig,
        mute: &dyn MuteOracle,
    ) -> Result<Decision> {
        let at = timestamp(trigger.now_millis)?;
        match mode {
            ReminderMode::Inactive => Ok(Decision {
                action: None,
                stop_meditation: false,
                entry: StatisticsEntry::Suppressed {
                    settings: None,
                    reason: NoActionsReason::Inactive,
                    at,
                },
                reschedule: None,
            }),
            ReminderMode::Meditating { period } => {
                self.evaluate_meditation(period, trigger, config, at)
            }
            ReminderMode::Active => self.evaluate_active(trigger, config, mute, at),
        }
    }

    fn evaluate_meditation(
        &mut self,
        period: u32,
        trigger: &Trigger,
        config: &BellConfig,
        at: DateTime<Utc>,
    ) -> Result<Decision> {
        let periods = config.period_count();
        let settings = config.meditation_interrupt.clone();

        if period == 0 {
            // Silent ramp-up; the first period begins when the timer fires
            // again.
            return Ok(Decision {
                action: None,
                stop_meditation: false,
                entry: StatisticsEntry::Suppressed {
                    settings: None,
                    reason: NoActionsReason::MeditationRampUp,
                    at,
                },
                reschedule: Some(Reschedule {
                    target_millis: trigger.now_millis + config.ramp_up_millis(),
                    next_period: Some(1),
                }),
            });
        }

        if period > periods {
            // Past the last period: final ring, timer stays un-armed.
            let auto_stopped = config.stop_meditation_automatically;
            return Ok(Decision {
                action: Some(InterruptAction {
                    kind: InterruptKind::MeditationEnding,
                    settings: settings.clone(),
                }),
                stop_meditation: auto_stopped,
                entry: StatisticsEntry::MeditationEnding {
                    settings,
                    auto_stopped,
                    at,
                },
                reschedule: None,
            });
        }

        let duration = config.period_duration_millis(period).ok_or_else(|| {
            CoreError::InvalidArgument(format!("no duration for meditation period {period}"))
        })?;
        let reschedule = Some(Reschedule {
            target_millis: trigger.now_millis + duration,
            next_period: Some(period + 1),
        });

        if period == 1 {
            Ok(Decision {
                action: Some(InterruptAction {
                    kind: InterruptKind::MeditationBeginning,
                    settings: settings.clone(),
                }),
                stop_meditation: false,
                entry: StatisticsEntry::MeditationBeginning {
                    settings,
                    periods,
                    at,
                },
                reschedule,
            })
        } else {
            Ok(Decision {
                action: Some(InterruptAction {
                    kind: InterruptKind::MeditationInterrupting,
                    settings: settings.clone(),
                }),
                stop_meditation: false,
                entry: StatisticsEntry::MeditationInterrupting {
                    settings,
                    period,
                    periods,
                    at,
                },
                reschedule,
            })
        }
    }

    fn evaluate_active(
        &mut self,
        trigger: &Trigger,
        config: &BellConfig,
        mute: &dyn MuteOracle,
        at: DateTime<Utc>,
    ) -> Result<Decision> {
        // Re-arm through the scheduler on every active-mode branch, even
        // when the ring itself is suppressed.
        let target = scheduler::next_target_millis(trigger.now_millis, config, &mut self.rng)?;
        let reschedule = Some(Reschedule {
            target_millis: target,
            next_period: None,
        });

        if !trigger.rescheduled {
            return Ok(Decision {
                action: None,
                stop_meditation: false,
                entry: StatisticsEntry::Suppressed {
                    settings: None,
                    reason: NoActionsReason::ManualOrConfigChangeOrReboot,
                    at,
                },
                reschedule,
            });
        }

        let settings = config.reminder_interrupt.clone();
        let now_time = ClockTime::from_millis(trigger.now_millis)?;
        if !config.is_daytime(&now_time) {
            return Ok(Decision {
                action: None,
                stop_meditation: false,
                entry: StatisticsEntry::Suppressed {
                    settings: Some(settings),
                    reason: NoActionsReason::NightTime,
                    at,
                },
                reschedule,
            });
        }

        if mute.is_mute_requested(true) {
            return Ok(Decision {
                action: None,
                stop_meditation: false,
                entry: StatisticsEntry::Suppressed {
                    settings: Some(settings),
                    reason: NoActionsReason::Muted,
                    at,
                },
                reschedule,
            });
        }

        Ok(Decision {
            action: Some(InterruptAction {
                kind: InterruptKind::Reminder,
                settings: settings.clone(),
            }),
            stop_meditation: false,
            entry: StatisticsEntry::Reminder { settings, at },
            reschedule,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CoreError::InvalidArgument(format!("timestamp out of range: {millis}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    const MINUTE: i64 = 60 * 1000;

    struct AlwaysMuted;

    impl MuteOracle for AlwaysMuted {
        fn is_mute_requested(&self, _strict: bool) -> bool {
            true
        }
    }

    fn machine() -> ReminderStateMachine<Mcg128Xsl64> {
        ReminderStateMachine::new(Mcg128Xsl64::seed_from_u64(7))
    }

    fn local_millis(h: u32, mi: u32) -> i64 {
        // Monday 2025-06-16, inside the default 09:00..21:00 window for
        // daytime hours.
        Local
            .with_ymd_and_hms(2025, 6, 16, h, mi, 0)
            .single()
            .expect("unambiguous test instant")
            .timestamp_millis()
    }

    #[test]
    fn inactive_mode_does_nothing() {
        let mut machine = machine();
        let decision = machine
            .evaluate(
                ReminderMode::Inactive,
                &Trigger::rescheduled(local_millis(10, 0)),
                &BellConfig::default(),
                &NeverMuted,
            )
            .unwrap();
        assert!(decision.action.is_none());
        assert!(decision.reschedule.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::Suppressed {
                reason: NoActionsReason::Inactive,
                ..
            }
        ));
    }

    #[test]
    fn ramp_up_is_silent_and_arms_first_period() {
        let config = BellConfig {
            ramp_up_sec: 45,
            ..BellConfig::default()
        };
        let now = local_millis(10, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Meditating { period: 0 },
                &Trigger::rescheduled(now),
                &config,
                &NeverMuted,
            )
            .unwrap();
        assert!(decision.action.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::Suppressed {
                reason: NoActionsReason::MeditationRampUp,
                ..
            }
        ));
        assert_eq!(
            decision.reschedule,
            Some(Reschedule {
                target_millis: now + 45_000,
                next_period: Some(1),
            })
        );
    }

    #[test]
    fn first_period_begins_meditation() {
        // Scenario: period 1 with a 5 minute duration rings the beginning
        // bell and arms period 2.
        let config = BellConfig {
            period_durations_min: vec![5, 10, 5],
            ..BellConfig::default()
        };
        let now = local_millis(10, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Meditating { period: 1 },
                &Trigger::rescheduled(now),
                &config,
                &NeverMuted,
            )
            .unwrap();
        assert_eq!(
            decision.action.as_ref().map(|a| a.kind),
            Some(InterruptKind::MeditationBeginning)
        );
        assert!(matches!(
            decision.entry,
            StatisticsEntry::MeditationBeginning { periods: 3, .. }
        ));
        assert_eq!(
            decision.reschedule,
            Some(Reschedule {
                target_millis: now + 5 * MINUTE,
                next_period: Some(2),
            })
        );
    }

    #[test]
    fn middle_periods_interrupt() {
        let config = BellConfig {
            period_durations_min: vec![5, 10, 5],
            ..BellConfig::default()
        };
        let now = local_millis(10, 5);
        let decision = machine()
            .evaluate(
                ReminderMode::Meditating { period: 2 },
                &Trigger::rescheduled(now),
                &config,
                &NeverMuted,
            )
            .unwrap();
        assert_eq!(
            decision.action.as_ref().map(|a| a.kind),
            Some(InterruptKind::MeditationInterrupting)
        );
        assert!(matches!(
            decision.entry,
            StatisticsEntry::MeditationInterrupting {
                period: 2,
                periods: 3,
                ..
            }
        ));
        assert_eq!(
            decision.reschedule,
            Some(Reschedule {
                target_millis: now + 10 * MINUTE,
                next_period: Some(3),
            })
        );
    }

    #[test]
    fn past_last_period_ends_meditation() {
        let config = BellConfig {
            period_durations_min: vec![5],
            stop_meditation_automatically: true,
            ..BellConfig::default()
        };
        let decision = machine()
            .evaluate(
                ReminderMode::Meditating { period: 2 },
                &Trigger::rescheduled(local_millis(10, 10)),
                &config,
                &NeverMuted,
            )
            .unwrap();
        assert_eq!(
            decision.action.as_ref().map(|a| a.kind),
            Some(InterruptKind::MeditationEnding)
        );
        assert!(decision.stop_meditation);
        assert!(decision.reschedule.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::MeditationEnding {
                auto_stopped: true,
                ..
            }
        ));
    }

    #[test]
    fn manual_trigger_only_reschedules() {
        let now = local_millis(10, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Active,
                &Trigger::manual(now),
                &BellConfig::default(),
                &NeverMuted,
            )
            .unwrap();
        assert!(decision.action.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::Suppressed {
                reason: NoActionsReason::ManualOrConfigChangeOrReboot,
                ..
            }
        ));
        // Mean interval 60 min, no randomization: re-armed for 11:00.
        assert_eq!(
            decision.reschedule,
            Some(Reschedule {
                target_millis: now + 60 * MINUTE,
                next_period: None,
            })
        );
    }

    #[test]
    fn daytime_rescheduled_trigger_rings() {
        let now = local_millis(10, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Active,
                &Trigger::rescheduled(now),
                &BellConfig::default(),
                &NeverMuted,
            )
            .unwrap();
        assert_eq!(
            decision.action.as_ref().map(|a| a.kind),
            Some(InterruptKind::Reminder)
        );
        assert!(matches!(decision.entry, StatisticsEntry::Reminder { .. }));
        assert_eq!(
            decision.reschedule.map(|r| r.target_millis),
            Some(now + 60 * MINUTE)
        );
    }

    #[test]
    fn night_trigger_is_suppressed_but_rearmed() {
        // 22:00 is outside the default 09:00..21:00 window.
        let now = local_millis(22, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Active,
                &Trigger::rescheduled(now),
                &BellConfig::default(),
                &NeverMuted,
            )
            .unwrap();
        assert!(decision.action.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::Suppressed {
                reason: NoActionsReason::NightTime,
                settings: Some(_),
                ..
            }
        ));
        assert!(decision.reschedule.is_some());
    }

    #[test]
    fn muted_trigger_is_suppressed_but_rearmed() {
        // Scenario: mute oracle reports silence; no action, Muted entry,
        // reschedule still computed through the scheduler.
        let now = local_millis(10, 0);
        let decision = machine()
            .evaluate(
                ReminderMode::Active,
                &Trigger::rescheduled(now),
                &BellConfig::default(),
                &AlwaysMuted,
            )
            .unwrap();
        assert!(decision.action.is_none());
        assert!(matches!(
            decision.entry,
            StatisticsEntry::Suppressed {
                reason: NoActionsReason::Muted,
                ..
            }
        ));
        assert_eq!(
            decision.reschedule.map(|r| r.target_millis),
            Some(now + 60 * MINUTE)
        );
    }
}
