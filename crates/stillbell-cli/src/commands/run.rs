use chrono::Utc;
use stillbell_core::{
    NeverMuted, ReminderMode, ReminderStateMachine, Settings, StatisticsEntry, StatisticsSink,
    StatsDb, Trigger,
};

use super::{execute_interrupt, format_millis, now_millis, sleep_until};

/// Foreground reminder loop.
///
/// The first trigger counts as a manual activation (it only arms the
/// timer); every following trigger is a rescheduled one and may ring.
/// Each decision's entry is appended to the statistics store, and the
/// loop re-arms by sleeping until the returned target.
pub fn run(limit: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let config = settings.bell_config()?;
    let mut db = StatsDb::open()?;
    let mut machine = ReminderStateMachine::new(rand::thread_rng());

    let mut trigger = Trigger::manual(now_millis());
    let mut rings = 0u32;

    loop {
        let decision = machine.evaluate(ReminderMode::Active, &trigger, &config, &NeverMuted)?;
        if let Some(action) = &decision.action {
            execute_interrupt(action);
            rings += 1;
        }
        let reschedule = decision.reschedule;
        db.append(decision.entry)?;

        let Some(reschedule) = reschedule else {
            break;
        };
        if limit.is_some_and(|l| rings >= l) {
            break;
        }

        db.append(StatisticsEntry::Rescheduling {
            target_millis: reschedule.target_millis,
            period: reschedule.next_period,
            at: Utc::now(),
        })?;
        eprintln!("next ring at {}", format_millis(reschedule.target_millis));
        sleep_until(reschedule.target_millis);
        trigger = Trigger::rescheduled(now_millis());
    }

    db.append(StatisticsEntry::Finished { at: Utc::now() })?;
    Ok(())
}
