use stillbell_core::{
    NeverMuted, ReminderMode, ReminderStateMachine, Settings, StatisticsSink, StatsDb, Trigger,
};

use super::{execute_interrupt, format_millis, now_millis, sleep_until};

/// Drive the guided meditation sequence: silent ramp-up, then one timed
/// period per configured duration, ending with the final ring.
///
/// With `--dry-run` the period schedule is printed without waiting,
/// ringing or recording statistics.
pub fn run(dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let config = settings.bell_config()?;
    let mut db = if dry_run { None } else { Some(StatsDb::open()?) };
    let mut machine = ReminderStateMachine::new(rand::thread_rng());

    let mut period = 0u32;
    let mut trigger = Trigger::rescheduled(now_millis());

    loop {
        let decision = machine.evaluate(
            ReminderMode::Meditating { period },
            &trigger,
            &config,
            &NeverMuted,
        )?;
        if let Some(action) = &decision.action {
            if dry_run {
                println!("period {period}: {}", kind_label(action.kind));
            } else {
                execute_interrupt(action);
            }
        }
        let reschedule = decision.reschedule;
        if let Some(db) = db.as_mut() {
            db.append(decision.entry)?;
        }

        let Some(reschedule) = reschedule else {
            break;
        };
        period = reschedule.next_period.unwrap_or(period + 1);

        if dry_run {
            println!(
                "period {period} begins at {}",
                format_millis(reschedule.target_millis)
            );
            trigger = Trigger::rescheduled(reschedule.target_millis);
        } else {
            sleep_until(reschedule.target_millis);
            trigger = Trigger::rescheduled(now_millis());
        }
    }

    Ok(())
}

fn kind_label(kind: stillbell_core::InterruptKind) -> &'static str {
    match kind {
        stillbell_core::InterruptKind::Reminder => "reminder",
        stillbell_core::InterruptKind::MeditationBeginning => "meditation beginning",
        stillbell_core::InterruptKind::MeditationInterrupting => "meditation interrupting",
        stillbell_core::InterruptKind::MeditationEnding => "meditation ending",
    }
}
