use chrono::Utc;
use stillbell_core::{
    InterruptAction, InterruptKind, Settings, StatisticsEntry, StatisticsSink, StatsDb,
};

use super::execute_interrupt;

/// Ring once, outside the schedule.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let config = settings.bell_config()?;

    let action = InterruptAction {
        kind: InterruptKind::Reminder,
        settings: config.reminder_interrupt.clone(),
    };
    execute_interrupt(&action);

    let mut db = StatsDb::open()?;
    db.append(StatisticsEntry::RingOnce {
        settings: config.reminder_interrupt,
        at: Utc::now(),
    })?;
    Ok(())
}
