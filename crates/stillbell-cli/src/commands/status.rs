use stillbell_core::{scheduler, ClockTime, Settings};

use super::{format_millis, now_millis};

/// Print the current day/night state and upcoming instants as JSON.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let config = settings.bell_config()?;

    let now = now_millis();
    let now_time = ClockTime::from_millis(now)?;
    let mut rng = rand::thread_rng();
    let next_target = scheduler::next_target_millis(now, &config, &mut rng)?;
    let next_change = scheduler::next_day_night_change_millis(now, &config)?;

    let status = serde_json::json!({
        "now": format_millis(now),
        "daytime": config.is_daytime(&now_time),
        "next_target": format_millis(next_target),
        "next_day_night_change": format_millis(next_change),
        "interval_min": config.interval_min,
        "randomize": config.randomize,
        "normalize_minute": config.normalize_minute,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
