pub mod config;
pub mod meditate;
pub mod ring;
pub mod run;
pub mod stats;
pub mod status;

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use stillbell_core::InterruptAction;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch millis as a local RFC3339 string for display.
pub fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

/// Execute an interrupt action: terminal bell plus a JSON event line.
pub fn execute_interrupt(action: &InterruptAction) {
    if action.settings.sound {
        print!("\x07");
    }
    if action.settings.show {
        if let Ok(json) = serde_json::to_string(action) {
            println!("{json}");
        }
    }
    let _ = std::io::stdout().flush();
}

/// Block until the target instant has passed.
pub fn sleep_until(target_millis: i64) {
    let delta = target_millis - now_millis();
    if delta > 0 {
        std::thread::sleep(std::time::Duration::from_millis(delta as u64));
    }
}
