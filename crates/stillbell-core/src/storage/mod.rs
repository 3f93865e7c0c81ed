mod settings;
mod stats_db;

pub use settings::{MeditationSettings, ScheduleSettings, Settings};
pub use stats_db::StatsDb;

use std::path::PathBuf;

use crate::error::Result;

/// Directory name under `~/.config` for the given STILLBELL_ENV value.
/// Anything other than `dev` maps to the regular directory.
fn dir_name(env: Option<&str>) -> &'static str {
    match env {
        Some("dev") => "stillbell-dev",
        _ => "stillbell",
    }
}

/// Returns `~/.config/stillbell[-dev]/`, creating it if needed.
///
/// Set STILLBELL_ENV=dev to keep development settings and statistics
/// apart from the real ones.
pub fn data_dir() -> Result<PathBuf> {
    let env = std::env::var("STILLBELL_ENV").ok();
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(dir_name(env.as_deref()));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
