use clap::Subcommand;
use stillbell_core::{data_dir, Settings};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current settings as TOML
    Show,
    /// Print the settings file path
    Path,
    /// Update settings fields; omitted options are left unchanged
    Set {
        /// Mean interval between rings, minutes
        #[arg(long)]
        interval_min: Option<u64>,
        /// Apply gaussian jitter to each interval
        #[arg(long)]
        randomize: Option<bool>,
        /// Minute past the hour to align rings to
        #[arg(long, conflicts_with = "no_normalize")]
        normalize_minute: Option<u32>,
        /// Disable minute alignment
        #[arg(long)]
        no_normalize: bool,
        /// Day window start, "HH:MM"
        #[arg(long)]
        day_start: Option<String>,
        /// Day window end, "HH:MM"
        #[arg(long)]
        day_end: Option<String>,
        /// Active weekdays, 1=Sunday..7=Saturday, comma separated
        #[arg(long, value_delimiter = ',')]
        weekdays: Option<Vec<u8>>,
        /// Meditation ramp-up, seconds
        #[arg(long)]
        ramp_up_sec: Option<u64>,
        /// Meditation period lengths in minutes, comma separated
        #[arg(long, value_delimiter = ',')]
        periods: Option<Vec<u64>>,
        /// Leave meditation automatically after the last period
        #[arg(long)]
        auto_stop: Option<bool>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load()?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        ConfigAction::Path => {
            println!("{}", data_dir()?.join("config.toml").display());
        }
        ConfigAction::Set {
            interval_min,
            randomize,
            normalize_minute,
            no_normalize,
            day_start,
            day_end,
            weekdays,
            ramp_up_sec,
            periods,
            auto_stop,
        } => {
            let mut settings = Settings::load()?;
            if let Some(v) = interval_min {
                settings.schedule.interval_min = v;
            }
            if let Some(v) = randomize {
                settings.schedule.randomize = v;
            }
            if let Some(v) = normalize_minute {
                settings.schedule.normalize_minute = Some(v);
            }
            if no_normalize {
                settings.schedule.normalize_minute = None;
            }
            if let Some(v) = day_start {
                settings.schedule.day_start = v;
            }
            if let Some(v) = day_end {
                settings.schedule.day_end = v;
            }
            if let Some(v) = weekdays {
                settings.schedule.active_weekdays = v;
            }
            if let Some(v) = ramp_up_sec {
                settings.meditation.ramp_up_sec = v;
            }
            if let Some(v) = periods {
                settings.meditation.period_durations_min = v;
            }
            if let Some(v) = auto_stop {
                settings.meditation.stop_automatically = v;
            }

            // Reject invalid combinations before they reach disk.
            settings.bell_config()?;
            settings.save()?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
