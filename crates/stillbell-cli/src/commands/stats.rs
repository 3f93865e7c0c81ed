use clap::Subcommand;
use stillbell_core::StatsDb;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show the most recent entries as JSON, oldest first
    Recent {
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Total number of recorded entries
    Count,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StatsDb::open()?;
    match action {
        StatsAction::Recent { limit } => {
            let entries = db.recent(limit)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        StatsAction::Count => {
            println!("{}", db.count()?);
        }
    }
    Ok(())
}
