use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stillbell", version, about = "Stillbell CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current schedule state as JSON
    Status,
    /// Run the reminder loop in the foreground
    Run {
        /// Stop after this many rings
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Ring the bell once
    Ring,
    /// Run a guided meditation sequence
    Meditate {
        /// Print the period schedule without waiting or ringing
        #[arg(long)]
        dry_run: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Statistics queries
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Run { limit } => commands::run::run(limit),
        Commands::Ring => commands::ring::run(),
        Commands::Meditate { dry_run } => commands::meditate::run(dry_run),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
