mod commands;
mod context;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::context::{Context, Overrides};

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Month, week and day views over your calendar events")]
struct Cli {
    /// Event snapshot to read (JSON array of event records)
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Timezone for day boundaries, e.g. "Europe/Berlin"
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month as a 5x7 grid with event counts
    #[command(allow_negative_numbers = true)]
    Month {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12; other values roll over into adjacent years
        #[arg(long)]
        month: Option<i32>,
    },
    /// List each day of the week containing DATE
    Week {
        /// Any day of the week (YYYY-MM-DD, defaults to today)
        date: Option<String>,
    },
    /// Show one day's events by hour
    Day {
        /// YYYY-MM-DD (defaults to today)
        date: Option<String>,

        /// Print the day's events as JSON records
        #[arg(long)]
        json: bool,
    },
    /// Show an event's details and its next occurrences
    Show { id: String },
    /// Show configuration paths and settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    let overrides = Overrides {
        events_file: cli.events,
        timezone: cli.timezone,
    };

    match cli.command {
        Commands::Config => commands::config::run(&overrides),
        Commands::Month { year, month } => {
            let ctx = Context::load(&overrides)?;
            commands::month::run(&ctx, year, month)
        }
        Commands::Week { date } => {
            let ctx = Context::load(&overrides)?;
            commands::week::run(&ctx, date.as_deref())
        }
        Commands::Day { date, json } => {
            let ctx = Context::load(&overrides)?;
            commands::day::run(&ctx, date.as_deref(), json)
        }
        Commands::Show { id } => {
            let ctx = Context::load(&overrides)?;
            commands::show::run(&ctx, &id)
        }
    }
}
