//! FreshCart CLI - Database migrations and offline tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! fc-cli migrate
//!
//! # Analytics report from an exported snapshot
//! fc-cli report --input snapshot.json --days 7
//!
//! # Generate short codes
//! fc-cli qr generate --count 10
//!
//! # Resolve a code against an exported list
//! fc-cli qr resolve --input qr_codes.json promo2024
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `report` - Build an analytics report without a database
//! - `qr generate` / `qr resolve` - Short code helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use commands::report::{CsvKind, ReportOptions};

mod commands;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(author, version, about = "FreshCart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Build an analytics report from a JSON snapshot
    Report {
        /// Snapshot file with orders, items, products, categories and page views
        #[arg(short, long)]
        input: PathBuf,

        /// First day of the range (requires --end)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the range, inclusive (requires --start)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Days ending today, used when no explicit range is given
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Reporting zone as +HH:MM
        #[arg(long, default_value = "+00:00", allow_hyphen_values = true)]
        utc_offset: FixedOffset,

        /// Reference instant (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print one CSV table instead of the JSON report
        #[arg(long, value_enum)]
        csv: Option<CsvKind>,
    },
    /// QR short code helpers
    Qr {
        #[command(subcommand)]
        action: QrAction,
    },
}

#[derive(Subcommand)]
enum QrAction {
    /// Print random short codes
    Generate {
        /// How many codes to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Resolve a code against a JSON list of QR codes
    Resolve {
        /// JSON array of QR code records
        #[arg(short, long)]
        input: PathBuf,

        /// Short code as scanned
        code: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Report {
            input,
            start,
            end,
            days,
            utc_offset,
            now,
            csv,
        } => {
            let options = ReportOptions {
                start,
                end,
                days,
                utc_offset,
                now: now.unwrap_or_else(Utc::now),
                csv,
            };
            commands::report::run(&input, &options).await?;
        }
        Commands::Qr { action } => match action {
            QrAction::Generate { count } => commands::qr::run_generate(count),
            QrAction::Resolve { input, code } => {
                commands::qr::run_resolve(&input, &code).await?;
            }
        },
    }
    Ok(())
}
