use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use plan_scraper::layout::GridLayout;
use plan_scraper::model::StoredCourse;
use plan_scraper::{reconcile, scrape_schedule};

#[derive(Parser)]
#[command(name = "plan_scraper", about = "Timetable grid scraper and reconciler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract structured course facts from a saved timetable page
    Extract {
        /// Path to the fetched HTML document
        #[arg(short, long)]
        file: PathBuf,
        /// Schedule the page belongs to
        #[arg(short, long)]
        schedule_id: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Diff a saved timetable page against the stored course set
    Diff {
        /// Path to the fetched HTML document
        #[arg(short, long)]
        file: PathBuf,
        /// Schedule the page belongs to
        #[arg(short, long)]
        schedule_id: String,
        /// JSON array of stored courses for the schedule
        #[arg(long)]
        stored: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let layout = GridLayout::default();

    match cli.command {
        Commands::Extract { file, schedule_id, pretty } => {
            let html = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let facts = scrape_schedule(&html, &schedule_id, &layout)?;
            print_json(&facts, pretty)?;
            eprintln!("{} courses extracted", facts.len());
        }
        Commands::Diff { file, schedule_id, stored, pretty } => {
            let html = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let stored_json = fs::read_to_string(&stored)
                .with_context(|| format!("reading {}", stored.display()))?;
            let stored_courses: Vec<StoredCourse> = serde_json::from_str(&stored_json)
                .context("stored courses must be a JSON array of stored course records")?;

            let facts = scrape_schedule(&html, &schedule_id, &layout)?;
            let result = reconcile::diff(&stored_courses, &facts);
            print_json(&result, pretty)?;
            eprintln!(
                "{} to create, {} to delete",
                result.to_create.len(),
                result.to_delete.len()
            );
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
