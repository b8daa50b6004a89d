//! CLI administration tool for url-minter.
//!
//! Inspects the PostgreSQL mapping table without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection and create the table if missing
//! cargo run --bin admin -- db check
//!
//! # Totals and the ten most visited links
//! cargo run --bin admin -- stats
//!
//! # Totals, the top 25 and creations per hour of day
//! cargo run --bin admin -- stats --top 25 --hourly
//!
//! # The ten newest links
//! cargo run --bin admin -- recent
//!
//! # Show a single mapping
//! cargo run --bin admin -- show aB3xY9
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`:
//!   PostgreSQL connection
//! - `MAPPING_TABLE` / `DYNAMODB_TABLE` (optional): table name, default `url_mappings`

use url_minter::config::Config;
use url_minter::domain::entities::UrlMapping;
use url_minter::infrastructure::persistence::PgMappingRepository;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting url-minter data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show totals and the most visited links
    Stats {
        /// Number of links to list
        #[arg(short, long, default_value_t = 10)]
        top: i64,

        /// Also show link creations per hour of day (UTC)
        #[arg(long)]
        hourly: bool,
    },

    /// Show the most recently created links
    Recent {
        /// Number of links to list
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    /// Show a single mapping
    Show {
        /// Short code to look up
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and mapping table
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        Config::load_database_url().context("Failed to load database configuration")?;
    let table = Config::load_table_name();

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = PgMappingRepository::new(Arc::new(pool), table)
        .map_err(|e| anyhow::anyhow!("Invalid mapping table: {}", e))?;

    match cli.command {
        Commands::Stats { top, hourly } => {
            handle_stats(&repo, top).await?;
            if hourly {
                handle_hourly(&repo).await?;
            }
        }
        Commands::Recent { limit } => handle_recent(&repo, limit).await?,
        Commands::Show { code } => handle_show(&repo, &code).await?,
        Commands::Db { action } => handle_db_action(action, &repo).await?,
    }

    Ok(())
}

/// Displays totals and the `top` most visited mappings.
async fn handle_stats(repo: &PgMappingRepository, top: i64) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = repo
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links:  {}",
        summary.total_mappings.to_string().bright_green().bold()
    );
    println!(
        "  Visits: {}",
        summary.total_visits.to_string().bright_green().bold()
    );
    println!();

    if top <= 0 {
        return Ok(());
    }

    let mappings = repo
        .top_by_visits(top)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if mappings.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<10} {:>8}  {}",
        "Code".bright_white().bold(),
        "Visits".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for mapping in &mappings {
        println!(
            "  {:<10} {:>8}  {}",
            mapping.code.cyan(),
            mapping.visit_count,
            truncate(&mapping.original_url, 55)
        );
    }
    println!();

    Ok(())
}

/// Lists the `limit` newest mappings.
async fn handle_recent(repo: &PgMappingRepository, limit: i64) -> Result<()> {
    println!("{}", "🕒 Recent links".bright_blue().bold());
    println!();

    let mappings = repo
        .recent(limit.max(0))
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if mappings.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<10} {:<20}  {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for mapping in &mappings {
        println!(
            "  {:<10} {:<20}  {}",
            mapping.code.cyan(),
            format_created(mapping.created_at),
            truncate(&mapping.original_url, 45)
        );
    }
    println!();

    Ok(())
}

/// Prints link creations per hour of day.
async fn handle_hourly(repo: &PgMappingRepository) -> Result<()> {
    println!("{}", "📈 Creations by hour (UTC)".bright_blue().bold());
    println!();

    let hours = repo
        .hourly_created()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let peak = hours.iter().copied().max().unwrap_or(0).max(1);

    for (hour, created) in hours.iter().enumerate() {
        let bar_len = usize::try_from(created * 40 / peak).unwrap_or(0);
        println!(
            "  {:>2}:00 {:>6}  {}",
            hour,
            created,
            "█".repeat(bar_len).green()
        );
    }
    println!();

    Ok(())
}

fn format_created(created_at: i64) -> String {
    DateTime::from_timestamp(created_at, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| created_at.to_string())
}

/// Prints one mapping in full.
async fn handle_show(repo: &PgMappingRepository, code: &str) -> Result<()> {
    let mapping = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(mapping) = mapping else {
        println!("{}", format!("❌ No mapping for '{}'", code).red());
        return Ok(());
    };

    print_mapping(&mapping);

    Ok(())
}

fn print_mapping(mapping: &UrlMapping) {
    let created = format!("{} UTC", format_created(mapping.created_at));

    println!("{}", "🔗 Mapping".bright_blue().bold());
    println!();
    println!("  Code:    {}", mapping.code.cyan());
    println!("  URL:     {}", mapping.original_url.bright_white());
    println!("  Created: {}", created.bright_black());
    println!(
        "  Visits:  {}",
        mapping.visit_count.to_string().bright_green().bold()
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repo: &PgMappingRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repo.ensure_schema()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Table: {}", repo.table().bright_white());
        }
    }

    Ok(())
}

/// Shortens long URLs for table output.
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let head: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", head)
}
