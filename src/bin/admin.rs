//! CLI administration tool for ttl-shortener.
//!
//! Works directly against the configured link store, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired links
//! cargo run --bin admin -- cleanup
//!
//! # Show statistics of one link
//! cargo run --bin admin -- stats aB3dE9
//!
//! # Check store connection
//! cargo run --bin admin -- store check
//!
//! # Count stored links
//! cargo run --bin admin -- store count
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (`REDIS_URL` or `REDIS_HOST`, `REDIS_KEY_PREFIX`, ...).
//! Without Redis settings the tool opens an empty in-memory store, which is
//! only useful as a dry run.

use ttl_shortener::application::services::LinkService;
use ttl_shortener::config::{self, Config};
use ttl_shortener::domain::entities::LinkStats;
use ttl_shortener::domain::repositories::LinkStore;
use ttl_shortener::error::AppError;
use ttl_shortener::server::{build_link_service, connect_store};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing ttl-shortener.
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
    /// Delete all expired links
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics of one short link
    Stats {
        /// Short code
        code: String,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Store operation subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,

    /// Count stored links, expired ones included
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let store = connect_store(&config).await?;
    let service = build_link_service(&config, store)?;

    match cli.command {
        Commands::Cleanup { yes } => handle_cleanup(&service, yes).await?,
        Commands::Stats { code } => handle_stats(&service, &code).await?,
        Commands::Store { action } => handle_store_action(action, &config, &service).await?,
    }

    Ok(())
}

/// Runs a sweep after confirmation.
async fn handle_cleanup(service: &Arc<LinkService<dyn LinkStore>>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Cleanup expired links".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all expired links now?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = service
        .cleanup()
        .await
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed:".green().bold(),
        removed.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints the statistics of one code.
///
/// # Output Format
///
/// ```text
/// 📊 Link aB3dE9
///
///   URL:       https://example.com/a
///   Created:   2026-01-01 00:00:00 UTC
///   Expires:   2026-01-08 00:00:00 UTC
///   Accesses:  3
/// ```
async fn handle_stats(service: &Arc<LinkService<dyn LinkStore>>, code: &str) -> Result<()> {
    println!("{} {}", "📊 Link".bright_blue().bold(), code.cyan().bold());
    println!();

    let Some(stats) = live_stats(service.stats(code).await)? else {
        println!("  {}", "Short link not found or expired".yellow());
        println!();
        return Ok(());
    };

    println!("  URL:       {}", stats.original_url.cyan());
    println!(
        "  Created:   {}",
        stats
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!(
        "  Expires:   {}",
        stats
            .expiration_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_white()
    );
    println!(
        "  Accesses:  {}",
        stats.access_count.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Treats an unknown or expired code as an empty result and anything else
/// as a failure of the command.
fn live_stats(result: Result<LinkStats, AppError>) -> Result<Option<LinkStats>> {
    match result {
        Ok(stats) => Ok(Some(stats)),
        Err(AppError::NotFound { .. }) => Ok(None),
        Err(e) => Err(anyhow::anyhow!("Failed to load stats: {}", e)),
    }
}

/// Dispatches store commands.
async fn handle_store_action(
    action: StoreAction,
    config: &Config,
    service: &Arc<LinkService<dyn LinkStore>>,
) -> Result<()> {
    let store = service.store();

    match action {
        StoreAction::Check => {
            println!("{}", "🔌 Store Check".bright_blue().bold());
            println!();
            println!("  Backend: {}", store.backend().cyan());
            if config.is_redis_enabled() {
                println!("  Prefix:  {}", config.redis_key_prefix.cyan());
            }

            if store.health_check().await {
                println!("  Status:  {}", "OK".green().bold());
            } else {
                println!("  Status:  {}", "UNREACHABLE".red().bold());
                anyhow::bail!("Store health check failed");
            }
            println!();
        }
        StoreAction::Count => {
            let keys = store
                .list_keys()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list keys: {}", e))?;

            println!(
                "  Stored links: {}",
                keys.len().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}
