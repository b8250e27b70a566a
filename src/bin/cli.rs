//! Realty Desk CLI
//!
//! Operator commands that talk to the content store directly:
//! - Print an agent's analytics snapshot
//! - Resolve a user to their agent record
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use realty_desk::analytics::{AnalyticsSnapshot, SnapshotBuilder};
use realty_desk::config::{generate_default_config, Config};
use realty_desk::content::SanityClient;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "realty-desk-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect agent analytics in the content store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the analytics snapshot for a user
    Snapshot {
        /// Identity provider user id
        #[arg(short, long)]
        user_id: String,
    },

    /// Resolve a user id to its agent document id
    Agent {
        /// Identity provider user id
        #[arg(short, long)]
        user_id: String,
    },

    /// Generate default config file
    InitConfig {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let loaded = Config::load_default();
            for failure in &loaded.failures {
                eprintln!("Warning: {}", failure);
            }
            loaded.config
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realty_desk=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Snapshot { user_id } => {
            let builder = snapshot_builder(&config)?;
            let snapshot = builder
                .build(&user_id)
                .await
                .with_context(|| format!("building analytics for {}", user_id))?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                _ => print_snapshot(&user_id, &snapshot),
            }
        }

        Commands::Agent { user_id } => {
            let builder = snapshot_builder(&config)?;
            let agent = builder
                .resolve_agent(&user_id)
                .await
                .with_context(|| format!("resolving agent for {}", user_id))?;

            match (cli.format.as_str(), agent) {
                ("json", agent) => {
                    println!(
                        "{}",
                        serde_json::json!({ "user_id": user_id, "agent_id": agent })
                    );
                }
                (_, Some(agent_id)) => println!("{} -> {}", user_id, agent_id),
                (_, None) => {
                    eprintln!("No agent record for {}", user_id);
                    std::process::exit(1);
                }
            }
        }

        Commands::InitConfig { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn snapshot_builder(config: &Config) -> anyhow::Result<SnapshotBuilder> {
    let store = SanityClient::new(config.content.clone())
        .context("content store is not configured (set REALTY_DESK_SANITY_PROJECT_ID)")?;
    Ok(SnapshotBuilder::new(Arc::new(store)))
}

fn print_snapshot(user_id: &str, snapshot: &AnalyticsSnapshot) {
    println!("Analytics for {}", user_id);
    println!();

    println!("{:<12} {:>8} {:>8} {:>8} {:>8}", "", "Total", "Active", "Pending", "Sold");
    println!("{}", "-".repeat(48));
    let l = &snapshot.listings;
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}",
        "Listings", l.total, l.active, l.pending, l.sold
    );
    println!();

    println!("{:<12} {:>8} {:>8} {:>9} {:>8}", "", "Total", "New", "Contacted", "Closed");
    println!("{}", "-".repeat(49));
    let d = &snapshot.leads;
    println!(
        "{:<12} {:>8} {:>8} {:>9} {:>8}",
        "Leads", d.total, d.new, d.contacted, d.closed
    );
    println!();

    if snapshot.leads_by_property.is_empty() {
        println!("No leads by property yet.");
        return;
    }

    println!("{:<24} {:>6}", "Property", "Leads");
    println!("{}", "-".repeat(31));
    for property in &snapshot.leads_by_property {
        println!("{:<24} {:>6}", property.name, property.leads);
    }
}
