//! agent-metrics - Binary Entry Point

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_metrics::cli::{render, Cli, Command};
use agent_metrics::MetricsStore;

fn init_logging() {
    // Logs go to stderr so that CLI views on stdout stay pipeable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agent_metrics=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let store = Arc::new(MetricsStore::new(cli.store_config()));

    match cli.command {
        Command::Dashboard { recent } => {
            print!("{}", render::dashboard(&store.load(), recent));
        }
        Command::Leaderboard { sort, limit } => {
            print!("{}", render::leaderboard(&store.load(), sort, limit));
        }
        Command::Agent { name, recent } => {
            let state = store.load();
            let Some(profile) = state.agents.get(&name) else {
                bail!("no agent named '{}' in {}", name, store.config().primary_path().display());
            };
            print!("{}", render::agent(&state, profile, recent));
        }
        Command::Stats => {
            print!("{}", render::stats(&store.get_stats()));
        }
        Command::Import { file } => {
            let raw = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let document: serde_json::Value =
                serde_json::from_slice(&raw).with_context(|| format!("parsing {}", file.display()))?;
            let saved = store
                .save_document(document)
                .with_context(|| format!("importing {}", file.display()))?;
            println!(
                "Imported {} events, {} sessions, {} agents into {}",
                saved.events.len(),
                saved.sessions.len(),
                saved.agents.len(),
                store.config().primary_path().display()
            );
        }
        Command::Serve { addr, poll_ms } => {
            store.load_or_init().context("initializing metrics store")?;
            let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            runtime.block_on(agent_metrics::api::serve(store, addr, Duration::from_millis(poll_ms)))?;
        }
    }

    Ok(())
}
