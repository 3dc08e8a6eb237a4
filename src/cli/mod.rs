//! Command line interface
//!
//! Argument parsing lives here so the binary stays a thin dispatcher; the
//! text views are in [`render`].

pub mod render;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::leaderboard::SortKey;
use crate::store::{StoreConfig, DEFAULT_DATA_DIR};

/// Agent metrics - crash-safe dashboard store for multi-agent runs
#[derive(Parser, Debug)]
#[command(name = "agent-metrics")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  agent-metrics dashboard                    Overview of the current project
  agent-metrics leaderboard --sort tokens    Agents ranked by token usage
  agent-metrics agent coding                 One agent's profile and recent events
  agent-metrics import dashboard.json        Validate and store a full document
  agent-metrics serve --addr 127.0.0.1:8420  Live dashboard over HTTP and WebSocket
")]
pub struct Cli {
    /// Directory holding dashboard.json and its backup
    #[arg(long, env = "AGENT_METRICS_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Project name written into a freshly created document
    #[arg(long, env = "AGENT_METRICS_PROJECT")]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project totals, top agents and recent activity
    Dashboard {
        /// Number of recent events to show
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },
    /// Agents ranked by a metric
    Leaderboard {
        #[arg(long, value_enum, default_value_t = SortKey::Invocations)]
        sort: SortKey,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// A single agent's profile
    Agent {
        name: String,
        /// Number of recent events to show
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },
    /// File size and record counts
    Stats,
    /// Validate a JSON document and store it as the current state
    Import { file: PathBuf },
    /// Serve the REST API and WebSocket updates
    Serve {
        #[arg(long, default_value = "127.0.0.1:8420")]
        addr: SocketAddr,
        /// How often to check the file for changes
        #[arg(long, default_value_t = 1000)]
        poll_ms: u64,
    },
}

impl Cli {
    /// Store configuration for the selected data directory
    ///
    /// Environment settings such as the lock timeout still apply; flags win
    /// for the directory and project name.
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::from_env();
        config.data_dir = self.data_dir.clone();
        if let Some(project) = &self.project {
            config.project_name = project.clone();
        }
        config
    }
}
