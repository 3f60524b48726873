//! Cluster-API node group inspector
//!
//! A command-line tool that reads Machine, MachineSet and MachineDeployment
//! objects from JSON and shows the autoscaling configuration derived from
//! their metadata.

mod commands;
mod config;
mod input;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, surface};
use nodegroup_lib::{ResolverConfig, StructuredLogger};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cluster-API node group inspector
#[derive(Parser)]
#[command(name = "capi-ng")]
#[command(author, version, about = "Inspect cluster-api node group autoscaling metadata", long_about = None)]
pub struct Cli {
    /// Cluster-api group qualifying node group keys
    #[arg(long, env = "CAPI_GROUP")]
    pub capi_group: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the annotation and label keys in use
    Keys,

    /// Show min/max scaling bounds
    Bounds {
        /// JSON file holding an object, a List or an array of objects
        file: PathBuf,
    },

    /// Show scale-from-zero capacity
    Capacity {
        /// JSON file holding an object, a List or an array of objects
        file: PathBuf,
    },

    /// Show the owning object of a given kind
    Owner {
        /// JSON file holding an object, a List or an array of objects
        file: PathBuf,

        /// Owner kind to look for (defaults to the next level up; Nodes resolve their Machine)
        #[arg(long, short)]
        kind: Option<String>,
    },

    /// Show the cluster each object belongs to
    Cluster {
        /// JSON file holding an object, a List or an array of objects
        file: PathBuf,
    },

    /// Show the full node group view of MachineSets and MachineDeployments
    Inspect {
        /// JSON file holding an object, a List or an array of objects
        file: PathBuf,
    },

    /// Normalize provider IDs to their trailing identifier
    Normalize {
        /// Provider IDs (e.g. aws:///us-east-1a/i-1234)
        #[arg(required = true)]
        provider_ids: Vec<String>,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let file_config = config::Config::load()?;

    // Flag or CAPI_GROUP first, then the config file, then the library default
    let resolver = match cli.capi_group.clone().or(file_config.capi_group.clone()) {
        Some(group) => ResolverConfig { group },
        None => ResolverConfig::load()?,
    };
    let keys = resolver.keys();
    let format = cli.format.unwrap_or_else(|| file_config.output_format());
    debug!(group = %keys.group, format = ?format, "Resolved configuration");

    let logger = StructuredLogger::new(keys.group.clone());
    logger.log_startup(env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Keys => surface::show_keys(&keys, format)?,
        Commands::Bounds { file } => {
            inspect::show_bounds(&keys, &input::load_objects(&file)?, format)?
        }
        Commands::Capacity { file } => {
            inspect::show_capacity(&input::load_objects(&file)?, format)?
        }
        Commands::Owner { file, kind } => {
            inspect::show_owners(&keys, &input::load_objects(&file)?, kind.as_deref(), format)?
        }
        Commands::Cluster { file } => {
            inspect::show_clusters(&keys, &input::load_objects(&file)?, format)?
        }
        Commands::Inspect { file } => {
            inspect::inspect_node_groups(&keys, &logger, &input::load_objects(&file)?, format)?
        }
        Commands::Normalize { provider_ids } => surface::show_normalized(&provider_ids, format)?,
    }

    Ok(())
}
