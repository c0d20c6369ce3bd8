//! CLI entry point for the `agraph` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use agentic_graph::cli::commands;
use agentic_graph::engine::ActivationParams;
use agentic_graph::graph::TraversalDirection;
use agentic_graph::types::RelationshipType;
use agentic_graph::AnalyticsError;

#[derive(Parser)]
#[command(
    name = "agraph",
    about = "AgenticGraph CLI: analytics over an agent's knowledge graph"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty graph file
    Init {
        /// Path to the graph JSON file to create
        file: PathBuf,
    },
    /// Display snapshot statistics
    Info {
        /// Path to the graph JSON file
        file: PathBuf,
    },
    /// Rank nodes by importance
    Rank {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Number of nodes to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Spread activation from seed nodes
    Activate {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Comma-separated seed node IDs
        seeds: String,
        /// Fraction of activation passed per hop
        #[arg(long)]
        decay: Option<f64>,
        /// Activation below which a node stops emitting
        #[arg(long)]
        threshold: Option<f64>,
        /// Cap on activated nodes
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// List belief pairs that may contradict each other
    Contradictions {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Use lexical similarity instead of graph structure
        #[arg(long)]
        semantic: bool,
        /// Similarity threshold for --semantic
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Take a weighted random walk
    Walk {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Start node ID
        start: String,
        /// Number of hops
        #[arg(long)]
        steps: Option<usize>,
        /// Standard deviation of Gaussian weight noise
        #[arg(long)]
        delta: Option<f64>,
        /// RNG seed for a reproducible walk
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Trace a causal chain
    Chain {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Start node ID
        start: String,
        /// Direction: forward (effects) or backward (causes)
        #[arg(long, default_value = "forward")]
        direction: String,
        /// Maximum hops from the start node
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Add an edge between two nodes
    Link {
        /// Path to the graph JSON file
        file: PathBuf,
        /// Source node ID
        source_id: String,
        /// Target node ID
        target_id: String,
        /// Relationship type, e.g. CAUSED or ASSOCIATED_WITH
        relationship: String,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init { file } => commands::cmd_init(&file).await,
        Commands::DefaultConfig => commands::cmd_default_config(),
        Commands::Info { file } => match commands::open_engine(&file, config, None) {
            Ok(engine) => commands::cmd_info(&engine, json).await,
            Err(e) => Err(e),
        },
        Commands::Rank { file, limit } => match commands::open_engine(&file, config, None) {
            Ok(engine) => commands::cmd_rank(&engine, limit, json).await,
            Err(e) => Err(e),
        },
        Commands::Activate {
            file,
            seeds,
            decay,
            threshold,
            max_nodes,
        } => match commands::open_engine(&file, config, None) {
            Ok(engine) => {
                let defaults = engine.config().activation.params();
                let params = ActivationParams {
                    decay: decay.unwrap_or(defaults.decay),
                    threshold: threshold.unwrap_or(defaults.threshold),
                    max_nodes: max_nodes.unwrap_or(defaults.max_nodes),
                    ..defaults
                };
                let seeds: Vec<String> = seeds
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                commands::cmd_activate(&engine, seeds, params, json).await
            }
            Err(e) => Err(e),
        },
        Commands::Contradictions {
            file,
            semantic,
            threshold,
        } => match commands::open_engine(&file, config, None) {
            Ok(engine) => commands::cmd_contradictions(&engine, semantic, threshold, json).await,
            Err(e) => Err(e),
        },
        Commands::Walk {
            file,
            start,
            steps,
            delta,
            seed,
        } => match commands::open_engine(&file, config, seed) {
            Ok(engine) => commands::cmd_walk(&engine, &start, steps, delta, json).await,
            Err(e) => Err(e),
        },
        Commands::Chain {
            file,
            start,
            direction,
            max_depth,
        } => {
            let dir = match TraversalDirection::from_name(&direction) {
                Some(dir) => dir,
                None => {
                    eprintln!("Invalid direction: {}", direction);
                    process::exit(3);
                }
            };
            match commands::open_engine(&file, config, None) {
                Ok(engine) => commands::cmd_chain(&engine, &start, dir, max_depth, json).await,
                Err(e) => Err(e),
            }
        }
        Commands::Link {
            file,
            source_id,
            target_id,
            relationship,
        } => {
            let rel = match RelationshipType::from_name(&relationship) {
                Some(rel) => rel,
                None => {
                    eprintln!("Invalid relationship type: {}", relationship);
                    process::exit(3);
                }
            };
            match commands::open_engine(&file, config, None) {
                Ok(engine) => {
                    commands::cmd_link(&engine, &source_id, &target_id, rel, json).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            AnalyticsError::Io(_) | AnalyticsError::Json(_) => 1,
            AnalyticsError::ExtractionFailed { .. }
            | AnalyticsError::ExtractionTimeout { .. }
            | AnalyticsError::Store(_) => 2,
            AnalyticsError::InvalidParameter { .. } | AnalyticsError::Config(_) => 3,
            AnalyticsError::NodeNotFound(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
