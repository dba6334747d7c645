//! Nous CLI: inspect configuration and run the weight rules on local files.
//!
//! Usage:
//!   nous config [--graph-size N]
//!   nous weight --base B [--learned L] [--bonus X]
//!   nous session <file> [--previous <file>]
//!   nous validate <file> [--kind edge|session|summary]

use clap::{Parser, Subcommand, ValueEnum};
use nous_weights::consolidation::get_compression_config;
use nous_weights::session::{create_session_temporal_edges, detect_continuation_edges, Session};
use nous_weights::validation::{parse_nous_edge, parse_session, parse_summary_node, parse_weighted_edge};
use nous_weights::{calculate_effective_weight, EngineConfig, WeightComponents};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "nous",
    version,
    about = "Edge weight determination and consolidation engine"
)]
struct Cli {
    /// Path to a YAML config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration and compression thresholds
    Config {
        /// Graph size used to pick the compression tier
        #[arg(long, default_value_t = 0)]
        graph_size: usize,
    },
    /// Compute an effective weight from its components
    Weight {
        #[arg(long)]
        base: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        learned: f64,
        #[arg(long, default_value_t = 0.0)]
        bonus: f64,
    },
    /// Infer temporal edges from a session JSON file
    Session {
        /// Session to infer from
        file: PathBuf,
        /// Earlier session, for continuation edges
        #[arg(long)]
        previous: Option<PathBuf>,
    },
    /// Validate a JSON record against the storage schema
    Validate {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = RecordKind::Edge)]
        kind: RecordKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    /// A weighted edge
    Edge,
    /// A core edge record
    NousEdge,
    Session,
    Summary,
}

/// Get the default config path (~/.config/nous/config.yaml)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nous").join("config.yaml"))
}

fn load_config(explicit: Option<PathBuf>) -> Result<EngineConfig, String> {
    let path = match explicit {
        Some(path) => path,
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(EngineConfig::default());
            }
        },
    };
    tracing::debug!(path = %path.display(), "loading config");
    EngineConfig::load(&path).map_err(|e| format!("Failed to load config {}: {}", path.display(), e))
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn read_session(path: &Path) -> Result<Session, String> {
    let json = read_file(path)?;
    parse_session(&json).map_err(|e| format!("Invalid session {}: {}", path.display(), e))
}

fn cmd_config(config: &EngineConfig, graph_size: usize) -> i32 {
    let compression = get_compression_config(graph_size, &config.compression);
    print_json(&serde_json::json!({
        "engine": config,
        "compression": compression,
    }))
}

fn cmd_weight(base: f64, learned: f64, bonus: f64) -> i32 {
    let components = WeightComponents {
        base_weight: base,
        learned_adjustment: learned,
        coactivation_bonus: bonus,
    };
    let result = calculate_effective_weight(&components);
    if result.was_clamped {
        tracing::warn!(raw = result.raw_value, effective = result.effective_weight, "weight clamped");
    }
    print_json(&result)
}

fn cmd_session(config: &EngineConfig, file: &Path, previous: Option<&Path>) -> i32 {
    let session = match read_session(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let now = chrono::Utc::now();
    let mut edges = create_session_temporal_edges(&session, &config.temporal, &config.provisional, now);
    if let Some(previous) = previous {
        let previous = match read_session(previous) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        edges.extend(detect_continuation_edges(
            &session,
            &previous,
            &config.temporal,
            &config.provisional,
            now,
        ));
    }
    print_json(&edges)
}

fn cmd_validate(file: &Path, kind: RecordKind) -> i32 {
    let json = match read_file(file) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let result = match kind {
        RecordKind::Edge => parse_weighted_edge(&json).map(|_| ()),
        RecordKind::NousEdge => parse_nous_edge(&json).map(|_| ()),
        RecordKind::Session => parse_session(&json).map(|_| ()),
        RecordKind::Summary => parse_summary_node(&json).map(|_| ()),
    };
    match result {
        Ok(()) => {
            println!("{}: valid", file.display());
            0
        }
        Err(e) => {
            eprintln!("{}: invalid: {}", file.display(), e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: invalid config: {}", e);
        std::process::exit(1);
    }

    let code = match cli.command {
        Commands::Config { graph_size } => cmd_config(&config, graph_size),
        Commands::Weight { base, learned, bonus } => cmd_weight(base, learned, bonus),
        Commands::Session { file, previous } => cmd_session(&config, &file, previous.as_deref()),
        Commands::Validate { file, kind } => cmd_validate(&file, kind),
    };
    std::process::exit(code);
}
