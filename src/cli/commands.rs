use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Wardline` - admission gate, sensory log and artifact scanner for agent runtimes.
#[derive(Parser, Debug)]
#[command(name = "wardline")]
#[command(version)]
#[command(about = "Guard rails for on-device agent runtimes.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.wardline/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the admission gate on a JSON request
    Check {
        /// Request file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Evaluate with veto authority disabled
        #[arg(long)]
        no_veto: bool,
    },

    /// Scan a source file as a generated artifact
    Scan {
        /// Source file to scan
        file: PathBuf,

        /// Artifact name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Artifact language (defaults to the file extension)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Take one vitals reading
    Vitals,

    /// Stream agent activity as SSE frames on stdout until Ctrl-C
    Watch,

    /// Show effective thresholds and runtime state
    Status,

    /// Print the effective configuration as TOML
    Config,
}
