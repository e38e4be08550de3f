//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use dunkstats_domain::Config;

/// Profile-picture mapping generator arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "dunkstats-pfp")]
#[command(about = "Resolve Dunkbin users to Twitch profile pictures", version)]
pub struct Args {
    /// Config file (TOML or JSON); probed in the usual locations when omitted
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// `.env` file to load and to write refreshed tokens back to
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Mapping output path (gzip adds a `.gz` suffix)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write plain JSON instead of gzip
    #[arg(long)]
    pub no_compress: bool,

    /// Do not write refreshed tokens back to the `.env` file
    #[arg(long)]
    pub no_persist_tokens: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Verbose logging (overridden by `RUST_LOG`)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output.mapping_path = output.display().to_string();
        }
        if self.no_compress {
            config.output.compress = false;
        }
    }
}
