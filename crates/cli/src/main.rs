//! `dunkstats-pfp` binary.
//!
//! Fetches the Dunkbin user export, resolves every login to its Twitch
//! profile picture and writes the mapping artifact.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dunkstats_cli::{logging, AppContext, Args};
use dunkstats_infra::config;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load `.env` before the subscriber so `RUST_LOG` can come from it.
    let env_file = match &args.env_file {
        Some(path) => config::load_dotenv_from(path),
        None => config::load_dotenv(),
    };

    if let Err(err) = logging::init(args.json, args.verbose) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(args, env_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            error!(error = %message, "profile picture mapping failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, env_file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let mut config = config::load(args.config.clone()).context("failed to load configuration")?;
    args.apply(&mut config);

    let env_file = if args.no_persist_tokens { None } else { env_file };
    let context = AppContext::new(config, env_file)?;

    info!("generating profile picture mapping");
    let (mapping, report) =
        context.service.generate().await.context("failed to generate mapping")?;

    if !report.is_complete() {
        warn!(
            failed_chunks = report.failures.len(),
            unresolved = report.unresolved_count,
            "some lookups failed; users in failed chunks are marked without a picture"
        );
        for failure in &report.failures {
            warn!(
                chunk = failure.chunk_index,
                logins = failure.identifiers.len(),
                error_type = failure.error.label(),
                error = %failure.error,
                "chunk failed"
            );
        }
    }

    let path = context.writer.write(&mapping).context("failed to write mapping")?;
    info!(
        path = %path.display(),
        total = mapping.metadata.total_users,
        with_pfp = mapping.metadata.users_with_pfp,
        without_pfp = mapping.metadata.users_without_pfp,
        unresolved = mapping.metadata.unresolved_logins,
        "profile picture mapping completed"
    );
    Ok(())
}
