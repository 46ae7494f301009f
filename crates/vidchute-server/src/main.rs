use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use vidchute_core::artifact::ArtifactStore;
use vidchute_core::{config, logging};
use vidchute_server::app::{build_router, AppState};

/// Web front end over an external video fetch tool.
#[derive(Debug, Parser)]
#[command(name = "vidchute")]
#[command(about = "vidchute: paste a video URL, collect the file once", long_about = None)]
struct Args {
    /// Bind address, e.g. 127.0.0.1:8080 (overrides config).
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Scratch directory for fetched files (overrides config).
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = run(Args::parse()).await {
        eprintln!("vidchute error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = config::load_or_init().context("load configuration")?;

    let listen_addr = args.listen.unwrap_or_else(|| cfg.listen_addr.clone());
    let scratch_dir = match args.scratch_dir.or_else(|| cfg.scratch_dir.clone()) {
        Some(dir) => dir,
        None => config::default_scratch_dir()?,
    };

    let store = ArtifactStore::open(scratch_dir)?;
    tracing::info!(dir = %store.dir().display(), "scratch directory ready");

    let router = build_router(AppState::new(&cfg, store));
    let listener = tokio::net::TcpListener::bind(listen_addr.as_str())
        .await
        .with_context(|| format!("bind {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "vidchute listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    // Only graceful shutdown is lost if the handler cannot be installed; the
    // signal itself still terminates the process.
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not install ctrl-c handler: {err}");
    }
    tracing::info!("shutdown signal received");
}
