mod calc;
mod config;
mod insights;
mod ipc;
mod report;

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Karnataka SSLC result sidecar: JSON requests on stdin, one reply per line on stdout.
#[derive(Parser, Debug)]
#[command(name = "sslcd")]
#[command(version)]
struct Args {
    /// TOML file overriding report text and chart geometry
    #[arg(short, long, env = "SSLCD_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `sslcd=debug` (defaults to RUST_LOG, then `sslcd=info`)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sslcd=info")),
    };
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let config = config::load_config(args.config.as_deref()).context("load report config")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "sslcd ready"
    );
    let state = ipc::AppState { config };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&state, req),
            Err(e) => {
                // Can't reply without id.
                warn!("unparseable request line: {e}");
                ipc::bad_json(e.to_string())
            }
        };

        writeln!(stdout, "{resp}").context("write response")?;
        stdout.flush().context("flush response")?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
