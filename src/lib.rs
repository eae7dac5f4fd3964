// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_from_path, ConfigFile, RawConfigFile};
use crate::fs::RealFileSystem;
use crate::watch::{GlobPattern, GlobWatcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the glob watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let (mut events, cancel) = GlobWatcher::new(cfg.pattern.clone(), cfg.poll_interval).start();

    // Ctrl-C → cancel; the loop below ends when the stream closes.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; stopping watcher");
            cancel.cancel();
        });
    }

    while let Some(event) = events.recv().await {
        println!("{event}");
    }

    info!("event stream closed; exiting");
    Ok(())
}

/// Merge the config file (if any) with CLI overrides and validate.
///
/// An explicit `--config` must exist; the default `Globwatch.toml` is only
/// read when present.
pub fn resolve_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    let raw = match &args.config {
        Some(path) => load_from_path(PathBuf::from(path))?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(?path, "using default config file");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    ConfigFile::try_from(raw.with_overrides(args.pattern.clone(), args.interval_ms))
}

/// Simple dry-run output: print settings and what the pattern matches now.
fn print_dry_run(cfg: &ConfigFile) {
    println!("globwatch dry-run");
    println!("  pattern = {}", cfg.pattern);
    println!("  poll_interval = {:?}", cfg.poll_interval);
    println!();

    match GlobPattern::compile(&cfg.pattern) {
        Ok(pattern) => {
            let matches = pattern.expand(&RealFileSystem);
            println!("matches ({}):", matches.len());
            for m in matches {
                println!("  - {m}");
            }
        }
        Err(err) => println!("pattern does not compile: {err}"),
    }

    debug!("dry-run complete (no watching)");
}
