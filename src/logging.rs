//! Logging setup.
//!
//! Output is selected with `--log`: `0`/`off`, `1`/`stdout`, `2`/`stderr`
//! (default), or a filename to append to. `--verbose` lowers the threshold
//! to DEBUG; otherwise `RUST_LOG` is honored. Without it the interactive
//! menu logs WARN and above and one-shot subcommands log INFO.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    pub fn parse(s: &str) -> Self {
        match s {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Level used when neither `--verbose` nor `RUST_LOG` is set.
pub fn default_level(interactive: bool) -> &'static str {
    if interactive { "warn" } else { "info" }
}

fn filter(verbose: bool, interactive: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level(interactive)))
    }
}

/// Install the global subscriber.
pub fn init(target: &LogTarget, verbose: bool, interactive: bool) -> Result<()> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, interactive))
                .with_writer(std::io::stdout)
                .try_init()
                .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, interactive))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbose, interactive))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;
        }
    }
    Ok(())
}
