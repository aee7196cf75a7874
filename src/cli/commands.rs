use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `qcdt-monitor` - watches the QCDT price endpoint and drives the Telegram
/// acknowledgment workflow.
#[derive(Parser, Debug)]
#[command(name = "qcdt-monitor")]
#[command(version)]
#[command(about = "QCDT price-update watcher with Telegram polls and reminders.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.qcdt-monitor/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the monitor: scheduled checks, nags and the Telegram listener
    Run,

    /// Show the resolved configuration and fetch the current price once
    Status,
}
