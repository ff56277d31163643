use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gas-mileage", version, about = "Fuel economy dashboard for a fill-up log")]
pub struct Cli {
    /// Read settings from this file instead of the default config location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the dashboard API on localhost (default).
    Serve(ServeArgs),
    /// Load the log once and print the dashboard as JSON.
    Report(ReportArgs),
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Override the configured port for this run only.
    #[arg(long)]
    pub port: Option<u16>,

    /// Do not open the browser automatically.
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Aggregation window: 30, 90, ytd, 365 or all.
    #[arg(long, default_value = "all")]
    pub period: String,

    /// Chart window: all, 30, 90 or ytd.
    #[arg(long, default_value = "all")]
    pub chart_period: String,

    /// Evaluate as of this RFC 3339 instant instead of the local clock.
    #[arg(long)]
    pub now: Option<String>,

    /// Read a saved sheet export instead of the configured source.
    #[arg(long)]
    pub file: Option<PathBuf>,
}
