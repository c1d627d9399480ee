use clap::{Parser, Subcommand, ValueEnum};

/// Single-ticker market viewer with a moving-average trend cue.
#[derive(Debug, Parser)]
#[command(name = "tickwatch", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter (e.g. `tickwatch_core=debug`).
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch daily bars for one ticker and render the trend view.
    View(ViewArgs),
}

#[derive(Debug, clap::Args)]
pub struct ViewArgs {
    /// Ticker input; words after the symbol are treated as annotation and
    /// ignored (e.g. `tickwatch view 2330.TW 台積電`).
    pub ticker: Vec<String>,

    /// Lookback window in calendar days, clamped to 30..=365.
    #[arg(long, default_value_t = 180)]
    pub days: u32,

    /// Moving-average window in bars.
    #[arg(long, default_value_t = 20)]
    pub window: usize,

    /// Symbol used when the ticker input is empty.
    #[arg(long, default_value = "2330.TW")]
    pub default_symbol: String,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
