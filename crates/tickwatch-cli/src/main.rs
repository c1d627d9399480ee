mod cli;
mod error;
mod output;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tickwatch_core::{Pipeline, ReqwestHttpClient, Symbol, ViewRequest, ViewSnapshot, ViewerConfig};

use crate::cli::{Cli, Command, ViewArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let result = match cli.command {
        Command::View(args) => view(args).await,
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn view(args: ViewArgs) -> Result<ExitCode, CliError> {
    let config = ViewerConfig::new(
        Symbol::parse(&args.default_symbol)?,
        args.window,
        Duration::from_secs(args.timeout_secs),
    )?;
    let pipeline = Pipeline::new(config, Arc::new(ReqwestHttpClient::new()));

    // The lookback bounds belong to the presentation layer; the core takes
    // any positive window.
    let request = ViewRequest {
        raw_ticker: args.ticker.join(" "),
        lookback_days: args.days.clamp(30, 365),
    };

    let snapshot = pipeline.run(&request).await;
    output::render(&snapshot, args.format, args.pretty)?;

    Ok(match snapshot {
        ViewSnapshot::NoData { .. } => ExitCode::from(3),
        _ => ExitCode::SUCCESS,
    })
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
