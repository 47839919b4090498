mod config;
mod credentials;
mod dispatch;
mod error;
#[cfg(test)]
mod fake;
mod ledger;
mod names;
mod tito;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_BASE_URL, EventConfig, EventTable};
use crate::credentials::ApiToken;
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::tito::{DiscountCodeApi, TitoClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch-create Tito discount codes for a list of attendees", long_about = None)]
struct Args {
    /// Tito API token
    #[arg(env = "TITO_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Event to create codes for
    #[arg(short, long, env = "TITO_EVENT", default_value = "DODL")]
    event: String,

    /// Event table (TOML); the builtin table is used when absent
    #[arg(short, long, env = "TITO_CONFIG")]
    config: Option<PathBuf>,

    /// Names file, overriding the event's input_file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Tito API base URL
    #[arg(long, env = "TITO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// File of codes already created; listed codes are skipped and new ones appended
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Print request bodies instead of sending them
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let report = run(args, TitoClient::new, std::io::stdout().lock()).await?;

    info!(
        "Finished {} codes: {} created, {} failed, {} skipped",
        report.total(),
        report.created,
        report.failed.len(),
        report.skipped
    );
    Ok(())
}

/// The token is checked before any file is read, and every input is loaded
/// before `connect` builds the API client.
async fn run<A, F, W>(args: Args, connect: F, out: W) -> Result<DispatchReport>
where
    A: DiscountCodeApi,
    F: FnOnce(&str, &EventConfig, ApiToken) -> Result<A>,
    W: Write,
{
    let token = credentials::load_api_token(args.api_token)?;
    debug!("API token: {}", token);

    let table = match &args.config {
        Some(path) => EventTable::load(path)?,
        None => EventTable::builtin()?,
    };
    let config = table.select(&args.event)?;
    info!("Creating codes for {} ({}/{})", args.event, config.account, config.event);

    let input = args.input.as_deref().unwrap_or(config.input_file.as_path());
    let names = names::load_names(input)?;

    let ledger = args.ledger.as_deref().map(Ledger::open).transpose()?;

    let api = connect(&args.base_url, config, token)?;
    let report = Dispatcher::new(&api, out)
        .dry_run(args.dry_run)
        .ledger(ledger)
        .run(&names, config)
        .await?;
    Ok(report)
}
