//! Dysnomia CLI - preview reactor operations from the command line.
//!
//! ```text
//! dysnomia preview <category> <operation> [key=value ...] [--hydrate]
//! dysnomia constants
//! ```
//!
//! Results are printed to stdout as JSON. Logs go to stderr so the output
//! stays machine-readable.

use std::num::NonZeroU16;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dysnomia_chain::{ContractSet, RpcClient, StateLoader};
use dysnomia_config::DysnomiaConfig;
use dysnomia_preview::{Operation, Params, PreviewDispatcher, PreviewRequest, QingOp};
use dysnomia_reactor::Territory;
use dysnomia_types::{Address, Constants, PreviewResult};

#[derive(Parser)]
#[command(name = "dysnomia", version)]
#[command(about = "Preview Dysnomia reactor operations without submitting transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview one operation
    Preview {
        /// terraform, buy, lau, qing, react, gas, ratios or constants
        category: String,
        /// Operation within the category (e.g. alpha, math, join)
        #[arg(default_value = "")]
        operation: String,
        /// Parameters as key=value pairs
        params: Vec<String>,
        /// Load chain state from the configured RPC endpoint first
        #[arg(long)]
        hydrate: bool,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the protocol constants
    Constants,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn contract_set(config: &DysnomiaConfig) -> ContractSet {
    config
        .contracts
        .as_ref()
        .map(|c| ContractSet {
            affection: c.affection,
            lau: c.lau,
            qing_asset: c.qing_asset,
            crows: c.crows,
        })
        .unwrap_or_default()
}

fn territory(config: &DysnomiaConfig, constants: &Constants) -> Option<Territory> {
    let section = config.territory.as_ref()?;
    let waat = section.waat.clone()?;
    let mut territory = Territory::new(waat, section.entropy.unwrap_or(0), constants);
    if let Some(divisor) = section.bouncer_divisor {
        match NonZeroU16::new(divisor) {
            Some(divisor) => territory.bouncer_divisor = divisor,
            None => tracing::warn!("Ignoring bouncer_divisor = 0; using the default"),
        }
    }
    territory.no_crows = section.no_crows;
    if let Some(cover) = &section.cover_charge {
        territory.cover_charge = cover.clone();
    }
    Some(territory)
}

/// The address whose balances a bouncer preview needs, if any.
fn holder_for(op: Operation, params: &Params) -> Result<Option<Address>> {
    if op == Operation::Qing(QingOp::Bouncer) {
        return Ok(params.optional_address("address")?);
    }
    Ok(None)
}

async fn build_dispatcher(
    config: &DysnomiaConfig,
    constants: Constants,
    op: Operation,
    params: &Params,
    hydrate: bool,
) -> Result<PreviewDispatcher> {
    let mut dispatcher = PreviewDispatcher::new(constants.clone());
    if let Some(affection) = config.contracts.as_ref().and_then(|c| c.affection) {
        dispatcher = dispatcher.with_affection_address(affection);
    }
    if let Some(territory) = territory(config, &constants) {
        dispatcher = dispatcher.with_territory(territory);
    }
    if !hydrate {
        return Ok(dispatcher);
    }

    let endpoint = config.rpc_endpoint();
    let url: url::Url = endpoint
        .parse()
        .with_context(|| format!("invalid RPC endpoint {endpoint:?}"))?;
    let rpc = RpcClient::new(url, Duration::from_secs(config.timeout_secs()))
        .context("failed to build RPC client")?;
    let loader = StateLoader::new(rpc);
    let snapshot = loader
        .snapshot(&contract_set(config), holder_for(op, params)?)
        .await
        .context("failed to hydrate chain state")?;
    Ok(dispatcher.with_snapshot(snapshot))
}

fn print_json(value: &PreviewResult, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match DysnomiaConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring unusable config: {err}");
            DysnomiaConfig::default()
        }
    };
    let constants = Constants::canonical();

    match cli.command {
        Commands::Constants => {
            let request = PreviewRequest::new("constants", "table", Params::new());
            let result = PreviewDispatcher::new(constants).dispatch(&request)?;
            print_json(&result, false)
        }
        Commands::Preview {
            category,
            operation,
            params,
            hydrate,
            compact,
        } => {
            let params = Params::from_pairs(&params)?;
            let op = Operation::parse(&category, &operation)?;
            let dispatcher = build_dispatcher(&config, constants, op, &params, hydrate).await?;
            let result = dispatcher.preview(op, &params)?;
            print_json(&result, compact)
        }
    }
}
