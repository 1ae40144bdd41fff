use chrono::DateTime;
use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Context, Result};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use txlens_data::{ChainRecord, ExplanationResult, LedgerFamily, Lookups};
use txlens_decode::units::{format_units, try_parse_integer};
use txlens_explain::flows::aggregate_flows;
use txlens_explain::render::{display_name, UNKNOWN_PARTY};
use txlens_explain::{explain, ExplainError};

#[derive(Debug, Clone)]
struct AppContext {
    lookups_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "txlens")]
#[command(about = "Explain ledger transactions in plain language")]
#[command(version)]
struct Cli {
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Explain one fetched transaction record.
    Explain(ExplainArgs),
    /// Format a raw minor-unit integer with the given decimals.
    DecodeUnits(DecodeUnitsArgs),
}

/// Arguments for the `explain` subcommand.
///
/// The input file holds one chain-reader record tagged by `ledger`
/// (`evm` or `sui`); a `null` transaction reports not found.
#[derive(Args, Debug)]
struct ExplainArgs {
    /// Chain record JSON file.
    #[arg(long)]
    input: PathBuf,

    /// Lookups JSON layered over the built-in tables (overrides TXLENS_LOOKUPS).
    #[arg(long)]
    lookups: Option<PathBuf>,

    /// Output format: table (default) or json.
    #[arg(long, default_value = "table")]
    output: String,

    /// Native asset symbol for receipt ledgers (e.g. POL on Polygon).
    #[arg(long)]
    native_symbol: Option<String>,
}

#[derive(Args, Debug)]
struct DecodeUnitsArgs {
    /// Integer in base 10 or 0x-prefixed base 16.
    #[arg(long)]
    raw: String,

    #[arg(long, default_value_t = 18)]
    decimals: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let ctx = AppContext {
        lookups_path: std::env::var("TXLENS_LOOKUPS").ok().map(PathBuf::from),
    };

    match cli.command {
        Commands::Explain(args) => handle_explain(&ctx, args).await,
        Commands::DecodeUnits(args) => handle_decode_units(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn load_lookups(ctx: &AppContext, explicit: Option<PathBuf>) -> Result<Lookups> {
    let Some(path) = explicit.or_else(|| ctx.lookups_path.clone()) else {
        return Ok(Lookups::mainnet());
    };
    let json = tokio::fs::read_to_string(&path)
        .await
        .wrap_err_with(|| format!("failed to read lookups file {}", path.display()))?;
    let lookups = Lookups::from_json_str(&json)
        .wrap_err_with(|| format!("invalid lookups file {}", path.display()))?;
    info!(path = %path.display(), assets = lookups.assets.len(), "loaded lookups");
    Ok(lookups)
}

async fn handle_explain(ctx: &AppContext, args: ExplainArgs) -> Result<()> {
    let mut lookups = load_lookups(ctx, args.lookups).await?;
    if let Some(symbol) = args.native_symbol.as_deref() {
        lookups = lookups.with_native_symbol(LedgerFamily::Receipt, symbol);
    }

    let json = tokio::fs::read_to_string(&args.input)
        .await
        .wrap_err_with(|| format!("failed to read input {}", args.input.display()))?;
    let record: ChainRecord = serde_json::from_str(&json)
        .wrap_err_with(|| format!("failed to parse chain record {}", args.input.display()))?;

    let id = record.requested_id().to_string();
    let raw = record.into_raw();
    let result = match explain(&id, raw.as_ref(), &lookups) {
        Ok(result) => result,
        Err(ExplainError::NotFound { id }) => {
            return Err(eyre!("transaction {id} was not found by the chain reader"));
        }
    };

    match args.output.as_str() {
        "json" => {
            let json_str =
                serde_json::to_string_pretty(&result).wrap_err("failed to serialize JSON")?;
            println!("{json_str}");
        }
        "table" => print_explanation_table(&result, &lookups),
        other => return Err(eyre!("unsupported output format: {other}")),
    }

    info!(
        id = %result.id,
        actions = result.actions.len(),
        transfers = result.transfers.len(),
        "explain command completed"
    );
    Ok(())
}

fn print_explanation_table(result: &ExplanationResult, lookups: &Lookups) {
    let mut summary = Table::new();
    summary.load_preset(UTF8_BORDERS_ONLY);
    summary.set_header(vec!["Field", "Value"]);
    summary.add_row(vec!["Transaction", result.id.as_str()]);
    summary.add_row(vec!["Ledger", ledger_label(result.family)]);
    summary.add_row(vec!["Status", result.status.as_str()]);
    summary.add_row(vec![
        "Sender",
        &display_name(Some(&result.sender), lookups),
    ]);
    summary.add_row(vec!["Time", &format_timestamp(result.timestamp_ms)]);
    summary.add_row(vec!["Fee", &result.fee_summary]);
    println!("\n{summary}\n");

    let mut actions = Table::new();
    actions.load_preset(UTF8_BORDERS_ONLY);
    actions.set_header(vec!["#", "Action", "Explanation"]);
    for (i, (action, sentence)) in result.actions.iter().zip(&result.explanations).enumerate() {
        actions.add_row(vec![
            (i + 1).to_string(),
            action.action_type.label().to_string(),
            sentence.clone(),
        ]);
    }
    if result.actions.is_empty() {
        println!("No actions decoded.\n");
    } else {
        println!("{actions}\n");
    }

    let rows = aggregate_flows(&result.actions);
    if rows.is_empty() {
        return;
    }
    let mut flows = Table::new();
    flows.load_preset(UTF8_BORDERS_ONLY);
    flows.set_header(vec!["From", "To", "Kind", "Count", "Assets"]);
    for row in &rows {
        let assets: Vec<String> = row
            .assets
            .iter()
            .map(|asset| asset_label(asset, result.family, lookups))
            .collect();
        flows.add_row(vec![
            display_name(row.from.as_deref(), lookups),
            display_name(row.to.as_deref(), lookups),
            row.action_type.label().to_string(),
            row.count.to_string(),
            assets.join(", "),
        ]);
    }
    println!("{flows}\n");
}

fn handle_decode_units(args: DecodeUnitsArgs) -> Result<()> {
    let raw = try_parse_integer(&args.raw)
        .ok_or_else(|| eyre!("not an unsigned integer: {}", args.raw))?;
    println!("{}", format_units(raw, args.decimals));
    Ok(())
}

fn ledger_label(family: LedgerFamily) -> &'static str {
    match family {
        LedgerFamily::Receipt => "receipt (gas-priced)",
        LedgerFamily::Effects => "effects (object model)",
    }
}

/// Symbol for a flow asset; empty ids are the ledger's native asset.
fn asset_label(asset_id: &str, family: LedgerFamily, lookups: &Lookups) -> String {
    if asset_id.is_empty() {
        return lookups.profile(family).native_symbol.clone();
    }
    lookups
        .assets
        .get(asset_id)
        .map(|asset| asset.symbol.clone())
        .unwrap_or_else(|| display_name(Some(asset_id), lookups))
}

fn format_timestamp(timestamp_ms: Option<u64>) -> String {
    timestamp_ms
        .and_then(|ms| i64::try_from(ms).ok())
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| UNKNOWN_PARTY.to_string())
}
