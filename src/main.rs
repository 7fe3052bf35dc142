use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ddlgraph::config::InferenceConfig;
use ddlgraph::ir::{DetailLevel, GraphIR};
use ddlgraph::report::render_summary;
use ddlgraph::session::Session;

#[derive(Parser)]
#[command(name = "ddlgraph")]
#[command(version, about = "Extract tables from a MySQL DDL dump and infer their relationships")]
struct Cli {
    /// DDL dump (.sql or .txt)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON inference config (excludedColumns, pinnedOwners)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Include highlight flags for this selected table
    #[arg(short, long)]
    select: Option<String>,

    /// Column detail level: tables, pk, pk_fk, all
    #[arg(short, long, default_value = "all", value_parser = parse_detail)]
    detail: DetailLevel,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Summary,
}

fn parse_detail(s: &str) -> Result<DetailLevel, String> {
    DetailLevel::from_str(s).ok_or_else(|| format!("Invalid detail level: {s}"))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => InferenceConfig::from_path(path)?,
        None => InferenceConfig::default(),
    };

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let mut session = Session::new(&config);
    session.load(&input)?;
    session.select(cli.select.as_deref());

    let rendered = match cli.format {
        Format::Summary => render_summary(&session),
        Format::Json => {
            let mut ir = GraphIR::from_session(&session, cli.detail);
            if cli.select.is_some() {
                ir = ir.with_highlight(&session);
            }
            let mut json = if cli.pretty {
                serde_json::to_string_pretty(&ir)?
            } else {
                serde_json::to_string(&ir)?
            };
            json.push('\n');
            json
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
