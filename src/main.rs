use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

mod error;
mod measlog;
mod model;
mod render;
mod roles;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "measlog-kpi")]
#[command(about = "EPAY KPI report from a switch measurement log", long_about = None)]
struct Cli {
    /// Measurement log to analyze.
    measlog: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Fail on a table block missing its start or end marker instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Join each EPAY row with clients named after its own SPA, not the last EPAY SPA seen.
    #[arg(long)]
    per_record_prefix: bool,

    /// Default log filter when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str())).init();

    let Some(path) = cli.measlog else {
        println!("Usage: measlog-kpi <measlog file>");
        return Ok(());
    };

    log::info!("Measurement log file: {}", path.display());

    // 1) Load the log.
    let bytes = std::fs::read(&path)
        .with_context(|| format!("read measurement log {}", path.display()))?;
    // Dumps may carry Latin-1 banners; only the ASCII table rows matter.
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();

    // 2) Extract both tables.
    let policy = if cli.strict {
        measlog::BlockPolicy::Fail
    } else {
        measlog::BlockPolicy::Skip
    };
    let store = measlog::extract(&lines, policy)
        .with_context(|| format!("parse measurement log {}", path.display()))?;
    if store.is_empty() {
        log::warn!("no SA_SPAMEAS or MS_PROCESS_MEAS rows found in {}", path.display());
    }
    log::info!(
        "{} SA_SPAMEAS rows, {} MS_PROCESS_MEAS rows",
        store.spa.len(),
        store.process.len()
    );

    // 3) Aggregate.
    let scope = if cli.per_record_prefix {
        model::JoinScope::PerRecord
    } else {
        model::JoinScope::LastSeen
    };
    let report = model::build_kpi_report(&store, roles::RoleMap::standard(), scope);
    log::info!("{} EPAY KPI rows", report.rows.len());

    // 4) Render.
    match cli.format {
        Format::Text => {
            print!("{}", render::render_text_report(&report));
            println!("finished!");
        }
        Format::Json => print!("{}", render::render_json_report(&report)?),
    }

    Ok(())
}
