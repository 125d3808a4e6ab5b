// Relays decoded QR payloads from stdin into the scouting sheet.
//
// Each input line is one camera frame; payloads within a frame are
// tab-separated and already ordered left to right by the decoder.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use scoutlog::{
    persist::sqlite::SqliteSheetSink,
    runtime::handle::{RelayMode, spawn_scanner},
    settings::ScoutSettings,
};

#[derive(Debug, Parser)]
#[command(name = "scout-relay", about = "Append scanned scouting records to the sheet")]
struct Args {
    /// Settings file (TOML, YAML, or JSON).
    #[arg(long, env = "SCOUT_CONFIG")]
    config: Option<PathBuf>,
    /// Sheet database, overriding the settings file.
    #[arg(long)]
    database: Option<PathBuf>,
    /// Sheet section name, overriding the settings file.
    #[arg(long)]
    section: Option<String>,
    /// Collect for the whole run and append on end of input.
    #[arg(long)]
    on_quit: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = ScoutSettings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(db) = args.database {
        settings.sheet.database = db;
    }
    if let Some(section) = args.section {
        settings.sheet.section = section;
    }
    if args.on_quit {
        settings.relay_mode = RelayMode::OnQuit;
    }

    let sink = SqliteSheetSink::open(&settings.sheet.database, settings.sheet.section.clone())
        .with_context(|| format!("opening sheet {}", settings.sheet.database.display()))?;
    let handle = spawn_scanner(Box::new(sink), settings.scanner_config());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let payloads: Vec<String> = line
            .split('\t')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if payloads.is_empty() {
            continue;
        }
        handle.submit_frame(payloads).await?;
    }

    let summary = handle.quit().await?;
    println!(
        "accepted {} unique records ({} duplicates, {} malformed); appended {}, failed {}",
        summary.accepted.len(),
        summary.duplicates,
        summary.malformed,
        summary.appended,
        summary.append_failures
    );
    Ok(())
}
