//! CLI entry point for the oceandata downloader.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use oceandata_core::{DownloadOrchestrator, DownloadReport, DownloadRequest, OrchestratorError};
use tracing::{debug, error, info};

mod app_config;
mod cli;

use cli::Args;

/// Every matched file was written.
const EXIT_COMPLETE: u8 = 0;
/// Terminal error: nothing, or not everything, could be attempted.
const EXIT_FAILURE: u8 = 1;
/// The batch ran but at least one file failed.
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(&args).await {
        Ok(report) => ExitCode::from(exit_code_for(&report)),
        Err(err) => {
            match err.downcast_ref::<OrchestratorError>() {
                Some(terminal) => error!(kind = %terminal.kind(), "{err:#}"),
                None => error!("{err:#}"),
            }
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(args: &Args) -> Result<DownloadReport> {
    let file_config = app_config::load_file_config(args.config.as_deref())?;
    let credentials = app_config::resolve_credentials(&file_config)?;
    let settings = app_config::build_settings(args, &file_config);
    let output_dir = app_config::resolve_output_dir(args, &file_config);

    let orchestrator = DownloadOrchestrator::new(settings, credentials)
        .context("Invalid download settings")?;
    let request = build_request(args)?;

    info!(
        base_url = %request.base_url,
        filters = request.filter_list.len(),
        date = %request.filter_date,
        output_dir = %output_dir.display(),
        "Oceandata downloader starting"
    );

    let report = orchestrator.run_request(&request, &output_dir).await?;
    print_report(&report, &output_dir, args.json)?;
    Ok(report)
}

fn build_request(args: &Args) -> Result<DownloadRequest> {
    if let Some(path) = &args.request {
        return read_request_file(path);
    }
    Ok(DownloadRequest {
        base_url: args.base_url.clone().unwrap_or_default(),
        filter_list: args.filters.clone(),
        filter_date: args.date_or_today().to_string(),
    })
}

fn read_request_file(path: &Path) -> Result<DownloadRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse request file '{}'", path.display()))
}

fn print_report(report: &DownloadReport, output_dir: &Path, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(report).context("Failed to encode report")?;
        println!("{rendered}");
        return Ok(());
    }

    for outcome in report.outcomes() {
        match outcome.failure() {
            None => println!("ok      {}", outcome.name),
            Some(reason) => println!("failed  {} ({reason})", outcome.name),
        }
    }
    println!(
        "{} of {} files downloaded to {}",
        report.succeeded(),
        report.requested(),
        output_dir.display()
    );
    Ok(())
}

fn exit_code_for(report: &DownloadReport) -> u8 {
    if report.is_complete() {
        EXIT_COMPLETE
    } else {
        EXIT_PARTIAL
    }
}
