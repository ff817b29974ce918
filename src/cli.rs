//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use oceandata_core::MAX_CONCURRENCY;

/// Download one day's files from a date-partitioned remote directory.
///
/// Resolves `--date` to `{base-url}/{year}/{day-of-year}`, reads that listing,
/// keeps the entries matching any `--filter`, and downloads them into the
/// output directory. Credentials come from `OCEANDATA_USERNAME` /
/// `OCEANDATA_PASSWORD` or the config file.
#[derive(Parser, Debug)]
#[command(name = "oceandata-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Listing base URL, without the date partition
    #[arg(short = 'b', long, required_unless_present = "request")]
    pub base_url: Option<String>,

    /// Filename filter; `*` allowed at either end (repeatable)
    #[arg(short = 'f', long = "filter", value_name = "PATTERN")]
    pub filters: Vec<String>,

    /// Date: `today`, `yesterday`, `YYYYMMDD` or `YYYY-MM-DD` [default: today]
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// JSON request file with `base_url`, `filter_list`, `filter_date`
    #[arg(long, value_name = "FILE", conflicts_with_all = ["base_url", "filters", "date"])]
    pub request: Option<PathBuf>,

    /// Output directory [default: config `output_dir`, else `.`]
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Config file [default: $XDG_CONFIG_HOME/oceandata-downloader/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Files fetched at once (1-16)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=MAX_CONCURRENCY as i64))]
    pub concurrency: Option<u8>,

    /// Attempts per listing and per file (1-100)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub max_attempts: Option<u32>,

    /// Retry immediately instead of backing off
    #[arg(long)]
    pub no_backoff: bool,

    /// Print the download report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Date token with the default applied.
    #[must_use]
    pub fn date_or_today(&self) -> &str {
        self.date.as_deref().unwrap_or("today")
    }
}
