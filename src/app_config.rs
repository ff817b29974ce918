//! Application configuration loading for CLI defaults and credentials.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use oceandata_core::{Credentials, FetchSettings, MAX_CONCURRENCY, RetryPolicy};
use serde::Deserialize;

use crate::cli::Args;

/// Environment variable holding the account name.
pub const USERNAME_ENV: &str = "OCEANDATA_USERNAME";

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "OCEANDATA_PASSWORD";

const APP_DIR: &str = "oceandata-downloader";

/// TOML-backed file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Account name; `OCEANDATA_USERNAME` wins when set.
    pub username: Option<String>,
    /// Account password; `OCEANDATA_PASSWORD` wins when set.
    pub password: Option<String>,
    /// Base URL individual files are fetched from.
    pub download_base_url: Option<String>,
    /// Host trusted to receive credentials across redirects.
    pub auth_broker_host: Option<String>,
    /// Attempts per listing and per file (1..=100).
    pub max_attempts: Option<u32>,
    /// Files fetched at once (1..=16).
    pub concurrency: Option<usize>,
    /// Exponential backoff between attempts.
    pub backoff: Option<bool>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Wall-clock ceiling per invocation in seconds.
    pub invocation_timeout_secs: Option<u64>,
    /// Largest listing accepted.
    pub max_listing_entries: Option<usize>,
    /// Default output directory.
    pub output_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=MAX_CONCURRENCY).contains(&concurrency)
        {
            bail!(
                "Invalid config value for `concurrency`: {concurrency}. Expected range: 1..={MAX_CONCURRENCY}"
            );
        }
        if let Some(attempts) = self.max_attempts
            && !(1..=100).contains(&attempts)
        {
            bail!("Invalid config value for `max_attempts`: {attempts}. Expected range: 1..=100");
        }
        if let Some(0) = self.max_listing_entries {
            bail!("Invalid config value for `max_listing_entries`: 0. Expected a positive integer");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs, 3600)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs, 3600)?;
        validate_timeout_secs("invocation_timeout_secs", self.invocation_timeout_secs, 86_400)?;
        validate_non_empty("download_base_url", self.download_base_url.as_deref())?;
        validate_non_empty("auth_broker_host", self.auth_broker_host.as_deref())?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>, max: u64) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=max).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..={max}");
    }
    Ok(())
}

fn validate_non_empty(field: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value
        && value.trim().is_empty()
    {
        bail!("Invalid config value for `{field}`: must not be empty");
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/oceandata-downloader/config.toml`
/// 2. `$HOME/.config/oceandata-downloader/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join("config.toml"));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn env_var_non_empty(name: &str) -> Option<String> {
    env_var_non_empty_os(name).and_then(|v| v.into_string().ok())
}

/// Loads config from `explicit` (must exist) or the default path (optional).
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return read_file_config(path);
    }
    match resolve_default_config_path() {
        Some(path) if path.exists() => read_file_config(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let cfg: FileConfig = toml::from_str(raw)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Picks credentials: environment first, then the config file.
pub fn resolve_credentials(config: &FileConfig) -> Result<Credentials> {
    credentials_from(
        env_var_non_empty(USERNAME_ENV),
        env_var_non_empty(PASSWORD_ENV),
        config,
    )
}

fn credentials_from(
    env_username: Option<String>,
    env_password: Option<String>,
    config: &FileConfig,
) -> Result<Credentials> {
    let username = env_username
        .or_else(|| config.username.clone())
        .filter(|u| !u.trim().is_empty());
    let password = env_password.or_else(|| config.password.clone());

    let Some(username) = username else {
        bail!(
            "No account configured. Set {USERNAME_ENV} and {PASSWORD_ENV}, or `username` and `password` in the config file"
        );
    };
    let Some(password) = password else {
        bail!("No password configured for '{username}'. Set {PASSWORD_ENV} or `password` in the config file");
    };
    Ok(Credentials::new(username, password))
}

/// Merges CLI overrides over file config over library defaults.
pub fn build_settings(args: &Args, config: &FileConfig) -> FetchSettings {
    let defaults = FetchSettings::default();

    let max_attempts = args
        .max_attempts
        .or(config.max_attempts)
        .unwrap_or(defaults.file_retry.max_attempts());
    let backoff = !args.no_backoff && config.backoff.unwrap_or(true);
    let retry = if backoff {
        RetryPolicy::with_max_attempts(max_attempts)
    } else {
        RetryPolicy::without_backoff(max_attempts)
    };

    FetchSettings {
        download_base_url: config
            .download_base_url
            .clone()
            .unwrap_or(defaults.download_base_url),
        auth_broker_host: config
            .auth_broker_host
            .clone()
            .unwrap_or(defaults.auth_broker_host),
        listing_retry: retry.clone(),
        file_retry: retry,
        concurrency: args
            .concurrency
            .map(usize::from)
            .or(config.concurrency)
            .unwrap_or(defaults.concurrency),
        connect_timeout: config
            .connect_timeout_secs
            .map_or(defaults.connect_timeout, Duration::from_secs),
        read_timeout: config
            .read_timeout_secs
            .map_or(defaults.read_timeout, Duration::from_secs),
        invocation_timeout: config.invocation_timeout_secs.map(Duration::from_secs),
        max_listing_entries: config.max_listing_entries,
        ..defaults
    }
}

/// Output directory: CLI, then config, then the working directory.
#[must_use]
pub fn resolve_output_dir(args: &Args, config: &FileConfig) -> PathBuf {
    args.output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}
