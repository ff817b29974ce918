//! User-Agent string for outbound HTTP requests.

/// Product token identifying the tool.
const PRODUCT: &str = "oceandata-downloader";

/// Default User-Agent for listing and file requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version} (date-partitioned-file-fetcher)")
}
