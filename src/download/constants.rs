//! Constants for the download module (timeouts, endpoints, buffer sizes).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes between body reads).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Write buffer size used when streaming a file body to disk (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Maximum redirect hops followed for a single request.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Base URL that individual files are fetched from.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://oceandata.sci.gsfc.nasa.gov/ob/getfile";

/// Host trusted to receive credentials across a redirect chain.
pub const DEFAULT_AUTH_BROKER_HOST: &str = "urs.earthdata.nasa.gov";
