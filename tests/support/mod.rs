//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod raw_server;
pub mod socket_guard;

use std::time::Duration;

use oceandata_core::{Credentials, FetchSettings, RetryPolicy};
use wiremock::MockServer;

/// Filename used by the reference end-to-end scenario.
pub const MET_FILE: &str = "GMAO_MERRA2.20230628T100000.MET.nc";

/// Renders a listing page in the shape the remote index serves.
pub fn listing_html(names: &[&str]) -> String {
    let rows: String = names
        .iter()
        .map(|name| {
            format!("      <tr><td><a href=\"/getfile/{name}\">{name}</a></td><td>1.2M</td></tr>\n")
        })
        .collect();
    format!(
        "<html><body>\n<table>\n  <thead><tr><th>Name</th><th>Size</th></tr></thead>\n  <tbody>\n{rows}  </tbody>\n</table>\n</body></html>"
    )
}

/// Settings pointed at `server` with immediate retries.
pub fn mock_settings(server: &MockServer) -> FetchSettings {
    settings_for(&server.uri())
}

/// Settings fetching files from `{uri}/getfile` with immediate retries.
pub fn settings_for(uri: &str) -> FetchSettings {
    FetchSettings {
        download_base_url: format!("{uri}/getfile"),
        auth_broker_host: "urs.earthdata.nasa.gov".to_string(),
        listing_retry: RetryPolicy::without_backoff(10),
        file_retry: RetryPolicy::without_backoff(10),
        connect_timeout: Duration::from_secs(5),
        read_timeout: Duration::from_secs(10),
        ..FetchSettings::default()
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("oceanuser", "s3cret")
}

/// Expected `Authorization` header value for [`test_credentials`].
pub const TEST_BASIC_AUTH: &str = "Basic b2NlYW51c2VyOnMzY3JldA==";

/// `http://localhost:{port}` for the same server, reachable under a second host name.
pub fn localhost_uri(server: &MockServer) -> String {
    format!("http://localhost:{}", server.address().port())
}
