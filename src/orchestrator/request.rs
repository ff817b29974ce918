//! JSON request body accepted by the front end.

use serde::{Deserialize, Serialize};

fn default_filter_date() -> String {
    "today".to_string()
}

/// One download request: where to look, what to take, and for which day.
///
/// ```
/// use oceandata_core::DownloadRequest;
///
/// let request: DownloadRequest = serde_json::from_str(
///     r#"{"base_url": "https://host/Ancillary/GLOBAL", "filter_list": ["*MET*"], "filter_date": "20230628"}"#,
/// ).unwrap();
/// assert_eq!(request.filter_list, ["*MET*"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadRequest {
    /// Listing base URL, without the date partition.
    pub base_url: String,
    /// Filter patterns, applied in order.
    #[serde(default)]
    pub filter_list: Vec<String>,
    /// Date token; `today` when omitted.
    #[serde(default = "default_filter_date")]
    pub filter_date: String,
}
