//! Authorization forwarding rule for redirect hops.
//!
//! Credentials follow a redirect only while the chain stays on one host or
//! passes through the authentication broker. Once a hop drops them they are
//! not restored for the rest of the chain.

use reqwest::StatusCode;
use reqwest::header::LOCATION;
use url::Url;

/// Returns `true` if the Authorization header may be sent to `target_host`
/// after a redirect from `origin_host`.
///
/// Host comparison is ASCII case-insensitive. A missing host on either side
/// never receives credentials.
#[must_use]
pub fn should_forward_authorization(
    origin_host: Option<&str>,
    target_host: Option<&str>,
    broker_host: &str,
) -> bool {
    let (Some(origin), Some(target)) = (origin_host, target_host) else {
        return false;
    };
    origin.eq_ignore_ascii_case(target)
        || origin.eq_ignore_ascii_case(broker_host)
        || target.eq_ignore_ascii_case(broker_host)
}

/// Resolves the next hop of a redirect response, if it is one we follow.
pub(crate) fn redirect_target(current: &Url, response: &reqwest::Response) -> Option<Url> {
    if !matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) {
        return None;
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}
