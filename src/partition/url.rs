//! Listing and file URL construction.

use super::PartitionError;

/// Builds the listing URL for a date partition.
///
/// Strips one trailing `/` from `base_url`, then appends
/// `/{year}/{day_of_year:03}`.
///
/// # Errors
///
/// Returns [`PartitionError::InvalidUrl`] if `base_url` is empty.
pub fn build_listing_url(
    base_url: &str,
    year: i32,
    day_of_year: u32,
) -> Result<String, PartitionError> {
    if base_url.trim().is_empty() {
        return Err(PartitionError::invalid_url(base_url));
    }
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    Ok(format!("{base}/{year}/{day_of_year:03}"))
}

/// Joins a download base URL and a listing filename with a single `/`.
#[must_use]
pub fn build_file_url(download_base_url: &str, filename: &str) -> String {
    let base = download_base_url.strip_suffix('/').unwrap_or(download_base_url);
    format!("{base}/{filename}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_strips_one_trailing_separator() {
        let with_slash = build_listing_url("http://x/", 2020, 5).unwrap();
        let without = build_listing_url("http://x", 2020, 5).unwrap();
        assert_eq!(with_slash, "http://x/2020/005");
        assert_eq!(with_slash, without);
    }

    #[test]
    fn test_listing_url_strips_only_one_separator() {
        let url = build_listing_url("http://x//", 2020, 5).unwrap();
        assert_eq!(url, "http://x//2020/005");
    }

    #[test]
    fn test_listing_url_three_digit_day_not_padded_further() {
        let url = build_listing_url("https://host/Ancillary/GLOBAL", 2023, 179).unwrap();
        assert_eq!(url, "https://host/Ancillary/GLOBAL/2023/179");
    }

    #[test]
    fn test_listing_url_rejects_empty_base() {
        assert_eq!(
            build_listing_url("", 2020, 1),
            Err(PartitionError::invalid_url(""))
        );
        assert!(build_listing_url("   ", 2020, 1).is_err());
    }

    #[test]
    fn test_file_url_single_separator() {
        assert_eq!(
            build_file_url("https://host/ob/getfile/", "a.nc"),
            "https://host/ob/getfile/a.nc"
        );
        assert_eq!(
            build_file_url("https://host/ob/getfile", "a.nc"),
            "https://host/ob/getfile/a.nc"
        );
    }
}
