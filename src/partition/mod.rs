//! Date partition addressing for the remote directory tree.
//!
//! Remote listings are laid out as `{base}/{year}/{day-of-year}`. This module
//! turns a user-supplied date token into a [`ResolvedDate`] and builds the
//! listing and file URLs for it.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use oceandata_core::partition::{DateToken, build_listing_url};
//!
//! let token: DateToken = "20230628".parse().unwrap();
//! let date = token.resolve(Utc::now());
//! let url = build_listing_url("https://host/Ancillary/GLOBAL/", date.year, date.day_of_year).unwrap();
//! assert_eq!(url, "https://host/Ancillary/GLOBAL/2023/179");
//! ```

mod date;
mod error;
mod url;

pub use date::{DateToken, ResolvedDate, resolve_date};
pub use error::PartitionError;
pub use url::{build_file_url, build_listing_url};
