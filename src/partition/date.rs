//! Date token parsing and year / day-of-year resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use tracing::{debug, info};

use super::PartitionError;

/// A request date: explicit calendar date or a symbolic day relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    /// The reference day itself.
    Today,
    /// 24 hours before the reference time.
    Yesterday,
    /// A fixed calendar date, independent of the reference time.
    Explicit(NaiveDate),
}

/// Year and 1-based day-of-year of a listing partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedDate {
    /// Proleptic Gregorian year.
    pub year: i32,
    /// Day within the year, in `1..=366`.
    pub day_of_year: u32,
}

impl ResolvedDate {
    /// Builds a resolved date from a calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            day_of_year: date.ordinal(),
        }
    }
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:03}", self.year, self.day_of_year)
    }
}

impl FromStr for DateToken {
    type Err = PartitionError;

    /// Accepts `today`, `yesterday` (optionally `@`-prefixed), `YYYYMMDD`
    /// and `YYYY-MM-DD`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let input = raw.trim();
        match input.strip_prefix('@').unwrap_or(input) {
            "today" => return Ok(Self::Today),
            "yesterday" => return Ok(Self::Yesterday),
            _ => {}
        }

        debug!(input, "parsing explicit date");
        parse_compact(input)
            .or_else(|| parse_iso(input))
            .map(Self::Explicit)
            .ok_or_else(|| {
                PartitionError::invalid_date(
                    raw,
                    "expected 'today', 'yesterday', YYYYMMDD or YYYY-MM-DD",
                )
            })
    }
}

impl DateToken {
    /// Resolves the token against a reference time.
    ///
    /// Explicit dates ignore `reference`.
    #[must_use]
    pub fn resolve(self, reference: DateTime<Utc>) -> ResolvedDate {
        let date = match self {
            Self::Today => {
                info!(date = %reference, "date 'today' resolved");
                reference.date_naive()
            }
            Self::Yesterday => {
                let yesterday = reference - TimeDelta::days(1);
                info!(date = %yesterday, "date 'yesterday' resolved");
                yesterday.date_naive()
            }
            Self::Explicit(date) => date,
        };
        ResolvedDate::from_date(date)
    }
}

/// Parses a raw date token and resolves it in one step.
///
/// # Errors
///
/// Returns [`PartitionError::InvalidDate`] when the token cannot be parsed.
pub fn resolve_date(raw: &str, reference: DateTime<Utc>) -> Result<ResolvedDate, PartitionError> {
    raw.parse::<DateToken>().map(|token| token.resolve(reference))
}

fn parse_compact(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = input[0..4].parse::<i32>().ok()?;
    let month = input[4..6].parse::<u32>().ok()?;
    let day = input[6..8].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_iso(input: &str) -> Option<NaiveDate> {
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    #[test]
    fn test_explicit_date_resolves_to_day_of_year() {
        let resolved = resolve_date("20230628", at(2024, 5, 1, 12)).unwrap();
        assert_eq!(
            resolved,
            ResolvedDate {
                year: 2023,
                day_of_year: 179
            }
        );
    }

    #[test]
    fn test_explicit_date_ignores_reference_time() {
        let a = resolve_date("20150701", at(1999, 1, 1, 0)).unwrap();
        let b = resolve_date("20150701", at(2040, 12, 31, 23)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, resolve_date("20150701", at(1999, 1, 1, 0)).unwrap());
    }

    #[test]
    fn test_first_and_last_day_of_leap_year() {
        let reference = at(2024, 1, 1, 0);
        assert_eq!(resolve_date("20200101", reference).unwrap().day_of_year, 1);
        assert_eq!(
            resolve_date("20201231", reference).unwrap().day_of_year,
            366
        );
        assert_eq!(
            resolve_date("20211231", reference).unwrap().day_of_year,
            365
        );
    }

    #[test]
    fn test_today_uses_reference_time() {
        let resolved = resolve_date("today", at(2023, 2, 1, 8)).unwrap();
        assert_eq!(resolved.year, 2023);
        assert_eq!(resolved.day_of_year, 32);
    }

    #[test]
    fn test_yesterday_crosses_year_boundary() {
        let resolved = resolve_date("yesterday", at(2024, 1, 1, 5)).unwrap();
        assert_eq!(
            resolved,
            ResolvedDate {
                year: 2023,
                day_of_year: 365
            }
        );
    }

    #[test]
    fn test_at_prefixed_symbolic_tokens() {
        assert_eq!("@today".parse::<DateToken>().unwrap(), DateToken::Today);
        assert_eq!(
            "@yesterday".parse::<DateToken>().unwrap(),
            DateToken::Yesterday
        );
    }

    #[test]
    fn test_iso_date_accepted() {
        let token: DateToken = "2018-01-01".parse().unwrap();
        assert_eq!(
            token,
            DateToken::Explicit(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_invalid_dates_rejected() {
        for raw in [
            "", "2023", "20231301", "20230230", "2023062", "202306281", "abcdefgh", "tomorrow",
            "28/06/2023", "+2023062",
        ] {
            let result = raw.parse::<DateToken>();
            assert!(
                matches!(result, Err(PartitionError::InvalidDate { .. })),
                "expected InvalidDate for {raw:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_invalid_date_message_names_input() {
        let err = "2023-99-99".parse::<DateToken>().unwrap_err();
        assert!(err.to_string().contains("2023-99-99"));
    }

    #[test]
    fn test_resolved_date_display_is_zero_padded() {
        let date = ResolvedDate {
            year: 2020,
            day_of_year: 5,
        };
        assert_eq!(date.to_string(), "2020/005");
    }
}
