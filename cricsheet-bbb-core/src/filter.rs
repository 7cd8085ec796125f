//! Decides whether a match belongs to the configured series.
//!
//! Three independent predicates, all of which must hold:
//! - category: a declared match type must equal the target, ignoring case. A
//!   document that declares neither `match_type` nor `match_type_number` passes.
//! - teams: the declared teams contain both configured names (exact match).
//! - date window: at least one parseable date falls inside the window.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::config::SeriesConfig;
use crate::document::{MatchInfo, Scalar};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];
// `%.f` also matches an absent fraction.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RejectReason {
    Category,
    Teams,
    DateWindow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::Category => "category",
            RejectReason::Teams => "teams",
            RejectReason::DateWindow => "date_window",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Accepted,
    Rejected(RejectReason),
}

#[derive(Debug, Clone)]
pub struct MatchFilter {
    series: SeriesConfig,
}

impl MatchFilter {
    pub fn new(series: SeriesConfig) -> Self {
        Self { series }
    }

    pub fn series(&self) -> &SeriesConfig {
        &self.series
    }

    /// Category and team predicates. The date window is checked separately
    /// with [`MatchFilter::within_window`].
    pub fn accepts(&self, info: &MatchInfo) -> bool {
        self.category_matches(info) && self.teams_match(info)
    }

    /// Runs every predicate and names the first one that failed.
    pub fn evaluate(&self, info: &MatchInfo) -> FilterVerdict {
        if !self.category_matches(info) {
            FilterVerdict::Rejected(RejectReason::Category)
        } else if !self.teams_match(info) {
            FilterVerdict::Rejected(RejectReason::Teams)
        } else if !self.within_window(info) {
            FilterVerdict::Rejected(RejectReason::DateWindow)
        } else {
            FilterVerdict::Accepted
        }
    }

    pub fn category_matches(&self, info: &MatchInfo) -> bool {
        // An empty string counts as "not declared".
        let declared = info.match_type.as_deref().filter(|t| !t.is_empty());
        if declared.is_none() && info.match_type_number.is_none() {
            return true;
        }
        // A bare match_type_number compares as "" and is rejected.
        declared.unwrap_or_default().to_lowercase() == self.series.match_type().to_lowercase()
    }

    /// Superset check: extra team entries do not disqualify a match.
    pub fn teams_match(&self, info: &MatchInfo) -> bool {
        self.series
            .teams()
            .iter()
            .all(|wanted| info.teams.iter().any(|team| team == wanted))
    }

    pub fn within_window(&self, info: &MatchInfo) -> bool {
        let window = self.series.window();
        info.dates
            .iter()
            .filter_map(parse_match_date)
            .any(|date| window.contains(date))
    }
}

/// Parses an ISO 8601 date (extended or basic), or the date part of an ISO
/// datetime. Offset-qualified datetimes keep the date in their own offset.
/// Surrounding whitespace is not accepted.
pub fn parse_match_date(value: &Scalar) -> Option<NaiveDate> {
    let raw = value.to_string();
    let raw = raw.as_str();
    if raw.trim() != raw {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Raw date values that [`parse_match_date`] could not read.
pub fn unparseable_dates(info: &MatchInfo) -> Vec<String> {
    info.dates
        .iter()
        .filter(|d| parse_match_date(d).is_none())
        .map(|d| d.to_string())
        .collect()
}
