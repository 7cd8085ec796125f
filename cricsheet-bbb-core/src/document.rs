//! Typed schema for a single Cricsheet match document (JSON, "new" format).
//!
//! Only `info` is required. Everything else is optional in the source data and
//! modelled as `Option` or as a collection that defaults to empty, so that a
//! structurally sound document always parses. Defaults for numeric fields are
//! applied later, when a [`crate::flatten::FlatDeliveryRecord`] is built.
//!
//! [`parse_document`] is the only fallible step between raw bytes and the
//! typed model; anything it rejects is reported as [`DocumentError::Malformed`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed match document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A JSON value that Cricsheet writes either as a string or as a number
/// (ball labels, seasons, match numbers, dates). Kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// Treats an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchDocument {
    pub info: MatchInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub innings: Vec<Innings>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchInfo {
    pub match_type: Option<String>,
    pub match_type_number: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<Scalar>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub season: Option<Scalar>,
    pub match_id: Option<Scalar>,
    pub event: Option<Event>,
}

impl MatchInfo {
    /// `match_id` when present, otherwise the event's match number.
    pub fn match_id(&self) -> Option<&Scalar> {
        self.match_id
            .as_ref()
            .or_else(|| self.event.as_ref().and_then(|e| e.match_number.as_ref()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Event {
    pub name: Option<String>,
    pub match_number: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Innings {
    pub team: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Over {
    pub over: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Delivery {
    pub ball: Option<Scalar>,
    pub batter: Option<String>,
    pub bowler: Option<String>,
    pub non_striker: Option<String>,
    pub runs: Option<Runs>,
    pub extras: Option<Extras>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wickets: Vec<Wicket>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Runs {
    pub batter: Option<u32>,
    pub extras: Option<u32>,
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Extras {
    pub byes: Option<u32>,
    pub legbyes: Option<u32>,
    pub wides: Option<u32>,
    pub noballs: Option<u32>,
    pub penalty: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wicket {
    pub kind: Option<String>,
    pub player_out: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fielders: Vec<Fielder>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Fielder {
    pub name: Option<String>,
}

/// Decodes one archive entry into a [`MatchDocument`].
pub fn parse_document(bytes: &[u8]) -> Result<MatchDocument, DocumentError> {
    Ok(serde_json::from_slice(bytes)?)
}

impl MatchDocument {
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn delivery_count(&self) -> usize {
        self.innings
            .iter()
            .flat_map(|inn| inn.overs.iter())
            .map(|over| over.deliveries.len())
            .sum()
    }
}
