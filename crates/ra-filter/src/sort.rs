//! Secondary sort for filtered record batches.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::filter::normalize;
use crate::record::{Record, Value};

/// Error returned when a sort direction name is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort direction '{0}' (expected asc or desc)")]
pub struct ParseDirectionError(pub String);

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// Field a filtered batch can be ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Listing date (`listingDate`, falling back to `date`), compared as dates.
    ListingDate,
    /// Popularity (`score`, falling back to `interestedCount`), compared as numbers.
    Score,
    /// Title, compared as normalized text.
    Title,
    /// Any other field, compared as numbers when both sides are numeric.
    Field(String),
}

impl SortKey {
    /// Record fields consulted for this key, in order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            SortKey::ListingDate => vec!["listingDate", "date"],
            SortKey::Score => vec!["score", "interestedCount"],
            SortKey::Title => vec!["title"],
            SortKey::Field(name) => vec![name.as_str()],
        }
    }

    /// Direction used when the caller does not pick one.
    ///
    /// Dates run oldest first, popularity runs highest first.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Score => SortDirection::Descending,
            SortKey::ListingDate | SortKey::Title | SortKey::Field(_) => SortDirection::Ascending,
        }
    }

    /// Extracts the comparable key of a record, or `None` if it is missing.
    ///
    /// Fields are tried in order; one whose value does not read as this key's
    /// kind (a blank date, a non-numeric score) falls through to the next.
    fn extract(&self, record: &Record) -> Option<SortValue> {
        self.fields()
            .into_iter()
            .filter_map(|f| record.get(f))
            .find_map(|value| self.read(value))
    }

    fn read(&self, value: &Value) -> Option<SortValue> {
        match self {
            SortKey::ListingDate => parse_date(value).map(SortValue::Date),
            SortKey::Score => value.as_number().map(SortValue::Number),
            SortKey::Title => Some(SortValue::Text(normalize(&value.to_string()))),
            SortKey::Field(_) => Some(match value.as_number() {
                Some(n) => SortValue::Number(n),
                None => SortValue::Text(normalize(&value.to_string())),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Known names map to the dedicated keys; anything else is a field name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "listingdate" | "listing_date" | "date" => SortKey::ListingDate,
            "score" | "popularity" | "interested" => SortKey::Score,
            "title" => SortKey::Title,
            _ => SortKey::Field(trimmed.to_string()),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::ListingDate => f.write_str("listingDate"),
            SortKey::Score => f.write_str("score"),
            SortKey::Title => f.write_str("title"),
            SortKey::Field(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum SortValue {
    Date(DateTime<Utc>),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // Mixed kinds only occur for SortKey::Field: numbers before text.
            (SortValue::Number(_), _) => Ordering::Less,
            (_, SortValue::Number(_)) => Ordering::Greater,
            (a, b) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        }
    }
}

/// Parses a listing date in the formats the upstream service emits.
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let Value::Text(text) = value else {
        return None;
    };
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Orders record indices by `key`, stably.
///
/// Records lacking a usable key go last regardless of direction; equal keys
/// keep their input order.
pub fn sort_indices(
    records: &[Record],
    indices: &mut [usize],
    key: &SortKey,
    direction: SortDirection,
) {
    let keys: Vec<Option<SortValue>> = records.iter().map(|r| key.extract(r)).collect();

    indices.sort_by(|&a, &b| match (&keys[a], &keys[b]) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(ka), Some(kb)) => {
            let ord = ka.compare(kb);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    });
}
