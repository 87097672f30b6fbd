//! Club and competition records.
//!
//! These mirror the entries of `clubs.json` and `competitions.json`. The data
//! files store every number as a string (`"points": "13"`), so the numeric
//! fields are parsed from and written back as text.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of competition dates in the data files.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A club that can log in and book competition places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Display name, also used as the club identifier in URLs and forms.
    pub name: String,

    /// Login email.
    pub email: String,

    /// Points available to spend on places.
    #[serde(with = "text_number")]
    pub points: u32,
}

impl Club {
    /// Create a new club.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points,
        }
    }

    /// Check if the club holds at least `cost` points.
    #[must_use]
    pub fn can_afford(&self, cost: u32) -> bool {
        cost <= self.points
    }
}

/// A competition with a limited number of places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    /// Display name, also used as the competition identifier.
    pub name: String,

    /// When the competition takes place (naive local time).
    #[serde(with = "competition_date")]
    pub date: NaiveDateTime,

    /// Places still open for booking.
    #[serde(rename = "numberOfPlaces", with = "text_number")]
    pub number_of_places: u32,
}

impl Competition {
    /// Create a new competition.
    #[must_use]
    pub fn new(name: impl Into<String>, date: NaiveDateTime, number_of_places: u32) -> Self {
        Self {
            name: name.into(),
            date,
            number_of_places,
        }
    }

    /// Check if the competition took place strictly before `now`.
    #[must_use]
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.date < now
    }

    /// Check if any place is left.
    #[must_use]
    pub fn has_places(&self) -> bool {
        self.number_of_places > 0
    }

    /// The date rendered the way the data files write it.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Unsigned counts written as JSON strings, read from strings or numbers.
mod text_number {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("expected a whole number, got {text:?}"))),
        }
    }
}

mod competition_date {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid date {raw:?}: {e}")))
    }
}
