//! Serde helpers for `log_date` fields.
//!
//! Log dates go out on the wire as `YYYY-MM-DD`. The server stores them as
//! midnight timestamps and may echo them back in RFC 3339 form, so decoding
//! accepts both shapes and keeps only the calendar day.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::CoreError;
use crate::types::LogDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `log_date` value in either `YYYY-MM-DD` or RFC 3339 form.
pub fn parse(value: &str) -> Result<LogDate, CoreError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.date_naive())
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Render a date the way the API expects it in request bodies.
pub fn format(date: &LogDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn serialize<S: Serializer>(date: &LogDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LogDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same as the parent module, for `Option<LogDate>` fields.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::LogDate;

    pub fn serialize<S: Serializer>(date: &Option<LogDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&super::format(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<LogDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
