// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";
const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a `yyyy-MM-dd` calendar day.
pub fn parse_day(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, DAY_FORMAT)
        .map_err(|_| AppError::Validation("date should have format yyyy-MM-dd".to_string()))
}

/// Deserialize a timestamp given either as RFC3339 or as
/// `yyyy-MM-ddTHH:mm:ss` without an offset, which is taken as UTC.
pub fn deserialize_utc_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, LOCAL_DATE_TIME_FORMAT) {
        return Ok(Utc.from_utc_datetime(&dt));
    }

    Err(serde::de::Error::custom(format!(
        "Invalid timestamp '{raw}', expected yyyy-MM-ddTHH:mm:ss or RFC3339"
    )))
}
