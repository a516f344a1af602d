//! Serde helpers for the loosely typed JSON the backend returns.
//!
//! Ids arrive as numbers or numeric strings depending on the endpoint, points
//! may be missing or null, and deadlines may be an empty string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

pub const DEFAULT_POINTS: i64 = 10;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn into_i64<E: de::Error>(self) -> Result<Option<i64>, E> {
        match self {
            RawNumber::Int(n) => Ok(Some(n)),
            RawNumber::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
            RawNumber::Float(f) => Err(E::custom(format!("expected an integer id, got {}", f))),
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("expected a numeric id, got {:?}", s)))
            }
        }
    }
}

pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    RawNumber::deserialize(deserializer)?
        .into_i64()?
        .ok_or_else(|| de::Error::custom("id must not be empty"))
}

pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        Some(raw) => raw.into_i64(),
        None => Ok(None),
    }
}

pub fn points<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_id(deserializer)?.unwrap_or(DEFAULT_POINTS))
}

pub fn default_points() -> i64 {
    DEFAULT_POINTS
}

pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| de::Error::custom(format!("invalid deadline {:?}: {}", s, e))),
        _ => Ok(None),
    }
}
