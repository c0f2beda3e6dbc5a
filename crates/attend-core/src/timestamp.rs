//! Lenient timestamp decoding.
//!
//! The backend serialises naive UTC datetimes without a zone designator
//! (`2024-01-10T08:30:00.123456`), while other producers emit RFC 3339.
//! Both are accepted; naive values are taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error as _};

pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .ok()
    .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize<'de, D>(de: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(de)?;
  parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}")))
}

pub(crate) fn deserialize_opt<'de, D>(
  de: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(de)? {
    None => Ok(None),
    Some(raw) => parse(&raw)
      .map(Some)
      .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}"))),
  }
}
