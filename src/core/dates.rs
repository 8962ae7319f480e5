use crate::domain::model::Scalar;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Parses the timestamp shapes the backend emits for `date`, `timestamp`
/// and `timestamptz` columns. Offsets are dropped, wall-clock time is kept.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.naive_local());
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Cell-level conversion for [`TabularResult::convert_column`](crate::domain::model::TabularResult::convert_column).
pub fn to_datetime(value: &Scalar) -> Option<Scalar> {
    match value {
        Scalar::DateTime(_) => Some(value.clone()),
        Scalar::Text(raw) => parse_timestamp(raw).map(Scalar::DateTime),
        _ => None,
    }
}
