//! Presentation shaping between the query layer and the JSON responses.
//!
//! The frontend wants a readable game date next to the raw one and cannot
//! cope with `NaN` in JSON, so both are handled here rather than in storage.

use crate::domain::model::{Record, Scalar, TabularResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

pub const GAMEDAY_COLUMN: &str = "gameday";
pub const GAMEDAY_FORMATTED_COLUMN: &str = "gameday_formatted";

const GAMEDAY_DISPLAY_FORMAT: &str = "%A, %B %d";

/// A JSON-ready flat object, key order preserved.
pub type FormattedRecord = Map<String, Value>;

/// Outcome of [`format_gameday`]: either a rendered date or the original
/// value echoed back as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamedayFormat {
    Formatted(String),
    Passthrough(String),
}

impl GamedayFormat {
    pub fn as_str(&self) -> &str {
        match self {
            GamedayFormat::Formatted(s) | GamedayFormat::Passthrough(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            GamedayFormat::Formatted(s) | GamedayFormat::Passthrough(s) => s,
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, GamedayFormat::Formatted(_))
    }
}

/// Renders a game date as `"Sunday, September 08"`.
///
/// Text is read as `YYYY-MM-DD`, ignoring anything from the first `T`
/// onwards. Values that are not dates come back unchanged as
/// [`GamedayFormat::Passthrough`]; `Null` becomes an empty string.
pub fn format_gameday(value: &Scalar) -> GamedayFormat {
    match value {
        Scalar::DateTime(dt) => GamedayFormat::Formatted(render(dt)),
        Scalar::Text(raw) => format_gameday_str(raw),
        other => GamedayFormat::Passthrough(other.to_string()),
    }
}

pub fn format_gameday_str(raw: &str) -> GamedayFormat {
    let date_part = raw.split('T').next().unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => GamedayFormat::Formatted(date.format(GAMEDAY_DISPLAY_FORMAT).to_string()),
        Err(_) => GamedayFormat::Passthrough(raw.to_string()),
    }
}

fn render(dt: &NaiveDateTime) -> String {
    dt.format(GAMEDAY_DISPLAY_FORMAT).to_string()
}

/// Converts a query result into flat JSON records.
///
/// Records and columns keep their order. When a `gameday` column exists
/// every record gets a trailing `gameday_formatted`. `NaN` is emitted as
/// `null`.
pub fn to_json_records(result: &TabularResult) -> Vec<FormattedRecord> {
    if result.is_empty() {
        return Vec::new();
    }

    let with_gameday = result.has_column(GAMEDAY_COLUMN);

    result
        .records()
        .iter()
        .map(|record| {
            let mut object = to_json_object(record);
            if with_gameday {
                let formatted = record
                    .get(GAMEDAY_COLUMN)
                    .map(format_gameday)
                    .map(GamedayFormat::into_string)
                    .unwrap_or_default();
                object.insert(GAMEDAY_FORMATTED_COLUMN.to_string(), Value::String(formatted));
            }
            object
        })
        .collect()
}

pub fn to_json_object(record: &Record) -> FormattedRecord {
    record.to_json_map()
}
