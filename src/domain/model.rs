use chrono::{NaiveDateTime, Timelike};
use serde_json::{Map, Number, Value};

/// A single cell value as returned by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    /// Nested arrays and objects, passed through untouched.
    Json(Value),
}

impl Scalar {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map_or(Scalar::Null, Scalar::Float),
            },
            Value::String(s) => Scalar::Text(s),
            other => Scalar::Json(other),
        }
    }

    /// JSON has no NaN or infinity, those become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Scalar::Text(s) => Value::String(s.clone()),
            Scalar::DateTime(dt) => Value::String(format_iso(dt)),
            Scalar::Json(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Scalar::Float(f) if f.is_nan())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
            Scalar::DateTime(dt) => f.write_str(&format_iso(dt)),
            Scalar::Json(v) => write!(f, "{}", v),
        }
    }
}

fn format_iso(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// One row: column names in order, each with its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Replaces the value in place, or appends the column when it is new.
    pub fn set(&mut self, column: impl Into<String>, value: Scalar) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: Scalar) -> Self {
        self.set(column, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }
}

/// The rows of a single query, all sharing one column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl TabularResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from raw JSON rows. Columns are the union of all row
    /// keys in first-seen order; cells a row lacks become `Null`.
    pub fn from_json_rows(rows: Vec<Map<String, Value>>) -> Self {
        let columns = union_columns(rows.iter().flat_map(|row| row.keys()));

        let records = rows
            .into_iter()
            .map(|mut row| Record {
                fields: columns
                    .iter()
                    .map(|column| {
                        let value = row.remove(column).map_or(Scalar::Null, Scalar::from_json);
                        (column.clone(), value)
                    })
                    .collect(),
            })
            .collect();

        Self { columns, records }
    }

    /// Same normalisation as [`TabularResult::from_json_rows`], for records
    /// that are already typed.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = union_columns(
            records
                .iter()
                .flat_map(|record| record.fields.iter().map(|(name, _)| name)),
        );

        let records = records
            .into_iter()
            .map(|record| Record {
                fields: columns
                    .iter()
                    .map(|column| {
                        let value = record.get(column).cloned().unwrap_or(Scalar::Null);
                        (column.clone(), value)
                    })
                    .collect(),
            })
            .collect();

        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converts every value of `column` with `convert`, all or nothing.
    /// `Null` cells are left alone. Returns the first value that could not
    /// be converted, in which case the column is unchanged.
    pub fn convert_column<F>(&mut self, column: &str, convert: F) -> Result<(), Scalar>
    where
        F: Fn(&Scalar) -> Option<Scalar>,
    {
        let Some(index) = self.columns.iter().position(|c| c == column) else {
            return Ok(());
        };

        let mut converted = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let value = &record.fields[index].1;
            if value.is_null() {
                converted.push(Scalar::Null);
                continue;
            }
            match convert(value) {
                Some(new_value) => converted.push(new_value),
                None => return Err(value.clone()),
            }
        }

        for (record, value) in self.records.iter_mut().zip(converted) {
            record.fields[index].1 = value;
        }
        Ok(())
    }
}

fn union_columns<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for name in names {
        if !columns.contains(name) {
            columns.push(name.clone());
        }
    }
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// A single read against one table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub table: String,
    pub select: String,
    pub order: Option<OrderBy>,
}

impl QuerySpec {
    pub const SELECT_ALL: &'static str = "*";

    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: Self::SELECT_ALL.to_string(),
            order: None,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }
}
