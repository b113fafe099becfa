//! Typed cell values and emitted records

use crate::schema::FieldType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// A converted cell value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Trimmed cell text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Seconds since midnight of the service day
    Seconds(i64),
    /// No value; the default of fields that declare none
    Null,
}

impl Value {
    /// Convert raw cell text according to `kind`.
    ///
    /// Returns `None` when the text does not convert, in which case the
    /// caller substitutes the field's default.
    pub fn parse(kind: FieldType, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        match kind {
            FieldType::Text => Some(Value::Text(raw.to_string())),
            FieldType::Integer => raw.parse::<i64>().ok().map(Value::Integer),
            FieldType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            FieldType::Seconds => parse_seconds(raw).map(Value::Seconds),
            FieldType::Clock => parse_clock_minutes(raw).map(Value::Float),
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) | Value::Seconds(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) | Value::Null => None,
        }
    }

    /// Text view of the value, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Anchor a seconds-since-midnight value on a service date.
    ///
    /// Values past 24h roll into the following day(s).
    pub fn timestamp_on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        match self {
            Value::Seconds(secs) => date
                .and_time(NaiveTime::MIN)
                .checked_add_signed(TimeDelta::try_seconds(*secs)?),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Seconds(secs) => {
                let (hours, rest) = (secs / 3600, secs % 3600);
                write!(f, "{:02}:{:02}:{:02}", hours, rest / 60, rest % 60)
            }
            Value::Null => Ok(()),
        }
    }
}

/// Parse seconds since midnight. Only plain ASCII digits are accepted.
pub fn parse_seconds(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Parse an elapsed time of the form `H:MM:SS` or `MM:SS` into minutes
pub fn parse_clock_minutes(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let parse = |s: &str| -> Option<u32> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };

    match parts.as_slice() {
        [h, m, s] => {
            let (h, m, s) = (parse(h)?, parse(m)?, parse(s)?);
            Some(f64::from(h) * 60.0 + f64::from(m) + f64::from(s) / 60.0)
        }
        [m, s] => {
            let (m, s) = (parse(m)?, parse(s)?);
            Some(f64::from(m) + f64::from(s) / 60.0)
        }
        _ => None,
    }
}

/// One extracted row: schema field names paired with converted values
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(names: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    /// Field names in schema order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values in schema order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate `(name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
