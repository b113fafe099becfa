//! Aggregate view of an extracted record sequence
//!
//! A summary is a fold: records are pushed one at a time and nothing but the
//! running totals is kept, so it works on documents of any size.

use crate::error::{ExtractError, Result};
use crate::schema::{FieldType, Schema};
use crate::value::{Record, Value};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

/// Keeps records whose field equals the given value.
///
/// The value is parsed with the field's type, so `ons=2.0` matches a float
/// 2 and `arrive_time=26125` matches those seconds. A record also matches
/// when the field renders exactly as the given text (`arrive_time=07:15:25`,
/// or an empty value for nulls).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field name
    pub field: String,
    /// Expected value, as written
    pub value: String,
}

impl FromStr for Filter {
    type Err = ExtractError;

    fn from_str(expr: &str) -> Result<Self> {
        match expr.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => Ok(Filter {
                field: field.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(ExtractError::InvalidFilter {
                expr: expr.to_string(),
                reason: "expected field=value".to_string(),
            }),
        }
    }
}

impl Filter {
    /// Bind the filter to a field of `schema`
    fn resolve(&self, schema: &Schema) -> Result<FieldFilter> {
        let field = schema
            .fields
            .iter()
            .find(|f| f.name == self.field)
            .ok_or_else(|| ExtractError::InvalidFilter {
                expr: format!("{}={}", self.field, self.value),
                reason: format!("schema '{}' has no field '{}'", schema.name, self.field),
            })?;

        Ok(FieldFilter {
            field: self.field.clone(),
            expected: Value::parse(field.kind, &self.value),
            text: self.value.clone(),
        })
    }
}

#[derive(Debug)]
struct FieldFilter {
    field: String,
    expected: Option<Value>,
    text: String,
}

impl FieldFilter {
    fn matches(&self, record: &Record) -> bool {
        record.get(&self.field).is_some_and(|value| {
            self.expected.as_ref() == Some(value) || value.to_string() == self.text
        })
    }
}

/// Totals for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    /// Field name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub kind: FieldType,
    /// Non-null values
    pub present: u64,
    /// Null values
    pub nulls: u64,
    /// Distinct values (text, integer and seconds fields)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<u64>,
    /// Sum of numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
    /// Smallest numeric value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Largest numeric value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Numeric values of at least 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_least_one: Option<u64>,
}

/// Totals for a record sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Records pushed
    pub scanned: u64,
    /// Records that passed every filter
    pub matched: u64,
    /// Per-field totals, in schema order
    pub fields: Vec<FieldSummary>,
}

#[derive(Debug)]
struct FieldAccumulator {
    summary: FieldSummary,
    seen: Option<HashSet<String>>,
}

impl FieldAccumulator {
    fn new(name: &str, kind: FieldType) -> Self {
        let counts_distinct = matches!(
            kind,
            FieldType::Text | FieldType::Integer | FieldType::Seconds
        );
        let numeric = kind.is_numeric();

        Self {
            summary: FieldSummary {
                name: name.to_string(),
                kind,
                present: 0,
                nulls: 0,
                distinct: counts_distinct.then_some(0),
                sum: numeric.then_some(0.0),
                min: None,
                max: None,
                at_least_one: numeric.then_some(0),
            },
            seen: counts_distinct.then(HashSet::new),
        }
    }

    fn push(&mut self, value: &Value) {
        let summary = &mut self.summary;
        if value.is_null() {
            summary.nulls += 1;
            return;
        }
        summary.present += 1;

        if let Some(seen) = &mut self.seen {
            seen.insert(value.to_string());
        }

        if let Some(v) = value.as_f64() {
            if let Some(sum) = &mut summary.sum {
                *sum += v;
            }
            if v >= 1.0 {
                if let Some(count) = &mut summary.at_least_one {
                    *count += 1;
                }
            }
            if is_beyond(value, summary.min.as_ref(), Ordering::Less) {
                summary.min = Some(value.clone());
            }
            if is_beyond(value, summary.max.as_ref(), Ordering::Greater) {
                summary.max = Some(value.clone());
            }
        }
    }

    fn finish(mut self) -> FieldSummary {
        if let Some(seen) = &self.seen {
            self.summary.distinct = Some(seen.len() as u64);
        }
        self.summary
    }
}

fn is_beyond(value: &Value, current: Option<&Value>, direction: Ordering) -> bool {
    match (value.as_f64(), current.and_then(Value::as_f64)) {
        (Some(_), None) => true,
        (Some(v), Some(c)) => v.partial_cmp(&c) == Some(direction),
        _ => false,
    }
}

/// Folds records into a [`Summary`]
#[derive(Debug)]
pub struct SummaryBuilder {
    filters: Vec<FieldFilter>,
    fields: Vec<FieldAccumulator>,
    scanned: u64,
    matched: u64,
}

impl SummaryBuilder {
    /// Start a summary over records of `schema`, keeping those that pass all
    /// `filters`
    pub fn new(schema: &Schema, filters: Vec<Filter>) -> Result<Self> {
        let filters = filters
            .iter()
            .map(|f| f.resolve(schema))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            filters,
            fields: schema
                .fields
                .iter()
                .map(|f| FieldAccumulator::new(&f.name, f.kind))
                .collect(),
            scanned: 0,
            matched: 0,
        })
    }

    /// Add one record; returns whether it passed the filters
    pub fn push(&mut self, record: &Record) -> bool {
        self.scanned += 1;
        if !self.filters.iter().all(|f| f.matches(record)) {
            return false;
        }

        self.matched += 1;
        for (acc, value) in self.fields.iter_mut().zip(record.values()) {
            acc.push(value);
        }
        true
    }

    /// Final totals
    pub fn finish(self) -> Summary {
        Summary {
            scanned: self.scanned,
            matched: self.matched,
            fields: self.fields.into_iter().map(FieldAccumulator::finish).collect(),
        }
    }
}

impl Summary {
    /// Totals of one field by name
    pub fn field(&self, name: &str) -> Option<&FieldSummary> {
        self.fields.iter().find(|f| f.name == name)
    }
}
