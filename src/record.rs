//! Product records – the data model consumed by pagination.
//!
//! A [`RecordSet`] can only be obtained through [`RecordSet::new`], which
//! rejects any set lacking one of the [`REQUIRED_FIELDS`]. Everything
//! downstream may therefore assume a validated schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Columns every catalog source must provide, in report order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "image_url",
    "box_info",
    "name",
    "variant",
    "ref",
    "price",
    "regular_price",
    "promo_tag",
    "ribbon_flag",
];

/// Field consulted by templates to decide whether to draw the ribbon.
pub const RIBBON_FIELD: &str = "ribbon_flag";

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Boolean interpretation, the same one conditional template regions
    /// apply: empty values, `false`, zero and empty text are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            // Spreadsheets hand back whole numbers as floats.
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One product: field name → value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(field, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the ribbon marker should be drawn for this product.
    pub fn has_ribbon(&self) -> bool {
        self.get(RIBBON_FIELD).is_some_and(Value::is_truthy)
    }
}

/// The ordered, validated records of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Validate and wrap records read from a source with the given header.
    ///
    /// Fails when a required column is absent from the header, naming every
    /// missing column, or when a record lacks one of the header's columns.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !columns.iter().any(|c| c == *f))
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::MissingFields { fields: missing });
        }

        for (index, record) in records.iter().enumerate() {
            if let Some(field) = columns.iter().find(|c| !record.contains(c)) {
                return Err(CatalogError::IncompleteRecord {
                    record: index + 1,
                    field: field.clone(),
                });
            }
        }

        log::debug!(
            "Validated {} records with {} columns",
            records.len(),
            columns.len()
        );
        Ok(Self { columns, records })
    }

    /// Validate records whose columns are implied by the records themselves.
    ///
    /// The column set is the union of all record fields in first-seen order,
    /// so a field absent on some records is reported as incomplete.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for (field, _) in record.fields() {
                if !columns.iter().any(|c| c == field) {
                    columns.push(field.to_string());
                }
            }
        }
        Self::new(columns, records)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Record {
        let mut r = Record::new();
        for field in REQUIRED_FIELDS {
            r.insert(field, "x");
        }
        r.insert("name", name);
        r
    }

    fn columns() -> Vec<String> {
        REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn accepts_complete_records() {
        let set = RecordSet::new(columns(), vec![product("a"), product("b")]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[1].get("name"), Some(&Value::from("b")));
    }

    #[test]
    fn reports_every_missing_column() {
        let cols: Vec<String> = columns()
            .into_iter()
            .filter(|c| c != "price" && c != "ref")
            .collect();
        let err = RecordSet::new(cols, vec![]).unwrap_err();
        match err {
            CatalogError::MissingFields { fields } => assert_eq!(fields, vec!["ref", "price"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_record_set_still_checks_header() {
        assert!(RecordSet::new(columns(), vec![]).unwrap().is_empty());
        assert!(RecordSet::new(vec![], vec![]).is_err());
    }

    #[test]
    fn record_missing_a_column_is_rejected() {
        let mut cols = columns();
        cols.push("category".into());
        let mut with_category = product("a");
        with_category.insert("category", "wine");
        let err = RecordSet::new(cols, vec![with_category, product("b")]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::IncompleteRecord { record: 2, ref field } if field == "category"
        ));
    }

    #[test]
    fn from_records_derives_columns() {
        let set = RecordSet::from_records(vec![product("a")]).unwrap();
        assert_eq!(set.columns().len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(Value::Number(12.0).to_string(), "12");
        assert_eq!(Value::Number(7.5).to_string(), "7.5");
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn truthiness_follows_template_conditions() {
        for truthy in [Value::Bool(true), Value::Number(1.0), "yes".into(), "x".into()] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
        for falsy in [Value::Empty, Value::Bool(false), Value::Number(0.0), "".into()] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
    }

    #[test]
    fn ribbon_absent_means_no_ribbon() {
        let mut r = Record::from_pairs([("name", "a")]);
        assert!(!r.has_ribbon());
        r.insert(RIBBON_FIELD, true);
        assert!(r.has_ribbon());
    }
}
