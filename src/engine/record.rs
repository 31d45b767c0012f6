//! Structured output: records and the per-invocation parse result.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;

/// One captured field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scalar value; empty string when never captured.
    Scalar(String),

    /// Appended-list value; empty when never captured.
    List(Vec<String>),
}

impl FieldValue {
    /// Scalar content, if this field is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// List content, if this field is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// True when nothing was ever captured into this field.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

/// One structured record assembled from captured values.
///
/// Field order always equals value declaration order in the template,
/// never capture order. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(fields: IndexMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    /// Look up a field by declared value name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a field by header position.
    pub fn get_index(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get_index(index).map(|(_, v)| v)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<&str> for Record {
    type Output = FieldValue;

    fn index(&self, name: &str) -> &FieldValue {
        &self.fields[name]
    }
}

impl Index<usize> for Record {
    type Output = FieldValue;

    fn index(&self, index: usize) -> &FieldValue {
        &self.fields[index]
    }
}

/// Ordered records produced from one parse invocation.
///
/// Created fresh per invocation; carries no state between runs.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    header: Vec<String>,
    records: Vec<Record>,
}

impl ParseResult {
    pub(crate) fn new(header: Vec<String>, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Declared value names labelling each record's fields.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Records in emission order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the result, yielding the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of records emitted.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParseResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
