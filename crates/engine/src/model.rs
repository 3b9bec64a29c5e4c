use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::classify::FieldKind;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One source line: column name → raw string, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Column layout shared by every record of one ingestion cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    headers: Vec<String>,
    kinds: Vec<FieldKind>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema. Returns the first duplicated header name on failure.
    pub fn new(headers: Vec<String>, kinds: Vec<FieldKind>) -> Result<Self, String> {
        debug_assert_eq!(headers.len(), kinds.len());
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            if index.insert(h.clone(), i).is_some() {
                return Err(h.clone());
            }
        }
        Ok(Self { headers, kinds, index })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn kind(&self, column: &str) -> Option<FieldKind> {
        self.position(column).map(|i| self.kinds[i])
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Normalized record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One participant's typed row plus derived ranking fields.
///
/// Immutable once ranked: the filter pipeline only borrows records and
/// carries its own annotations alongside them.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub(crate) schema: Arc<Schema>,
    pub(crate) values: Vec<FieldValue>,
    pub(crate) total_score: i64,
    pub(crate) redeemed: bool,
    pub(crate) original_index: usize,
    pub(crate) rank: Option<usize>,
}

impl NormalizedRecord {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.schema.position(column).map(|i| &self.values[i])
    }

    /// Text value of a column; empty for missing or numeric columns.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Integer value of a column; 0 for missing or textual columns.
    pub fn int(&self, column: &str) -> i64 {
        self.get(column).and_then(FieldValue::as_int).unwrap_or(0)
    }

    /// Column value rendered as a string (numbers in decimal).
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .headers()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    pub fn redeemed(&self) -> bool {
        self.redeemed
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// 1-based leaderboard position; `None` before a ranking pass.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub(crate) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("_totalScore", &self.total_score)?;
        map.serialize_entry("_redeemed", &self.redeemed)?;
        map.serialize_entry("_rank", &self.rank)?;
        Ok(())
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 3))?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}
