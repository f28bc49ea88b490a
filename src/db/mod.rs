//! Graph database access: parameterized queries, result records, and the
//! client seam every service runs its queries through.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

pub mod neo4j;

#[cfg(test)]
pub mod mock;

pub use neo4j::Neo4jHttpClient;

/// A parameterized Cypher statement.
///
/// `name` is a stable tag used for logging and for scripting test doubles;
/// every variable in `cypher` is bound through `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery {
    pub name: &'static str,
    pub cypher: &'static str,
    pub params: Map<String, Value>,
}

impl GraphQuery {
    pub fn new(name: &'static str, cypher: &'static str) -> Self {
        Self {
            name,
            cypher,
            params: Map::new(),
        }
    }

    /// Bind a parameter value
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Look up a bound parameter
    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// One result row, keyed by the statement's column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Zip a positional row with its column names
    pub fn from_row(columns: &[String], row: Vec<Value>) -> Self {
        Self(columns.iter().cloned().zip(row).collect())
    }

    /// Build a record from a JSON object; anything else yields an empty record
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Raw column value, `None` when absent or null
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column).filter(|v| !v.is_null())
    }

    pub fn i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    /// Scalar column rendered as a string
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(scalar_to_string)
    }

    /// Column holding a list of strings; non-string items are skipped
    pub fn strings(&self, column: &str) -> Vec<String> {
        match self.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Column holding a list of possibly-null strings, nulls preserved
    pub fn optional_strings(&self, column: &str) -> Vec<Option<String>> {
        match self.get(column) {
            Some(Value::Array(items)) => items.iter().map(scalar_to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Column holding a property map
    pub fn map(&self, column: &str) -> Option<&Map<String, Value>> {
        self.get(column).and_then(Value::as_object)
    }
}

/// Render a scalar graph value as text.
///
/// Strings pass through, numbers and booleans are formatted, lists are joined
/// with `", "`. Nulls and nested maps have no text form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

/// Executes parameterized queries against the graph.
///
/// Implementations are constructed once by the entry point and shared
/// (`Arc<dyn GraphClient>`); each call is an independent round trip.
#[async_trait]
pub trait GraphClient: Send + Sync {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Record>>;
}
