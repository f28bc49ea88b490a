//! Scripted in-memory `GraphClient` for tests.
//!
//! Rows are registered per query name. When a query binds `skip` / `limit`
//! the mock slices the scripted rows the way the database would, and every
//! executed query is recorded for later assertions.

use crate::db::{GraphClient, GraphQuery, Record};
use crate::error::{BrokerGraphError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockGraph {
    rows: Mutex<HashMap<&'static str, Vec<Record>>>,
    failures: Mutex<HashMap<&'static str, String>>,
    calls: Mutex<Vec<GraphQuery>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the rows returned for `name`
    pub fn with_rows(self, name: &'static str, rows: Vec<Value>) -> Self {
        self.rows
            .lock()
            .unwrap()
            .insert(name, rows.into_iter().map(Record::from_value).collect());
        self
    }

    /// Make `name` fail with a graph error
    pub fn failing(self, name: &'static str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(name, message.to_string());
        self
    }

    /// Every query executed so far, in order
    pub fn calls(&self) -> Vec<GraphQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|q| q.name).collect()
    }
}

#[async_trait]
impl GraphClient for MockGraph {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Record>> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some(message) = self.failures.lock().unwrap().get(query.name) {
            return Err(BrokerGraphError::Graph(message.clone()));
        }

        let rows = self
            .rows
            .lock()
            .unwrap()
            .get(query.name)
            .cloned()
            .unwrap_or_default();

        let skip = query
            .get_param("skip")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;
        let limit = query
            .get_param("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .unwrap_or(usize::MAX);

        Ok(rows.into_iter().skip(skip).take(limit).collect())
    }
}
