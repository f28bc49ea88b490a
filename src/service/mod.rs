//! Entity services: run query composers through the shared graph client,
//! shape rows through the mappers, and add page/limit semantics.
//!
//! List operations issue a count query and a page query as two independent
//! round trips; totals may drift from the page under concurrent writes.
//! Detail operations stop after the primary lookup when it finds nothing.

mod deals;
mod organizations;
mod people;
mod properties;
mod stories;

pub use deals::{DealSample, DealService};
pub use organizations::OrganizationService;
pub use people::PersonService;
pub use properties::PropertyService;
pub use stories::StoryService;

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::db::{GraphClient, GraphQuery, Record};
use crate::entities::RawNode;
use crate::error::{BrokerGraphError, Result};
use crate::queries::{self, Label};

/// A validated 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Validate `page >= 1` and `1 <= limit <= max_limit`
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self> {
        if page < 1 {
            return Err(BrokerGraphError::InvalidInput(
                "page must be greater than or equal to 1".to_string(),
            ));
        }
        if limit < 1 || limit > max_limit {
            return Err(BrokerGraphError::InvalidInput(format!(
                "limit must be between 1 and {}",
                max_limit
            )));
        }
        Ok(Self { page, limit })
    }

    /// Rows to skip before this page: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// All entity services over one graph client
#[derive(Clone)]
pub struct Services {
    pub people: PersonService,
    pub deals: DealService,
    pub organizations: OrganizationService,
    pub properties: PropertyService,
    pub stories: StoryService,
}

impl Services {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self {
            people: PersonService::new(Arc::clone(&graph)),
            deals: DealService::new(Arc::clone(&graph)),
            organizations: OrganizationService::new(Arc::clone(&graph)),
            properties: PropertyService::new(Arc::clone(&graph)),
            stories: StoryService::new(graph),
        }
    }
}

/// Run a query, logging its name, row count and latency
pub(crate) async fn fetch(graph: &dyn GraphClient, query: GraphQuery) -> Result<Vec<Record>> {
    let start = Instant::now();
    let rows = graph.run(&query).await?;
    log::debug!(
        "{}: {} rows in {:?}",
        query.name,
        rows.len(),
        start.elapsed()
    );
    Ok(rows)
}

/// Run a query expected to match at most one row
pub(crate) async fn fetch_one(graph: &dyn GraphClient, query: GraphQuery) -> Result<Option<Record>> {
    Ok(fetch(graph, query).await?.into_iter().next())
}

/// Total number of nodes with `label`
pub(crate) async fn fetch_total(graph: &dyn GraphClient, label: Label) -> Result<u64> {
    let row = fetch_one(graph, queries::count(label)).await?;
    Ok(row
        .and_then(|r| r.i64("total"))
        .map(|t| t.max(0) as u64)
        .unwrap_or(0))
}

/// Map node rows through a node-only mapper
pub(crate) fn map_nodes<T>(rows: &[Record], f: impl Fn(&RawNode) -> T) -> Result<Vec<T>> {
    rows.iter()
        .map(|r| RawNode::from_record(r).map(|n| f(&n)))
        .collect()
}

/// Map rows through a record-aware mapper
pub(crate) fn map_records<T>(rows: &[Record], f: impl Fn(&Record) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(f).collect()
}

/// Count + page for `label`, mapping each node with `f`
pub(crate) async fn paginate<T>(
    graph: &dyn GraphClient,
    label: Label,
    request: PageRequest,
    query: GraphQuery,
    f: impl Fn(&RawNode) -> T,
) -> Result<Page<T>> {
    let total = fetch_total(graph, label).await?;
    let rows = fetch(graph, query).await?;
    let data = map_nodes(&rows, f)?;

    log::debug!(
        "{} page {} (limit {}): {} of {}",
        label.as_str(),
        request.page,
        request.limit,
        data.len(),
        total
    );

    Ok(Page {
        data,
        total,
        page: request.page,
        limit: request.limit,
    })
}
