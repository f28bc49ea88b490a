use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{fetch, fetch_one, map_nodes, map_records, paginate, Page, PageRequest};
use crate::db::GraphClient;
use crate::entities::{Deal, DealDetail, Participant, Property, RawNode, Story};
use crate::error::Result;
use crate::queries::{deals, Label};

/// Raw property keys of one stored deal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealSample {
    pub available_keys: Vec<String>,
    pub sample_data: Map<String, Value>,
}

#[derive(Clone)]
pub struct DealService {
    graph: Arc<dyn GraphClient>,
}

impl DealService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<Deal>> {
        let query = deals::page(request.skip(), request.limit);
        paginate(self.graph.as_ref(), Label::Deal, request, query, Deal::from_node).await
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<Deal>> {
        let rows = fetch(self.graph.as_ref(), deals::recent(limit)).await?;
        map_nodes(&rows, Deal::from_node)
    }

    /// Deal by url with participants, properties and stories
    pub async fn detail(&self, url: &str) -> Result<Option<DealDetail>> {
        let graph = self.graph.as_ref();
        let Some(row) = fetch_one(graph, deals::by_url(url)).await? else {
            return Ok(None);
        };
        let mut detail = DealDetail::from_node(&RawNode::from_record(&row)?);

        let rows = fetch(graph, deals::participants(url)).await?;
        detail.participants = map_records(&rows, Participant::from_deal_record)?;

        let rows = fetch(graph, deals::properties(url)).await?;
        detail.properties = map_nodes(&rows, Property::from_node)?;

        let rows = fetch(graph, deals::stories(url)).await?;
        detail.stories = map_nodes(&rows, Story::from_node)?;

        Ok(Some(detail))
    }

    /// Key sets and raw values of the first `limit` deals
    pub async fn sample_properties(&self, limit: u32) -> Result<Vec<DealSample>> {
        let rows = fetch(self.graph.as_ref(), deals::sample_keys(limit)).await?;
        Ok(rows
            .iter()
            .map(|r| DealSample {
                available_keys: r.strings("keys"),
                sample_data: r.map("props").cloned().unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockGraph;
    use serde_json::json;

    const URL: &str = "/activity/123-Main-St-sale-01152023-acme-co";

    #[tokio::test]
    async fn test_detail_with_participants() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows(deals::BY_URL, vec![json!({"id": 7, "props": {"url": URL, "price": 1500000}})])
                .with_rows(
                    deals::PARTICIPANTS,
                    vec![
                        json!({"id": 1, "props": {"name": "Jane"}, "labels": ["Person"], "roles": ["Buyer"]}),
                        json!({"id": 2, "props": {"name": "Acme"}, "labels": ["Organization"], "roles": [null, "Lender"]}),
                    ],
                )
                .with_rows(deals::PROPERTIES, vec![json!({"id": 3, "props": {"address": "123 Main St"}})]),
        );
        let service = DealService::new(graph.clone());

        let detail = service.detail(URL).await.unwrap().unwrap();
        assert_eq!(detail.deal.property, "123 Main St");
        assert_eq!(detail.deal.kind.as_deref(), Some("sale"));
        assert_eq!(detail.deal.price.as_deref(), Some("1500000"));
        assert_eq!(detail.participants.len(), 2);
        assert_eq!(detail.participants[0].kind, "Person");
        assert_eq!(detail.participants[1].role.as_deref(), Some("Lender"));
        assert_eq!(detail.properties[0].address, "123 Main St");
        assert!(detail.stories.is_empty());
        assert_eq!(
            graph.call_names(),
            vec![deals::BY_URL, deals::PARTICIPANTS, deals::PROPERTIES, deals::STORIES]
        );
    }

    #[tokio::test]
    async fn test_detail_miss_issues_single_query() {
        let graph = Arc::new(MockGraph::new());
        let service = DealService::new(graph.clone());
        assert!(service.detail("/activity/none").await.unwrap().is_none());
        assert_eq!(graph.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_list_past_the_end_is_empty() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows("deal.count", vec![json!({"total": 3})])
                .with_rows(
                    deals::PAGE,
                    (1..=3).map(|i| json!({"id": i, "props": {}})).collect(),
                ),
        );
        let service = DealService::new(graph);
        let page = service.list(PageRequest::new(5, 12, 100).unwrap()).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 5);
    }

    #[tokio::test]
    async fn test_sample_properties() {
        let graph = Arc::new(MockGraph::new().with_rows(
            deals::SAMPLE_KEYS,
            vec![json!({"keys": ["url", "price"], "props": {"url": "/activity/x", "price": "10"}})],
        ));
        let service = DealService::new(graph);
        let samples = service.sample_properties(5).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].available_keys, vec!["url", "price"]);
        assert_eq!(samples[0].sample_data["price"], json!("10"));
    }
}
