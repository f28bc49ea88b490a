use std::sync::Arc;

use super::{fetch, fetch_one, map_nodes, map_records, paginate, Page, PageRequest};
use crate::db::GraphClient;
use crate::entities::{Deal, Organization, Person, PersonDetail, RawNode, Story};
use crate::error::Result;
use crate::queries::{people, Label};

#[derive(Clone)]
pub struct PersonService {
    graph: Arc<dyn GraphClient>,
}

impl PersonService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<Person>> {
        let query = people::page(request.skip(), request.limit);
        paginate(self.graph.as_ref(), Label::Person, request, query, Person::from_node).await
    }

    /// People with the most recent deals
    pub async fn recent(&self, limit: u32) -> Result<Vec<Person>> {
        let rows = fetch(self.graph.as_ref(), people::recent(limit)).await?;
        map_nodes(&rows, Person::from_node)
    }

    /// Person by url with deals, organizations and stories; `None` when no
    /// person has that url
    pub async fn detail(&self, url: &str) -> Result<Option<PersonDetail>> {
        let graph = self.graph.as_ref();
        let Some(row) = fetch_one(graph, people::by_url(url)).await? else {
            return Ok(None);
        };
        let mut detail = PersonDetail::from_node(&RawNode::from_record(&row)?);

        let rows = fetch(graph, people::deals(url)).await?;
        detail.deals = map_records(&rows, Deal::from_record)?;

        let rows = fetch(graph, people::organizations(url)).await?;
        detail.organizations = map_records(&rows, Organization::from_record)?;

        let rows = fetch(graph, people::stories(url)).await?;
        detail.stories = map_nodes(&rows, Story::from_node)?;

        Ok(Some(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockGraph;
    use crate::queries;
    use serde_json::json;

    fn population(n: i64) -> Vec<serde_json::Value> {
        (1..=n)
            .map(|i| json!({"id": i, "props": {"name": format!("Person {}", i), "url": format!("/people/p{}", i)}}))
            .collect()
    }

    #[tokio::test]
    async fn test_first_page_of_twenty() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows("person.count", vec![json!({"total": 20})])
                .with_rows(people::PAGE, population(20)),
        );
        let service = PersonService::new(graph.clone());

        let page = service.list(PageRequest::new(1, 12, 100).unwrap()).await.unwrap();
        assert_eq!(page.data.len(), 12);
        assert_eq!(page.total, 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 12);
        assert_eq!(graph.call_names(), vec!["person.count", people::PAGE]);
    }

    #[tokio::test]
    async fn test_second_page_skips_first() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows("person.count", vec![json!({"total": 20})])
                .with_rows(people::PAGE, population(20)),
        );
        let service = PersonService::new(graph.clone());

        let page = service.list(PageRequest::new(2, 12, 100).unwrap()).await.unwrap();
        assert_eq!(page.data.len(), 8);
        assert_eq!(page.data[0].name, "Person 13");

        let calls = graph.calls();
        assert_eq!(calls[1].get_param("skip"), Some(&json!(12)));
        assert_eq!(calls[1].get_param("limit"), Some(&json!(12)));
    }

    #[tokio::test]
    async fn test_detail_not_found_short_circuits() {
        let graph = Arc::new(MockGraph::new());
        let service = PersonService::new(graph.clone());

        let detail = service.detail("/people/nobody").await.unwrap();
        assert!(detail.is_none());
        assert_eq!(graph.call_names(), vec![people::BY_URL]);
    }

    #[tokio::test]
    async fn test_detail_collects_related_entities() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows(
                    people::BY_URL,
                    vec![json!({"id": 1, "props": {"name": "Jane Doe", "url": "/people/jane-doe", "email": "jane@x.com"}})],
                )
                .with_rows(
                    people::DEALS,
                    vec![json!({
                        "id": 10,
                        "props": {"url": "/activity/123-Main-St-sale-01152023-acme-co"},
                        "role": "Seller",
                        "property_address": "123 Main St, New York, NY"
                    })],
                )
                .with_rows(
                    people::ORGANIZATIONS,
                    vec![json!({"id": 20, "props": {"name": "Acme", "type": "Brokerage"}, "role": "Partner"})],
                )
                .with_rows(
                    people::STORIES,
                    vec![json!({"id": 30, "props": {"title": "Big sale", "source": "Wire"}})],
                ),
        );
        let service = PersonService::new(graph.clone());

        let detail = service.detail("/people/jane-doe").await.unwrap().unwrap();
        assert_eq!(detail.person.name, "Jane Doe");
        assert_eq!(detail.email.as_deref(), Some("jane@x.com"));
        assert_eq!(detail.deals.len(), 1);
        assert_eq!(detail.deals[0].date, "2023-01-15");
        assert_eq!(detail.deals[0].role.as_deref(), Some("Seller"));
        assert_eq!(detail.organizations[0].role.as_deref(), Some("Partner"));
        assert_eq!(detail.stories[0].url, "");
        assert_eq!(graph.call_names().len(), 4);
    }

    #[tokio::test]
    async fn test_detail_subquery_failure_aborts() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows(people::BY_URL, vec![json!({"id": 1, "props": {}})])
                .failing(people::ORGANIZATIONS, "connection reset"),
        );
        let service = PersonService::new(graph.clone());

        let err = service.detail("/people/x").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert!(!graph.call_names().contains(&people::STORIES));
    }

    #[tokio::test]
    async fn test_count_failure_propagates() {
        let graph = Arc::new(MockGraph::new().failing(queries::count(Label::Person).name, "down"));
        let service = PersonService::new(graph);
        assert!(service.list(PageRequest::new(1, 12, 100).unwrap()).await.is_err());
    }
}
