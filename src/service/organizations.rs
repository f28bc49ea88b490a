use std::sync::Arc;

use super::{fetch, fetch_one, map_nodes, map_records, paginate, Page, PageRequest};
use crate::db::GraphClient;
use crate::entities::{Deal, Organization, OrganizationDetail, Person, RawNode, Story};
use crate::error::Result;
use crate::queries::{organizations, Label};

#[derive(Clone)]
pub struct OrganizationService {
    graph: Arc<dyn GraphClient>,
}

impl OrganizationService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<Organization>> {
        let query = organizations::page(request.skip(), request.limit);
        paginate(
            self.graph.as_ref(),
            Label::Organization,
            request,
            query,
            Organization::from_node,
        )
        .await
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<Organization>> {
        let rows = fetch(self.graph.as_ref(), organizations::recent(limit)).await?;
        map_nodes(&rows, Organization::from_node)
    }

    pub async fn detail(&self, url: &str) -> Result<Option<OrganizationDetail>> {
        let graph = self.graph.as_ref();
        let Some(row) = fetch_one(graph, organizations::by_url(url)).await? else {
            return Ok(None);
        };
        let mut detail = OrganizationDetail::from_node(&RawNode::from_record(&row)?);

        let rows = fetch(graph, organizations::members(url)).await?;
        detail.members = map_records(&rows, Person::from_record)?;

        let rows = fetch(graph, organizations::deals(url)).await?;
        detail.deals = map_records(&rows, Deal::from_record)?;

        let rows = fetch(graph, organizations::stories(url)).await?;
        detail.stories = map_nodes(&rows, Story::from_node)?;

        Ok(Some(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockGraph;
    use serde_json::json;

    #[tokio::test]
    async fn test_detail_members_carry_edge_role() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows(
                    organizations::BY_URL,
                    vec![json!({"id": 1, "props": {"name": "Acme", "url": "/organizations/acme", "type": "Lender"}})],
                )
                .with_rows(
                    organizations::MEMBERS,
                    vec![json!({"id": 2, "props": {"name": "Jane", "title": "MD"}, "role": "Principal"})],
                )
                .with_rows(
                    organizations::DEALS,
                    vec![json!({"id": 3, "props": {"url": "/activity/9-Pine-St-financing-07042020"}, "role": "Lender"})],
                ),
        );
        let service = OrganizationService::new(graph);

        let detail = service.detail("/organizations/acme").await.unwrap().unwrap();
        assert_eq!(detail.organization.kind.as_deref(), Some("Lender"));
        assert_eq!(detail.members[0].role.as_deref(), Some("Principal"));
        assert_eq!(detail.members[0].title, "MD");
        assert_eq!(detail.deals[0].kind.as_deref(), Some("financing"));
        assert_eq!(detail.deals[0].date, "2020-07-04");
        assert_eq!(detail.deals[0].role.as_deref(), Some("Lender"));
    }

    #[tokio::test]
    async fn test_recent_maps_nodes() {
        let graph = Arc::new(MockGraph::new().with_rows(
            organizations::RECENT,
            vec![json!({"id": 4, "props": {"name": "Beta"}}), json!({"id": 5, "props": {}})],
        ));
        let service = OrganizationService::new(graph.clone());

        let orgs = service.recent(20).await.unwrap();
        assert_eq!(orgs.len(), 2);
        assert!(orgs[1].name.is_none());
        assert_eq!(graph.calls()[0].get_param("limit"), Some(&json!(20)));
    }
}
