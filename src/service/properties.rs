use std::sync::Arc;

use super::{fetch, fetch_one, map_nodes, map_records, paginate, Page, PageRequest};
use crate::db::GraphClient;
use crate::entities::{Deal, Participant, Property, PropertyDetail, RawNode, Story};
use crate::error::Result;
use crate::queries::{properties, Label};

#[derive(Clone)]
pub struct PropertyService {
    graph: Arc<dyn GraphClient>,
}

impl PropertyService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    /// Properties, most recently traded first
    pub async fn list(&self, request: PageRequest) -> Result<Page<Property>> {
        let query = properties::page(request.skip(), request.limit);
        paginate(self.graph.as_ref(), Label::Property, request, query, Property::from_node).await
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<Property>> {
        let rows = fetch(self.graph.as_ref(), properties::recent(limit)).await?;
        map_nodes(&rows, Property::from_node)
    }

    pub async fn detail(&self, url: &str) -> Result<Option<PropertyDetail>> {
        let graph = self.graph.as_ref();
        let Some(row) = fetch_one(graph, properties::by_url(url)).await? else {
            return Ok(None);
        };
        let mut detail = PropertyDetail::from_node(&RawNode::from_record(&row)?);

        let rows = fetch(graph, properties::deals(url)).await?;
        detail.deals = map_nodes(&rows, Deal::from_node)?;

        let rows = fetch(graph, properties::stories(url)).await?;
        detail.stories = map_nodes(&rows, Story::from_node)?;

        let rows = fetch(graph, properties::participants(url)).await?;
        detail.participants = map_records(&rows, Participant::from_property_record)?;

        Ok(Some(detail))
    }
}
