use std::sync::Arc;

use super::{paginate, Page, PageRequest};
use crate::db::GraphClient;
use crate::entities::Story;
use crate::error::Result;
use crate::queries::{stories, Label};

#[derive(Clone)]
pub struct StoryService {
    graph: Arc<dyn GraphClient>,
}

impl StoryService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    pub async fn list(&self, request: PageRequest) -> Result<Page<Story>> {
        let query = stories::page(request.skip(), request.limit);
        paginate(self.graph.as_ref(), Label::Story, request, query, Story::from_node).await
    }
}
