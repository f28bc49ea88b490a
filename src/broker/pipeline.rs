use std::sync::Arc;

use super::{normalize_broker_names, BrokerExtractor, BrokerLookup, BrokerResolver};
use crate::error::Result;

/// Text in, broker profiles out
#[derive(Clone)]
pub struct BrokerPipeline {
    extractor: Arc<dyn BrokerExtractor>,
    resolver: BrokerResolver,
}

impl BrokerPipeline {
    pub fn new(extractor: Arc<dyn BrokerExtractor>, resolver: BrokerResolver) -> Self {
        Self {
            extractor,
            resolver,
        }
    }

    /// Extracted and normalized broker names
    pub async fn extract_names(&self, text: &str) -> Result<Vec<String>> {
        let extracted = self.extractor.extract(text).await?;
        let raw: Vec<&str> = extracted.iter().map(|b| b.name.as_str()).collect();
        Ok(normalize_broker_names(&raw))
    }

    pub async fn resolve_text(&self, text: &str) -> Result<Vec<BrokerLookup>> {
        let names = self.extract_names(text).await?;
        log::debug!("resolving {} extracted broker names", names.len());
        self.resolver.resolve_many(&names).await
    }
}
