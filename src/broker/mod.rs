//! Broker intelligence: extract broker names from text, normalize them and
//! resolve each one against the graph into a profile with deals,
//! organizations and locations.

mod extraction;
mod normalize;
mod pipeline;
mod report;
mod resolver;

pub use extraction::{parse_extraction, BrokerExtractor, ExtractedBroker, LlmBrokerExtractor};
pub use normalize::normalize_broker_names;
pub use pipeline::BrokerPipeline;
pub use report::render_report;
pub use resolver::BrokerResolver;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::entities::{Deal, Organization, Person};

/// A deal in a broker's history with its property and employer context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerDeal {
    #[serde(flatten)]
    pub deal: Deal,
    pub property_url: Option<String>,
    pub organization_name: Option<String>,
    pub organization_url: Option<String>,
    pub organization_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerProfile {
    /// Name the lookup was made with
    pub name: String,
    pub person: Person,
    /// Every property stored on the person node
    pub attributes: Map<String, Value>,
    pub deals: Vec<BrokerDeal>,
    pub organizations: Vec<Organization>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BrokerLookup {
    Found(BrokerProfile),
    NotFound { name: String },
}

impl BrokerLookup {
    pub fn name(&self) -> &str {
        match self {
            BrokerLookup::Found(profile) => &profile.name,
            BrokerLookup::NotFound { name } => name,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, BrokerLookup::Found(_))
    }
}
