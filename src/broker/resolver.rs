use std::sync::Arc;

use super::{BrokerDeal, BrokerLookup, BrokerProfile};
use crate::db::GraphClient;
use crate::entities::{Deal, Organization, Person, RawNode};
use crate::error::Result;
use crate::queries::{brokers, people};
use crate::service::{fetch, fetch_one, map_nodes, map_records};

/// Resolves broker names to graph profiles.
///
/// Resolution is a strict sequence: profile by exact name, then deals,
/// organizations and locations by the profile's url. A missing profile ends
/// the lookup after one query.
#[derive(Clone)]
pub struct BrokerResolver {
    graph: Arc<dyn GraphClient>,
}

impl BrokerResolver {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    pub async fn resolve(&self, name: &str) -> Result<BrokerLookup> {
        let graph = self.graph.as_ref();

        let Some(row) = fetch_one(graph, people::by_name(name)).await? else {
            log::info!("broker {:?} not found", name);
            return Ok(BrokerLookup::NotFound {
                name: name.to_string(),
            });
        };
        let node = RawNode::from_record(&row)?;
        let mut profile = BrokerProfile {
            name: name.to_string(),
            person: Person::from_node(&node),
            attributes: node.props.clone(),
            deals: Vec::new(),
            organizations: Vec::new(),
            locations: Vec::new(),
        };

        let Some(url) = profile.person.url.clone() else {
            log::warn!("broker {:?} has no url, skipping related lookups", name);
            return Ok(BrokerLookup::Found(profile));
        };

        let rows = fetch(graph, brokers::deals(&url)).await?;
        profile.deals = map_records(&rows, |r| {
            Ok(BrokerDeal {
                deal: Deal::from_record(r)?,
                property_url: r.text("property_url"),
                organization_name: r.text("organization_name"),
                organization_url: r.text("organization_url"),
                organization_type: r.text("organization_type"),
            })
        })?;

        let rows = fetch(graph, brokers::organizations(&url)).await?;
        profile.organizations = map_nodes(&rows, Organization::from_node)?;

        let rows = fetch(graph, brokers::locations(&url)).await?;
        profile.locations = rows.iter().filter_map(|r| r.text("location")).collect();

        log::info!(
            "broker {:?} resolved: {} deals, {} organizations, {} locations",
            name,
            profile.deals.len(),
            profile.organizations.len(),
            profile.locations.len()
        );
        Ok(BrokerLookup::Found(profile))
    }

    /// Resolve each name in order; the first failure aborts
    pub async fn resolve_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<BrokerLookup>> {
        let mut lookups = Vec::with_capacity(names.len());
        for name in names {
            lookups.push(self.resolve(name.as_ref()).await?);
        }
        Ok(lookups)
    }
}
