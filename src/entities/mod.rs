//! Normalized read-only records for the real-estate graph.
//!
//! Every record carries the graph's internal node id as `id` and, separately,
//! the externally stable `url` used for lookups.

mod deal_url;
mod mapping;

pub use deal_url::{parse_deal_url, DealUrlMeta};
pub use mapping::{first_role, NodeProps, RawNode};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub role: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: Person,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub deals: Vec<Deal>,
    pub organizations: Vec<Organization>,
    pub stories: Vec<Story>,
}

/// A deal; `property`, `date` and `type` fall back to url-derived values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deal {
    pub id: i64,
    pub property: String,
    pub url: String,
    pub date: String,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub role: Option<String>,
    pub price: Option<String>,
    pub price_per_square_foot: Option<String>,
    pub floors: Option<String>,
    pub term_years: Option<String>,
    pub square_feet: Option<String>,
    pub acquirer_stake: Option<String>,
    pub amount: Option<String>,
    pub financing_types: Option<String>,
    pub interest_rate: Option<String>,
    pub structure: Option<String>,
    pub fixed_vs_floating: Option<String>,
    pub property_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DealDetail {
    #[serde(flatten)]
    pub deal: Deal,
    pub participants: Vec<Participant>,
    pub properties: Vec<Property>,
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Organization {
    pub id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub members: Vec<Person>,
    pub deals: Vec<Deal>,
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Property {
    pub id: i64,
    pub address: String,
    pub url: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub square_feet: Option<String>,
    pub year_built: Option<String>,
    pub credifi_score: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub deals: Vec<Deal>,
    pub stories: Vec<Story>,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub source: String,
    pub url: String,
}

/// A person or organization taking part in a deal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Participant {
    pub id: i64,
    pub name: Option<String>,
    /// Node label: `Person`, `Organization`, or whatever label the node carries
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Option<String>,
    pub url: Option<String>,
}
