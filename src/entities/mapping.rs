//! Schema-to-record mapping.
//!
//! Queries project nodes as `id(n) AS id, properties(n) AS props`; the
//! mappers below declare, per entity, which store property feeds which field
//! and what the default is when the property is missing.

use serde_json::{Map, Value};

use super::{
    parse_deal_url, Deal, DealDetail, Organization, OrganizationDetail, Participant, Person,
    PersonDetail, Property, PropertyDetail, Story,
};
use crate::db::{scalar_to_string, Record};
use crate::error::{BrokerGraphError, Result};

/// A node as returned by a projection query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    pub id: i64,
    pub props: Map<String, Value>,
}

impl RawNode {
    /// Read the `id` / `props` columns of a record
    pub fn from_record(record: &Record) -> Result<Self> {
        let id = record
            .i64("id")
            .ok_or_else(|| BrokerGraphError::Graph("row is missing node id".to_string()))?;
        let props = record.map("props").cloned().unwrap_or_default();
        Ok(Self { id, props })
    }

    pub fn props(&self) -> NodeProps<'_> {
        NodeProps(&self.props)
    }
}

/// Typed view over a node's property map
#[derive(Debug, Clone, Copy)]
pub struct NodeProps<'a>(&'a Map<String, Value>);

impl<'a> NodeProps<'a> {
    pub fn new(props: &'a Map<String, Value>) -> Self {
        Self(props)
    }

    /// Property as text, `None` when missing or null
    pub fn opt_text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(scalar_to_string)
    }

    /// First present property among `keys`
    pub fn opt_text_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.opt_text(k))
    }

    /// Property as text, empty string when missing
    pub fn text(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    /// Property as text, `None` when missing or empty
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.opt_text(key).filter(|s| !s.is_empty())
    }
}

/// First non-null role collected across duplicate edges
pub fn first_role(roles: Vec<Option<String>>) -> Option<String> {
    roles.into_iter().flatten().next()
}

impl Person {
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        Self {
            id: node.id,
            name: p.text("name"),
            title: p.text("title"),
            role: p.opt_text("role"),
            url: p.opt_text("url"),
        }
    }

    /// Node plus the relationship role carried in the `role` column
    pub fn from_record(record: &Record) -> Result<Self> {
        let mut person = Self::from_node(&RawNode::from_record(record)?);
        if let Some(role) = record.text("role") {
            person.role = Some(role);
        }
        Ok(person)
    }
}

impl PersonDetail {
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        Self {
            person: Person::from_node(node),
            email: p.opt_text("email"),
            phone: p.opt_text("phone"),
            bio: p.opt_text("bio"),
            image: p.opt_text("image"),
            ..Self::default()
        }
    }
}

impl Deal {
    /// Map a deal node; `property`, `date` and `type` are taken from the url
    /// only when the node's own value is null or empty.
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        let url = p.text("url");
        let parsed = parse_deal_url(&url);

        let property = p.non_empty("property").unwrap_or(parsed.property);
        let date = p.non_empty("date").unwrap_or(parsed.date);
        let kind = p
            .non_empty("type")
            .or_else(|| Some(parsed.kind).filter(|k| !k.is_empty()));

        Self {
            id: node.id,
            property,
            url,
            date,
            title: p.opt_text("title"),
            kind,
            role: None,
            price: p.opt_text("price"),
            price_per_square_foot: p.opt_text("price per square foot"),
            floors: p.opt_text("floors"),
            term_years: p.opt_text("term years"),
            square_feet: p.opt_text("square feet"),
            acquirer_stake: p.opt_text("acquirer stake"),
            amount: p.opt_text("amount"),
            financing_types: p.opt_text("financing types"),
            interest_rate: p.opt_text("interest rate"),
            structure: p.opt_text("structure"),
            fixed_vs_floating: p.opt_text("fixed vs floating"),
            property_address: None,
        }
    }

    /// Node plus the optional `role` and `property_address` columns
    pub fn from_record(record: &Record) -> Result<Self> {
        let mut deal = Self::from_node(&RawNode::from_record(record)?);
        deal.role = record.text("role");
        deal.property_address = record.text("property_address");
        Ok(deal)
    }
}

impl DealDetail {
    pub fn from_node(node: &RawNode) -> Self {
        Self {
            deal: Deal::from_node(node),
            ..Self::default()
        }
    }
}

impl Organization {
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        Self {
            id: node.id,
            name: p.opt_text("name"),
            kind: p.opt_text("type"),
            url: p.opt_text("url"),
            role: p.opt_text("role"),
        }
    }

    /// Node plus the relationship role carried in the `role` column
    pub fn from_record(record: &Record) -> Result<Self> {
        let mut org = Self::from_node(&RawNode::from_record(record)?);
        if let Some(role) = record.text("role") {
            org.role = Some(role);
        }
        Ok(org)
    }
}

impl OrganizationDetail {
    pub fn from_node(node: &RawNode) -> Self {
        Self {
            organization: Organization::from_node(node),
            ..Self::default()
        }
    }
}

impl Property {
    /// Property nodes are stored with both lower-case and capitalized keys
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        Self {
            id: node.id,
            address: p.text("address"),
            url: p.text("url"),
            name: p.opt_text("name"),
            kind: p.opt_text_any(&["type", "Type"]),
            square_feet: p.opt_text_any(&["square feet", "Square Feet"]),
            year_built: p.opt_text_any(&["year built", "Year Built"]),
            credifi_score: p.opt_text_any(&["credifi score", "CrediFi Score"]),
        }
    }
}

impl PropertyDetail {
    pub fn from_node(node: &RawNode) -> Self {
        Self {
            property: Property::from_node(node),
            ..Self::default()
        }
    }
}

impl Story {
    pub fn from_node(node: &RawNode) -> Self {
        let p = node.props();
        Self {
            id: node.id,
            title: p.text("title"),
            source: p.text("source"),
            url: p.text("url"),
        }
    }
}

impl Participant {
    fn from_parts(record: &Record, kind: String) -> Result<Self> {
        let node = RawNode::from_record(record)?;
        let p = node.props();
        Ok(Self {
            id: node.id,
            name: p.opt_text("name"),
            kind,
            role: first_role(record.optional_strings("roles")),
            url: p.opt_text("url"),
        })
    }

    /// Deal participants are either people or organizations
    pub fn from_deal_record(record: &Record) -> Result<Self> {
        let kind = if record.strings("labels").iter().any(|l| l == "Person") {
            "Person"
        } else {
            "Organization"
        };
        Self::from_parts(record, kind.to_string())
    }

    /// Property participants take their first label verbatim
    pub fn from_property_record(record: &Record) -> Result<Self> {
        let kind = record
            .strings("labels")
            .into_iter()
            .next()
            .unwrap_or_else(|| "Unknown".to_string());
        Self::from_parts(record, kind)
    }
}
