//! Parameterized Cypher templates, one composer per entity and access pattern.
//!
//! Composers are pure: they bind their arguments (urls, `skip`, `limit`) as
//! parameters and never splice values into the statement text.
//!
//! Node projections always return `id(n) AS id, properties(n) AS props` so
//! the mapping layer can read every row the same way.

pub mod brokers;
pub mod deals;
pub mod organizations;
pub mod people;
pub mod properties;
pub mod stories;

use crate::db::GraphQuery;

/// Node labels exposed by the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Person,
    Deal,
    Organization,
    Property,
    Story,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Person => "Person",
            Label::Deal => "Deal",
            Label::Organization => "Organization",
            Label::Property => "Property",
            Label::Story => "Story",
        }
    }
}

/// Total number of nodes carrying `label`.
///
/// Labels cannot be bound as parameters, so each one has its own template.
pub fn count(label: Label) -> GraphQuery {
    let (name, cypher) = match label {
        Label::Person => ("person.count", "MATCH (n:Person) RETURN count(n) AS total"),
        Label::Deal => ("deal.count", "MATCH (n:Deal) RETURN count(n) AS total"),
        Label::Organization => (
            "organization.count",
            "MATCH (n:Organization) RETURN count(n) AS total",
        ),
        Label::Property => ("property.count", "MATCH (n:Property) RETURN count(n) AS total"),
        Label::Story => ("story.count", "MATCH (n:Story) RETURN count(n) AS total"),
    };
    GraphQuery::new(name, cypher)
}

/// Connectivity probe
pub fn ping() -> GraphQuery {
    GraphQuery::new("ping", "RETURN 1 AS ok")
}

/// Node counts for every label in the graph
pub fn label_counts() -> GraphQuery {
    GraphQuery::new(
        "graph.label_counts",
        "MATCH (n) UNWIND labels(n) AS label \
         RETURN label, count(*) AS total \
         ORDER BY label",
    )
}

/// Relationship counts per type
pub fn relationship_counts() -> GraphQuery {
    GraphQuery::new(
        "graph.relationship_counts",
        "MATCH ()-[r]->() \
         RETURN type(r) AS relationship, count(*) AS total \
         ORDER BY relationship",
    )
}
