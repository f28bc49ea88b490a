//! Lookups behind the broker resolution sequence. The profile step reuses
//! [`super::people::by_name`].

use crate::db::GraphQuery;

pub const DEALS: &str = "broker.deals";
pub const ORGANIZATIONS: &str = "broker.organizations";
pub const LOCATIONS: &str = "broker.locations";

/// Deal history with property and employer context, newest first
pub fn deals(broker_url: &str) -> GraphQuery {
    GraphQuery::new(
        DEALS,
        "MATCH (p:Person)-[pi:PARTICIPATED_IN]->(d:Deal) WHERE p.url = $url \
         OPTIONAL MATCH (d)-[:INVOLVES]->(prop:Property) \
         OPTIONAL MATCH (p)-[:WORKS_FOR]->(org:Organization) \
         WITH d, pi, prop, org, CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END AS sort_date \
         RETURN id(d) AS id, properties(d) AS props, pi.role AS role, \
                prop.address AS property_address, prop.url AS property_url, \
                org.name AS organization_name, org.url AS organization_url, \
                org.type AS organization_type \
         ORDER BY sort_date DESC",
    )
    .param("url", broker_url)
}

pub fn organizations(broker_url: &str) -> GraphQuery {
    GraphQuery::new(
        ORGANIZATIONS,
        "MATCH (p:Person)-[:WORKS_FOR]->(org:Organization) WHERE p.url = $url \
         RETURN id(org) AS id, properties(org) AS props",
    )
    .param("url", broker_url)
}

/// Distinct addresses of properties involved in the broker's deals
pub fn locations(broker_url: &str) -> GraphQuery {
    GraphQuery::new(
        LOCATIONS,
        "MATCH (p:Person)-[:PARTICIPATED_IN]->(:Deal)-[:INVOLVES]->(prop:Property) \
         WHERE p.url = $url AND prop.address IS NOT NULL \
         RETURN DISTINCT prop.address AS location",
    )
    .param("url", broker_url)
}
