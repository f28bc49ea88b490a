use crate::db::GraphQuery;

pub const PAGE: &str = "person.page";
pub const RECENT: &str = "person.recent";
pub const BY_URL: &str = "person.by_url";
pub const BY_NAME: &str = "person.by_name";
pub const DEALS: &str = "person.deals";
pub const ORGANIZATIONS: &str = "person.organizations";
pub const STORIES: &str = "person.stories";

pub fn page(skip: u64, limit: u32) -> GraphQuery {
    GraphQuery::new(
        PAGE,
        "MATCH (p:Person) \
         RETURN id(p) AS id, properties(p) AS props \
         ORDER BY id(p) \
         SKIP $skip LIMIT $limit",
    )
    .param("skip", skip)
    .param("limit", limit)
}

/// People ordered by the date of their most recent deal
pub fn recent(limit: u32) -> GraphQuery {
    GraphQuery::new(
        RECENT,
        "MATCH (p:Person)-[:PARTICIPATED_IN]->(d:Deal) \
         WITH p, max(CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END) AS latest_date \
         RETURN id(p) AS id, properties(p) AS props \
         ORDER BY latest_date DESC \
         LIMIT $limit",
    )
    .param("limit", limit)
}

pub fn by_url(url: &str) -> GraphQuery {
    GraphQuery::new(
        BY_URL,
        "MATCH (p:Person) WHERE p.url = $url \
         RETURN id(p) AS id, properties(p) AS props \
         LIMIT 1",
    )
    .param("url", url)
}

pub fn by_name(name: &str) -> GraphQuery {
    GraphQuery::new(
        BY_NAME,
        "MATCH (p:Person) WHERE p.name = $name \
         RETURN id(p) AS id, properties(p) AS props \
         LIMIT 1",
    )
    .param("name", name)
}

/// Deals the person participated in, with the involved property's address
pub fn deals(url: &str) -> GraphQuery {
    GraphQuery::new(
        DEALS,
        "MATCH (p:Person)-[r:PARTICIPATED_IN]->(d:Deal) WHERE p.url = $url \
         OPTIONAL MATCH (d)-[:INVOLVES]->(pr:Property) \
         RETURN id(d) AS id, properties(d) AS props, r.role AS role, pr.address AS property_address",
    )
    .param("url", url)
}

pub fn organizations(url: &str) -> GraphQuery {
    GraphQuery::new(
        ORGANIZATIONS,
        "MATCH (p:Person)-[r:WORKS_FOR]->(o:Organization) WHERE p.url = $url \
         RETURN id(o) AS id, properties(o) AS props, r.role AS role",
    )
    .param("url", url)
}

pub fn stories(url: &str) -> GraphQuery {
    GraphQuery::new(
        STORIES,
        "MATCH (p:Person)-[:MENTIONED_IN]->(s:Story) WHERE p.url = $url \
         RETURN id(s) AS id, properties(s) AS props",
    )
    .param("url", url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_binds_skip_and_limit() {
        let query = page(24, 12);
        assert_eq!(query.get_param("skip"), Some(&json!(24)));
        assert_eq!(query.get_param("limit"), Some(&json!(12)));
        assert!(query.cypher.contains("SKIP $skip LIMIT $limit"));
    }

    #[test]
    fn test_detail_queries_bind_url() {
        for query in [by_url("/people/a"), deals("/people/a"), organizations("/people/a"), stories("/people/a")] {
            assert_eq!(query.get_param("url"), Some(&json!("/people/a")));
            assert!(!query.cypher.contains("/people/a"));
        }
    }
}
