use crate::db::GraphQuery;

pub const PAGE: &str = "organization.page";
pub const RECENT: &str = "organization.recent";
pub const BY_URL: &str = "organization.by_url";
pub const MEMBERS: &str = "organization.members";
pub const DEALS: &str = "organization.deals";
pub const STORIES: &str = "organization.stories";

pub fn page(skip: u64, limit: u32) -> GraphQuery {
    GraphQuery::new(
        PAGE,
        "MATCH (o:Organization) \
         RETURN id(o) AS id, properties(o) AS props \
         ORDER BY id(o) \
         SKIP $skip LIMIT $limit",
    )
    .param("skip", skip)
    .param("limit", limit)
}

/// Organizations that have taken part in at least one deal
pub fn recent(limit: u32) -> GraphQuery {
    GraphQuery::new(
        RECENT,
        "MATCH (o:Organization)-[:PARTICIPATED_IN]->(:Deal) \
         WITH DISTINCT o \
         RETURN id(o) AS id, properties(o) AS props \
         LIMIT $limit",
    )
    .param("limit", limit)
}

pub fn by_url(url: &str) -> GraphQuery {
    GraphQuery::new(
        BY_URL,
        "MATCH (o:Organization) WHERE o.url = $url \
         RETURN id(o) AS id, properties(o) AS props \
         LIMIT 1",
    )
    .param("url", url)
}

pub fn members(url: &str) -> GraphQuery {
    GraphQuery::new(
        MEMBERS,
        "MATCH (p:Person)-[r:WORKS_FOR]->(o:Organization) WHERE o.url = $url \
         RETURN id(p) AS id, properties(p) AS props, r.role AS role",
    )
    .param("url", url)
}

pub fn deals(url: &str) -> GraphQuery {
    GraphQuery::new(
        DEALS,
        "MATCH (o:Organization)-[r:PARTICIPATED_IN]->(d:Deal) WHERE o.url = $url \
         RETURN id(d) AS id, properties(d) AS props, r.role AS role",
    )
    .param("url", url)
}

/// Stories mentioning any member of the organization, newest first
pub fn stories(url: &str) -> GraphQuery {
    GraphQuery::new(
        STORIES,
        "MATCH (o:Organization)<-[:WORKS_FOR]-(:Person)-[:MENTIONED_IN]->(s:Story) \
         WHERE o.url = $url \
         WITH DISTINCT s \
         RETURN id(s) AS id, properties(s) AS props \
         ORDER BY s.date DESC",
    )
    .param("url", url)
}
