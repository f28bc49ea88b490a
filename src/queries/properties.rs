use crate::db::GraphQuery;

pub const PAGE: &str = "property.page";
pub const RECENT: &str = "property.recent";
pub const BY_URL: &str = "property.by_url";
pub const DEALS: &str = "property.deals";
pub const STORIES: &str = "property.stories";
pub const PARTICIPANTS: &str = "property.participants";

/// Properties ordered by their latest involving deal; properties without
/// deals are included and sort last so the page agrees with the total count
pub fn page(skip: u64, limit: u32) -> GraphQuery {
    GraphQuery::new(
        PAGE,
        "MATCH (pr:Property) \
         OPTIONAL MATCH (pr)<-[:INVOLVES]-(d:Deal) \
         WITH pr, coalesce(max(CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END), '0000-00-00') AS latest_date \
         RETURN id(pr) AS id, properties(pr) AS props \
         ORDER BY latest_date DESC, id(pr) \
         SKIP $skip LIMIT $limit",
    )
    .param("skip", skip)
    .param("limit", limit)
}

pub fn recent(limit: u32) -> GraphQuery {
    GraphQuery::new(
        RECENT,
        "MATCH (pr:Property)<-[:INVOLVES]-(d:Deal) \
         WITH pr, max(CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END) AS latest_date \
         RETURN id(pr) AS id, properties(pr) AS props \
         ORDER BY latest_date DESC \
         LIMIT $limit",
    )
    .param("limit", limit)
}

pub fn by_url(url: &str) -> GraphQuery {
    GraphQuery::new(
        BY_URL,
        "MATCH (pr:Property) WHERE pr.url = $url \
         RETURN id(pr) AS id, properties(pr) AS props \
         LIMIT 1",
    )
    .param("url", url)
}

pub fn deals(url: &str) -> GraphQuery {
    GraphQuery::new(
        DEALS,
        "MATCH (d:Deal)-[:INVOLVES]->(pr:Property) WHERE pr.url = $url \
         RETURN id(d) AS id, properties(d) AS props",
    )
    .param("url", url)
}

pub fn stories(url: &str) -> GraphQuery {
    GraphQuery::new(
        STORIES,
        "MATCH (s:Story)-[:MENTIONED_IN]->(pr:Property) WHERE pr.url = $url \
         RETURN id(s) AS id, properties(s) AS props",
    )
    .param("url", url)
}

/// Everyone who participated in a deal involving the property
pub fn participants(url: &str) -> GraphQuery {
    GraphQuery::new(
        PARTICIPANTS,
        "MATCH (participant)-[r:PARTICIPATED_IN]->(:Deal)-[:INVOLVES]->(pr:Property) \
         WHERE pr.url = $url \
         WITH participant, labels(participant) AS labels, collect(DISTINCT r.role) AS roles \
         RETURN id(participant) AS id, properties(participant) AS props, labels, roles",
    )
    .param("url", url)
}
