use crate::db::GraphQuery;

pub const PAGE: &str = "deal.page";
pub const RECENT: &str = "deal.recent";
pub const BY_URL: &str = "deal.by_url";
pub const PARTICIPANTS: &str = "deal.participants";
pub const PROPERTIES: &str = "deal.properties";
pub const STORIES: &str = "deal.stories";
pub const SAMPLE_KEYS: &str = "deal.sample_keys";

// Deal dates are stored as MM/DD/YYYY; the sort key slices them into
// YYYY-MM-DD so string order is date order. Missing dates sort last.

/// Deals, newest first
pub fn page(skip: u64, limit: u32) -> GraphQuery {
    GraphQuery::new(
        PAGE,
        "MATCH (d:Deal) \
         WITH d, CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END AS sort_date \
         RETURN id(d) AS id, properties(d) AS props \
         ORDER BY sort_date DESC, id(d) \
         SKIP $skip LIMIT $limit",
    )
    .param("skip", skip)
    .param("limit", limit)
}

pub fn recent(limit: u32) -> GraphQuery {
    GraphQuery::new(
        RECENT,
        "MATCH (d:Deal) \
         WITH d, CASE \
             WHEN d.date IS NOT NULL AND d.date <> '' \
             THEN substring(d.date, 6, 4) + '-' + substring(d.date, 0, 2) + '-' + substring(d.date, 3, 2) \
             ELSE '0000-00-00' \
         END AS sort_date \
         RETURN id(d) AS id, properties(d) AS props \
         ORDER BY sort_date DESC, id(d) \
         LIMIT $limit",
    )
    .param("limit", limit)
}

pub fn by_url(url: &str) -> GraphQuery {
    GraphQuery::new(
        BY_URL,
        "MATCH (d:Deal) WHERE d.url = $url \
         RETURN id(d) AS id, properties(d) AS props \
         LIMIT 1",
    )
    .param("url", url)
}

/// People and organizations on the deal, one row per node with every role
/// seen across its PARTICIPATED_IN edges
pub fn participants(url: &str) -> GraphQuery {
    GraphQuery::new(
        PARTICIPANTS,
        "MATCH (participant)-[r:PARTICIPATED_IN]->(d:Deal) \
         WHERE d.url = $url AND (participant:Person OR participant:Organization) \
         WITH participant, labels(participant) AS labels, collect(r.role) AS roles \
         RETURN id(participant) AS id, properties(participant) AS props, labels, roles",
    )
    .param("url", url)
}

pub fn properties(url: &str) -> GraphQuery {
    GraphQuery::new(
        PROPERTIES,
        "MATCH (d:Deal)-[:INVOLVES]->(pr:Property) WHERE d.url = $url \
         RETURN id(pr) AS id, properties(pr) AS props",
    )
    .param("url", url)
}

pub fn stories(url: &str) -> GraphQuery {
    GraphQuery::new(
        STORIES,
        "MATCH (s:Story)-[:MENTIONED_IN]->(d:Deal) WHERE d.url = $url \
         RETURN id(s) AS id, properties(s) AS props",
    )
    .param("url", url)
}

/// Property keys and values of a few deals, for inspecting the store schema
pub fn sample_keys(limit: u32) -> GraphQuery {
    GraphQuery::new(
        SAMPLE_KEYS,
        "MATCH (d:Deal) \
         RETURN keys(d) AS keys, properties(d) AS props \
         LIMIT $limit",
    )
    .param("limit", limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_sorts_by_reformatted_date() {
        let query = page(0, 12);
        assert!(query.cypher.contains("'0000-00-00'"));
        assert!(query.cypher.contains("ORDER BY sort_date DESC"));
        assert_eq!(query.get_param("skip"), Some(&json!(0)));
    }

    #[test]
    fn test_participants_restricted_to_people_and_organizations() {
        let query = participants("/activity/x");
        assert!(query.cypher.contains("participant:Person OR participant:Organization"));
        assert!(query.cypher.contains("collect(r.role) AS roles"));
    }
}
