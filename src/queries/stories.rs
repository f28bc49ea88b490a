use crate::db::GraphQuery;

pub const PAGE: &str = "story.page";

pub fn page(skip: u64, limit: u32) -> GraphQuery {
    GraphQuery::new(
        PAGE,
        "MATCH (s:Story) \
         RETURN id(s) AS id, properties(s) AS props \
         ORDER BY id(s) \
         SKIP $skip LIMIT $limit",
    )
    .param("skip", skip)
    .param("limit", limit)
}
