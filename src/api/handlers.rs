use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::broker::{normalize_broker_names, render_report, BrokerLookup};
use crate::entities::{Deal, Organization, Person, Property, Story};
use crate::service::{DealSample, Page, PageRequest};

/// Path segment that selects the recent listing instead of a detail lookup
const RECENT: &str = "recent";

/// Rows sampled by the deal-properties debug endpoint
const DEBUG_SAMPLE_SIZE: u32 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub text: Option<String>,
    pub names: Option<Vec<String>>,
}

#[derive(Serialize)]
struct Data<T> {
    data: T,
}

#[derive(Serialize)]
struct Samples {
    samples: Vec<DealSample>,
}

#[derive(Debug, Serialize)]
pub struct BrokerReport {
    pub name: String,
    pub found: bool,
    pub report: String,
    pub lookup: BrokerLookup,
}

type ListResult<T> = Result<Json<Page<T>>, ApiError>;

pub(crate) fn person_lookup_url(path: &str) -> String {
    format!("/people/{}", path)
}

pub(crate) fn organization_lookup_url(path: &str) -> String {
    format!("/organizations/{}", path)
}

pub(crate) fn deal_lookup_url(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

pub(crate) fn property_lookup_url(path: &str) -> String {
    if path.starts_with("/buildings/") {
        path.to_string()
    } else if path.starts_with("buildings/") {
        format!("/{}", path)
    } else {
        format!("/buildings/{}", path)
    }
}

fn page_request(
    state: &AppState,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<PageRequest, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let pagination = &state.pagination;
    Ok(PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(pagination.default_limit),
        pagination.max_limit,
    )?)
}

fn recent_limit(
    state: &AppState,
    params: Result<Query<RecentParams>, QueryRejection>,
) -> Result<u32, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::unprocessable(e.body_text()))?;
    let pagination = &state.pagination;
    let limit = params.limit.unwrap_or(pagination.recent_limit);
    if limit < 1 || limit > pagination.max_limit {
        return Err(ApiError::unprocessable(format!(
            "limit must be between 1 and {}",
            pagination.max_limit
        )));
    }
    Ok(limit)
}

fn data<T: Serialize>(data: T) -> Response {
    Json(Data { data }).into_response()
}

pub async fn root(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "message": state.title,
        "version": env!("CARGO_PKG_VERSION")
    }))
    .into_response()
}

pub async fn health() -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
    .into_response()
}

pub async fn list_people(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ListResult<Person> {
    let request = page_request(&state, params)?;
    Ok(Json(state.services.people.list(request).await?))
}

/// `/api/people/recent` or `/api/people/{url}`
pub async fn person_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<RecentParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    if path == RECENT {
        let limit = recent_limit(&state, params)?;
        return Ok(data(state.services.people.recent(limit).await?));
    }
    let detail = state
        .services
        .people
        .detail(&person_lookup_url(&path))
        .await?
        .ok_or_else(|| ApiError::not_found("Person"))?;
    Ok(data(detail))
}

pub async fn list_deals(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ListResult<Deal> {
    let request = page_request(&state, params)?;
    Ok(Json(state.services.deals.list(request).await?))
}

/// `/api/deals/recent` or `/api/deals/{url}`
pub async fn deal_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<RecentParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    if path == RECENT {
        let limit = recent_limit(&state, params)?;
        return Ok(data(state.services.deals.recent(limit).await?));
    }
    let detail = state
        .services
        .deals
        .detail(&deal_lookup_url(&path))
        .await?
        .ok_or_else(|| ApiError::not_found("Deal"))?;
    Ok(data(detail))
}

pub async fn list_organizations(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ListResult<Organization> {
    let request = page_request(&state, params)?;
    Ok(Json(state.services.organizations.list(request).await?))
}

/// `/api/organizations/recent` or `/api/organizations/{url}`
pub async fn organization_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<RecentParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    if path == RECENT {
        let limit = recent_limit(&state, params)?;
        return Ok(data(state.services.organizations.recent(limit).await?));
    }
    let detail = state
        .services
        .organizations
        .detail(&organization_lookup_url(&path))
        .await?
        .ok_or_else(|| ApiError::not_found("Organization"))?;
    Ok(data(detail))
}

pub async fn list_properties(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ListResult<Property> {
    let request = page_request(&state, params)?;
    Ok(Json(state.services.properties.list(request).await?))
}

/// `/api/properties/recent` or `/api/properties/{url}`
pub async fn property_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<RecentParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    if path == RECENT {
        let limit = recent_limit(&state, params)?;
        return Ok(data(state.services.properties.recent(limit).await?));
    }
    let detail = state
        .services
        .properties
        .detail(&property_lookup_url(&path))
        .await?
        .ok_or_else(|| ApiError::not_found("Property"))?;
    Ok(data(detail))
}

pub async fn list_stories(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ListResult<Story> {
    let request = page_request(&state, params)?;
    Ok(Json(state.services.stories.list(request).await?))
}

pub async fn deal_properties(State(state): State<AppState>) -> Result<Response, ApiError> {
    let samples = state.services.deals.sample_properties(DEBUG_SAMPLE_SIZE).await?;
    Ok(Json(Samples { samples }).into_response())
}

/// Resolve brokers from explicit names, or from free text through the
/// configured extractor
pub async fn lookup_brokers(
    State(state): State<AppState>,
    body: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::unprocessable(e.body_text()))?;

    let lookups = match (request.names, request.text) {
        (Some(names), _) if !names.is_empty() => {
            let names = normalize_broker_names(&names);
            state.resolver.resolve_many(&names).await?
        }
        (_, Some(text)) if !text.trim().is_empty() => {
            let pipeline = state.pipeline.as_ref().ok_or_else(|| {
                ApiError::unavailable("broker extraction requires an [llm] configuration")
            })?;
            pipeline.resolve_text(&text).await?
        }
        _ => return Err(ApiError::unprocessable("either text or names is required")),
    };

    let reports: Vec<BrokerReport> = lookups
        .into_iter()
        .map(|lookup| BrokerReport {
            name: lookup.name().to_string(),
            found: lookup.is_found(),
            report: render_report(&lookup),
            lookup,
        })
        .collect();
    Ok(data(reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_prefixes() {
        assert_eq!(person_lookup_url("jane-doe"), "/people/jane-doe");
        assert_eq!(organization_lookup_url("acme"), "/organizations/acme");
        assert_eq!(deal_lookup_url("activity/1-elm-sale-01012020"), "/activity/1-elm-sale-01012020");
        assert_eq!(deal_lookup_url("/activity/x"), "/activity/x");
        assert_eq!(property_lookup_url("1-elm-st"), "/buildings/1-elm-st");
        assert_eq!(property_lookup_url("buildings/1-elm-st"), "/buildings/1-elm-st");
        assert_eq!(property_lookup_url("/buildings/1-elm-st"), "/buildings/1-elm-st");
    }
}
