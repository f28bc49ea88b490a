//! Read-only REST surface over the entity services plus broker lookup.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{BrokerReport, ListParams, LookupRequest, RecentParams};

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::broker::{BrokerPipeline, BrokerResolver};
use crate::config::{HttpServerConfig, PaginationConfig};
use crate::error::{BrokerGraphError, Result};
use crate::service::Services;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub pagination: PaginationConfig,
    pub title: String,
    pub resolver: BrokerResolver,
    /// Present only when an LLM is configured
    pub pipeline: Option<BrokerPipeline>,
}

/// Build the CORS layer: configured origins, or any origin when none are set
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/people", get(handlers::list_people))
        .route("/api/people/*url", get(handlers::person_path))
        .route("/api/deals", get(handlers::list_deals))
        .route("/api/deals/*url", get(handlers::deal_path))
        .route("/api/organizations", get(handlers::list_organizations))
        .route("/api/organizations/*url", get(handlers::organization_path))
        .route("/api/properties", get(handlers::list_properties))
        .route("/api/properties/*url", get(handlers::property_path))
        .route("/api/stories", get(handlers::list_stories))
        .route("/api/debug/deal-properties", get(handlers::deal_properties))
        .route("/api/brokers/lookup", post(handlers::lookup_brokers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)),
        )
        .with_state(state)
}

/// HTTP server for the dashboard API
pub struct ApiServer {
    state: AppState,
    config: HttpServerConfig,
}

impl ApiServer {
    pub fn new(state: AppState, config: HttpServerConfig) -> Self {
        Self { state, config }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config.allowed_origins)
    }

    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            BrokerGraphError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        log::info!("Starting API server on http://{}", addr);
        if self.config.allowed_origins.is_empty() {
            log::info!("CORS: any origin");
        } else {
            log::info!("CORS: {}", self.config.allowed_origins.join(", "));
        }

        axum::serve(listener, self.router())
            .await
            .map_err(|e| {
                BrokerGraphError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("HTTP server error: {}", e),
                ))
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockGraph;
    use crate::queries::{deals, organizations, people, properties};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(graph: Arc<MockGraph>) -> Router {
        let state = AppState {
            services: Services::new(graph.clone()),
            pagination: PaginationConfig::default(),
            title: "Real Estate Dashboard API".to_string(),
            resolver: BrokerResolver::new(graph),
            pipeline: None,
        };
        create_router(state, &[])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn people_population(n: i64) -> Vec<Value> {
        (1..=n)
            .map(|i| json!({"id": i, "props": {"name": format!("P{}", i)}}))
            .collect()
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let graph = Arc::new(MockGraph::new());
        let (status, body) = get_json(app(graph.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));

        let (status, body) = get_json(app(graph), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Real Estate Dashboard API"));
    }

    #[tokio::test]
    async fn test_people_list_defaults() {
        let graph = Arc::new(
            MockGraph::new()
                .with_rows("person.count", vec![json!({"total": 20})])
                .with_rows(people::PAGE, people_population(20)),
        );
        let (status, body) = get_json(app(graph.clone()), "/api/people").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 12);
        assert_eq!(body["total"], json!(20));
        assert_eq!(body["page"], json!(1));
        assert_eq!(body["limit"], json!(12));
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_unprocessable() {
        let graph = Arc::new(MockGraph::new());
        for uri in [
            "/api/deals?page=0",
            "/api/deals?limit=0",
            "/api/deals?limit=101",
            "/api/deals?page=abc",
            "/api/people/recent?limit=500",
        ] {
            let (status, body) = get_json(app(graph.clone()), uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
            assert!(body["detail"].is_string());
        }
        assert!(graph.calls().is_empty());
    }

    #[tokio::test]
    async fn test_detail_urls_get_entity_prefixes() {
        let graph = Arc::new(MockGraph::new());
        let cases = [
            ("/api/people/jane-doe", people::BY_URL, "/people/jane-doe"),
            ("/api/organizations/acme", organizations::BY_URL, "/organizations/acme"),
            ("/api/properties/1-elm-st", properties::BY_URL, "/buildings/1-elm-st"),
            (
                "/api/deals/activity/123-Main-St-sale-01152023",
                deals::BY_URL,
                "/activity/123-Main-St-sale-01152023",
            ),
        ];
        for (uri, name, url) in cases {
            get_json(app(graph.clone()), uri).await;
            let call = graph.calls().pop().unwrap();
            assert_eq!(call.name, name);
            assert_eq!(call.get_param("url"), Some(&json!(url)));
        }
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let graph = Arc::new(MockGraph::new());
        let (status, body) = get_json(app(graph.clone()), "/api/people/nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Person not found"}));
        assert_eq!(graph.calls().len(), 1);

        let (status, body) = get_json(app(graph), "/api/properties/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], json!("Property not found"));
    }

    #[tokio::test]
    async fn test_detail_found() {
        let graph = Arc::new(MockGraph::new().with_rows(
            deals::BY_URL,
            vec![json!({"id": 5, "props": {"url": "/activity/9-Pine-St-lease-03012021"}})],
        ));
        let (status, body) =
            get_json(app(graph), "/api/deals/activity/9-Pine-St-lease-03012021").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["property"], json!("9 Pine St"));
        assert_eq!(body["data"]["type"], json!("lease"));
        assert_eq!(body["data"]["participants"], json!([]));
    }

    #[tokio::test]
    async fn test_recent_listing() {
        let graph = Arc::new(MockGraph::new().with_rows(organizations::RECENT, vec![json!({"id": 1, "props": {"name": "Acme"}})]));
        let (status, body) = get_json(app(graph.clone()), "/api/organizations/recent").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], json!("Acme"));
        assert_eq!(graph.calls()[0].get_param("limit"), Some(&json!(20)));
    }

    #[tokio::test]
    async fn test_graph_failure_is_server_error() {
        let graph = Arc::new(MockGraph::new().failing("story.count", "connection refused"));
        let (status, body) = get_json(app(graph), "/api/stories").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_debug_deal_properties() {
        let graph = Arc::new(MockGraph::new().with_rows(
            deals::SAMPLE_KEYS,
            vec![json!({"keys": ["url"], "props": {"url": "/activity/x"}})],
        ));
        let (status, body) = get_json(app(graph.clone()), "/api/debug/deal-properties").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["samples"][0]["available_keys"], json!(["url"]));
        assert_eq!(graph.calls()[0].get_param("limit"), Some(&json!(5)));
    }

    #[tokio::test]
    async fn test_broker_lookup_by_names() {
        let graph = Arc::new(MockGraph::new());
        let (status, body) = post_json(
            app(graph.clone()),
            "/api/brokers/lookup",
            json!({"names": ["mr. john smith"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], json!("John Smith"));
        assert_eq!(body["data"][0]["found"], json!(false));
        assert_eq!(body["data"][0]["lookup"]["status"], json!("not_found"));
        assert_eq!(graph.call_names(), vec![people::BY_NAME]);
    }

    #[tokio::test]
    async fn test_broker_lookup_by_text_without_llm() {
        let graph = Arc::new(MockGraph::new());
        let (status, _) = post_json(
            app(graph.clone()),
            "/api/brokers/lookup",
            json!({"text": "Jane Doe of Acme brokered the deal"}),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = post_json(app(graph), "/api/brokers/lookup", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
