use crate::config::Neo4jConfig;
use crate::db::{GraphClient, GraphQuery, Record};
use crate::error::{BrokerGraphError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use url::Url;

/// Request body for the transactional commit endpoint
#[derive(Serialize)]
struct CommitRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: &'a Map<String, Value>,
}

/// Response from the transactional commit endpoint
#[derive(Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Deserialize)]
struct ServerError {
    code: String,
    message: String,
}

/// Neo4j client speaking the HTTP transactional API.
///
/// Every query is posted to `/db/{database}/tx/commit` as its own
/// auto-commit transaction. The underlying `reqwest::Client` keeps a
/// connection pool, so one instance should be shared for the process.
pub struct Neo4jHttpClient {
    client: Client,
    endpoint: Url,
    username: String,
    password: String,
}

impl Neo4jHttpClient {
    /// Create a client for `uri` (e.g. `http://localhost:7474`) and `database`
    pub fn new(
        uri: &str,
        database: &str,
        username: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = commit_endpoint(uri, database)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            username,
            password,
        })
    }

    /// Build a client from configuration, reading the password from the
    /// configured environment variable
    pub fn from_config(config: &Neo4jConfig) -> Result<Self> {
        let password = std::env::var(&config.password_env).map_err(|_| {
            BrokerGraphError::Config(format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable.",
                config.password_env
            ))
        })?;

        Self::new(
            &config.uri,
            &config.database,
            config.username.clone(),
            password,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolve the commit endpoint for a database
fn commit_endpoint(uri: &str, database: &str) -> Result<Url> {
    let raw = format!("{}/db/{}/tx/commit", uri.trim_end_matches('/'), database);
    Url::parse(&raw)
        .map_err(|e| BrokerGraphError::Config(format!("Invalid Neo4j uri {}: {}", uri, e)))
}

/// Turn a commit response into records, surfacing server-side errors
fn into_records(response: CommitResponse) -> Result<Vec<Record>> {
    if let Some(err) = response.errors.into_iter().next() {
        return Err(BrokerGraphError::Graph(format!("{}: {}", err.code, err.message)));
    }

    let Some(result) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };

    let columns = result.columns;
    Ok(result
        .data
        .into_iter()
        .map(|d| Record::from_row(&columns, d.row))
        .collect())
}

#[async_trait]
impl GraphClient for Neo4jHttpClient {
    async fn run(&self, query: &GraphQuery) -> Result<Vec<Record>> {
        let start = Instant::now();
        let request = CommitRequest {
            statements: vec![Statement {
                statement: query.cypher,
                parameters: &query.params,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json;charset=UTF-8")
            .json(&request)
            .send()
            .await
            .map_err(|e| BrokerGraphError::Graph(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(BrokerGraphError::Graph(format!(
                "Neo4j error {}: {}",
                status, body
            )));
        }

        let body: CommitResponse = response
            .json()
            .await
            .map_err(|e| BrokerGraphError::Graph(format!("Failed to parse response: {}", e)))?;

        let records = into_records(body)?;
        log::trace!(
            "query {} returned {} rows in {:?}",
            query.name,
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }
}
