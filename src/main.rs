use anyhow::Result;
use brokergraph::api::{ApiServer, AppState};
use brokergraph::broker::{BrokerPipeline, BrokerResolver, LlmBrokerExtractor};
use brokergraph::{queries, Config, GraphClient, Neo4jHttpClient, Services};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.app.log_level.as_str()),
    )
    .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("verify");

    match command {
        "serve" => run_server(config).await?,
        "verify" => run_verification(config).await?,
        other => {
            log::warn!("Unknown command {:?}, running verify", other);
            run_verification(config).await?;
        }
    }

    Ok(())
}

/// Build handler state: one pooled graph client shared by every service
fn build_state(config: &Config, graph: Arc<dyn GraphClient>) -> Result<AppState> {
    let resolver = BrokerResolver::new(Arc::clone(&graph));

    let pipeline = match &config.llm {
        Some(llm) => {
            let extractor = LlmBrokerExtractor::from_config(llm)?;
            log::info!("Broker extraction enabled ({})", llm.model);
            Some(BrokerPipeline::new(Arc::new(extractor), resolver.clone()))
        }
        None => {
            log::info!("No [llm] section, broker lookup by text is disabled");
            None
        }
    };

    Ok(AppState {
        services: Services::new(graph),
        pagination: config.pagination.clone(),
        title: config.app.title.clone(),
        resolver,
        pipeline,
    })
}

async fn run_server(config: Config) -> Result<()> {
    log::info!("Starting brokergraph v{}", env!("CARGO_PKG_VERSION"));

    let client = Neo4jHttpClient::from_config(&config.neo4j)?;
    log::info!("Neo4j endpoint: {}", client.endpoint());
    let graph: Arc<dyn GraphClient> = Arc::new(client);

    let state = build_state(&config, graph)?;
    let server = ApiServer::new(state, config.http_server.clone());
    server.run().await?;

    Ok(())
}

/// Check connectivity and print node counts per label
async fn run_verification(config: Config) -> Result<()> {
    log::info!("Starting brokergraph v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Configuration loaded successfully");

    let client = Neo4jHttpClient::from_config(&config.neo4j)?;
    log::info!("Neo4j endpoint: {}", client.endpoint());

    client.run(&queries::ping()).await?;
    log::info!("✓ Neo4j connection: OK");

    let rows = client.run(&queries::label_counts()).await?;
    if rows.is_empty() {
        log::warn!("Graph is empty");
    }
    for row in rows {
        log::info!(
            "✓ {}: {} nodes",
            row.text("label").unwrap_or_default(),
            row.i64("total").unwrap_or(0)
        );
    }

    match &config.llm {
        Some(llm) => log::info!("LLM: {} at {}", llm.model, llm.base_url),
        None => log::info!("LLM: not configured"),
    }

    log::info!("✓ Verification complete");
    Ok(())
}
