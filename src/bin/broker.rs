//! Broker lookup CLI: resolve brokers from names or from free text and print
//! Markdown reports (or JSON with --json).

use brokergraph::broker::{
    normalize_broker_names, render_report, BrokerPipeline, BrokerResolver, LlmBrokerExtractor,
};
use brokergraph::{Config, GraphClient, Neo4jHttpClient};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve real-estate brokers against the graph.
#[derive(Parser, Debug)]
#[command(name = "broker")]
struct Args {
    /// Broker name to look up (repeatable).
    #[arg(long = "name")]
    names: Vec<String>,

    /// Free text to extract broker names from (requires [llm] config).
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the free text from a file.
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Print lookups as JSON instead of Markdown.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let args = Args::parse();
    let config = Config::load()?;

    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        ),
        (None, None) => None,
    };

    if args.names.is_empty() && text.is_none() {
        anyhow::bail!(
            "Usage: broker --name <name> [--name <name>...] | --text <text> | --text-file <path> [--json]"
        );
    }

    let graph: Arc<dyn GraphClient> = Arc::new(Neo4jHttpClient::from_config(&config.neo4j)?);
    let resolver = BrokerResolver::new(graph);

    let mut lookups = Vec::new();
    if !args.names.is_empty() {
        let names = normalize_broker_names(&args.names);
        lookups.extend(resolver.resolve_many(&names).await?);
    }
    if let Some(text) = text {
        let llm = config
            .llm
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Extracting brokers from text requires an [llm] section in config.toml"))?;
        let extractor = LlmBrokerExtractor::from_config(llm)?;
        let pipeline = BrokerPipeline::new(Arc::new(extractor), resolver.clone());

        let names = pipeline.extract_names(&text).await?;
        if names.is_empty() {
            eprintln!("No broker names found in the text.");
        }
        lookups.extend(resolver.resolve_many(&names).await?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lookups)?);
        return Ok(());
    }

    for (i, lookup) in lookups.iter().enumerate() {
        if i > 0 {
            println!("\n");
        }
        print!("{}", render_report(lookup));
    }

    Ok(())
}
