use brokergraph::{queries, Config, GraphClient, Neo4jHttpClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let client = Neo4jHttpClient::from_config(&config.neo4j)?;

    println!("\n=== Graph Statistics ({}) ===\n", config.neo4j.database);

    let labels = client.run(&queries::label_counts()).await?;
    if labels.is_empty() {
        println!("No nodes found.");
        println!("\nLoad data into the graph to generate statistics.");
        return Ok(());
    }

    println!("{:<20} {:>12}", "Label", "Nodes");
    println!("{}", "-".repeat(33));
    let mut total_nodes = 0;
    for row in &labels {
        let count = row.i64("total").unwrap_or(0);
        total_nodes += count;
        println!(
            "{:<20} {:>12}",
            row.text("label").unwrap_or_default(),
            count
        );
    }

    let relationships = client.run(&queries::relationship_counts()).await?;
    println!("\n{:<20} {:>12}", "Relationship", "Edges");
    println!("{}", "-".repeat(33));
    let mut total_edges = 0;
    for row in &relationships {
        let count = row.i64("total").unwrap_or(0);
        total_edges += count;
        println!(
            "{:<20} {:>12}",
            row.text("relationship").unwrap_or_default(),
            count
        );
    }

    // Nodes with several labels are counted once per label
    println!("\nLabel memberships: {}", total_nodes);
    println!("Relationships:     {}", total_edges);

    Ok(())
}
