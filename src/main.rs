//! solr-query: run one query against a Solr cluster and print the response.
//!
//! ```text
//! solr-query --config client.toml -q 'title:rust' --rows 5
//! solr-query --server http://localhost:8983/solr/core1 -q '*:*' --fq 'type:book'
//! ```
//!
//! Servers given on the command line replace those from the config file.

use clap::Parser;
use std::path::PathBuf;

use solr_async_client::config::{load_config, ClientConfig};
use solr_async_client::observability::logging::init_logging;
use solr_async_client::observability::metrics::init_metrics;
use solr_async_client::{SolrClient, SolrQuery};

#[derive(Parser)]
#[command(name = "solr-query")]
#[command(about = "Query a Solr cluster through the load balanced client", long_about = None)]
struct Cli {
    /// Client configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solr base URL; repeat for several servers
    #[arg(short, long = "server")]
    servers: Vec<String>,

    /// Query string (q)
    #[arg(short, long, default_value = "*:*")]
    query: String,

    #[arg(long)]
    rows: Option<u32>,

    #[arg(long)]
    start: Option<u32>,

    /// Request handler path, e.g. /browse
    #[arg(long)]
    handler: Option<String>,

    /// Filter query (fq); repeatable
    #[arg(long)]
    fq: Vec<String>,

    /// Extra parameter as key=value; repeatable
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

impl Cli {
    fn to_query(&self) -> SolrQuery {
        let mut query = SolrQuery::new(self.query.as_str());
        if let Some(rows) = self.rows {
            query = query.rows(rows);
        }
        if let Some(start) = self.start {
            query = query.start(start);
        }
        if let Some(handler) = &self.handler {
            query = query.request_handler(handler.as_str());
        }
        for fq in &self.fq {
            query = query.filter_query(fq.as_str());
        }
        for (k, v) in &self.params {
            query = query.add(k.as_str(), v.as_str());
        }
        query
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if !cli.servers.is_empty() {
        config.servers = cli.servers.clone();
    }

    init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = SolrClient::from_config(&config)?;
    let result = client.query(cli.to_query()).await;
    client.shutdown();

    let response = result?;
    tracing::info!(
        num_found = ?response.num_found(),
        qtime = ?response.qtime(),
        "Query complete"
    );
    println!("{}", serde_json::to_string_pretty(response.body())?);
    Ok(())
}
