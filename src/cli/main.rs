use anyhow::Context;
use clap::{Parser, Subcommand};
use log_ingestor::models::LogData;
use log_ingestor::search::SearchParams;
use reqwest::{Client, Response};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "log-ingestor-cli")]
#[command(about = "Command-line client for the log-ingestor gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "LOG_INGESTOR_ENDPOINT", default_value = "http://localhost:3000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a JSON file containing an array of log records
    Ingest {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Search logs; every filter is optional
    Search {
        #[arg(short, long)]
        level: Option<String>,

        #[arg(short, long)]
        resource_id: Option<String>,

        #[arg(short, long)]
        trace_id: Option<String>,

        #[arg(short, long)]
        span_id: Option<String>,

        #[arg(short, long)]
        commit: Option<String>,

        #[arg(short, long)]
        message: Option<String>,

        /// Inclusive lower bound on timestamp; needs --end-date too
        #[arg(long)]
        start_date: Option<String>,

        /// Inclusive upper bound on timestamp; needs --start-date too
        #[arg(long)]
        end_date: Option<String>,
    },

    /// Check server health
    Health,
}

async fn print_body(response: Response) -> anyhow::Result<()> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .with_context(|| format!("gateway returned a non-JSON body (status {})", status))?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("request failed with status {}", status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let endpoint = cli.endpoint.trim_end_matches('/');

    match cli.command {
        Commands::Ingest { file } => {
            let raw = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let logs: Vec<LogData> = serde_json::from_slice(&raw)
                .with_context(|| format!("{} is not a JSON array of log records", file.display()))?;

            let response = client
                .post(format!("{}/ingest", endpoint))
                .json(&logs)
                .send()
                .await?;

            print_body(response).await?;
        }

        Commands::Search {
            level,
            resource_id,
            trace_id,
            span_id,
            commit,
            message,
            start_date,
            end_date,
        } => {
            let params = SearchParams {
                level,
                resource_id,
                trace_id,
                span_id,
                commit,
                message,
                start_date,
                end_date,
            };

            let response = client
                .get(format!("{}/search", endpoint))
                .query(&params)
                .send()
                .await?;

            print_body(response).await?;
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", endpoint))
                .send()
                .await?;

            print_body(response).await?;
        }
    }

    Ok(())
}
