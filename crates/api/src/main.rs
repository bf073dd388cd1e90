//! Content Alchemy API server binary.
//!
//! Usage:
//!   alchemy-api --config alchemy.toml
//!   alchemy-api --port 8080 --bind 0.0.0.0
//!   alchemy-api --config alchemy.toml --query "Write a blog about AI trends"

use alchemy_api::{AppState, serve};
use alchemy_coordinator::CoordinatorConfig;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Content Alchemy API Server

Usage: alchemy-api [OPTIONS]

Options:
  -c, --config <FILE>      Path to a TOML config file
  -p, --port <PORT>        Port to listen on (default: 8080)
  -b, --bind <ADDR>        Bind address (default: 127.0.0.1)
  -q, --query <TEXT>       Run one query, print the workflow state as JSON, and exit
  -h, --help               Show this help message";

#[derive(Debug)]
struct Args {
    config_path: Option<String>,
    port: u16,
    bind: String,
    query: Option<String>,
    help: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args {
        config_path: None,
        port: 8080,
        bind: "127.0.0.1".to_string(),
        query: None,
        help: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--port" | "-p" => {
                let raw = value("--port")?;
                parsed.port = raw
                    .parse()
                    .with_context(|| format!("Invalid port number: {raw}"))?;
            }
            "--config" | "-c" => parsed.config_path = Some(value("--config")?),
            "--bind" | "-b" => parsed.bind = value("--bind")?,
            "--query" | "-q" => parsed.query = Some(value("--query")?),
            "--help" | "-h" => parsed.help = true,
            other => anyhow::bail!("Unknown argument: {other}\n\n{HELP}"),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alchemy_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    if args.help {
        println!("{HELP}");
        return Ok(());
    }

    let config = match &args.config_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            CoordinatorConfig::from_file(path)?
        }
        None => {
            tracing::info!("Using default configuration");
            CoordinatorConfig::default()
        }
    };

    let state = AppState::new(&config)?;

    if let Some(query) = args.query {
        let result = state.coordinator.run(&query).await;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if args.bind == "0.0.0.0" {
        tracing::warn!(
            "Server binding to 0.0.0.0 exposes the API to all network interfaces. \
             Put it behind authentication and a firewall."
        );
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}:{}", args.bind, args.port))?;
    serve(Arc::new(state), addr).await?;

    Ok(())
}
