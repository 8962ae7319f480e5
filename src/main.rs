use anyhow::Context;
use clap::Parser;
use picks_gateway::app::server;
use picks_gateway::core::ConfigProvider;
use picks_gateway::utils::{logger, validation::Validate};
use picks_gateway::{Connection, Gateway, GatewayConfig, QueryExecutor};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::parse()
        .resolve()
        .context("failed to load configuration file")?;

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_logger(config.verbose);
    }

    tracing::info!("Starting picks-gateway");
    tracing::debug!("Static directory: {}", config.static_dir());

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let connection = Connection::from_config(&config);
    if !connection.is_connected() {
        tracing::warn!("Starting without a remote connection; API endpoints will return empty data");
    }
    let executor = QueryExecutor::new(connection);
    let gateway = Arc::new(Gateway::new(executor, config.static_dir()));

    let listener = TcpListener::bind((config.host(), config.port()))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host(), config.port()))?;

    server::serve(listener, gateway, server::shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}
