use anyhow::Context;
use clap::Parser;
use odoo_sheet_import::server::{self, AppState};
use odoo_sheet_import::utils::{logger, validation::Validate};
use odoo_sheet_import::{CliConfig, OdooApi, OdooClient};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 只在本機開發時存在
    let _ = dotenvy::dotenv();
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting odoo-sheet-import API server");

    let config = cli.resolve()?;
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = Arc::new(OdooClient::new(config.odoo.clone())?);
    if !client.connect().await {
        anyhow::bail!("Failed to connect to Odoo server at {}", config.odoo.url);
    }

    let state = AppState::new(client, config.server.upload_dir.clone());
    let app = server::router(state, config.server.max_upload_bytes());

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
