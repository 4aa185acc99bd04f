//! `openwmsd` — the warehouse operations server binary.
//!
//! Usage:
//!   openwmsd --data-dir <dir> [--listen <addr>] [--seed-demo]
//!
//! Wires the embedded document store and event hub into the WMS module
//! and serves its routes.

mod bootstrap;
mod routes;

use std::sync::Arc;

use clap::Parser;
use openwms_core::Module;
use openwms_host::{EventHub, SqliteDocStore};
use tracing::info;

/// OpenWMS server.
#[derive(Parser, Debug)]
#[command(name = "openwmsd", about = "Warehouse operations server")]
struct Cli {
    /// Directory for service data files.
    #[arg(long = "data-dir")]
    data_dir: Option<std::path::PathBuf>,

    /// Path to the document database (overrides `{data-dir}/wms.sqlite`).
    #[arg(long = "db")]
    db_path: Option<std::path::PathBuf>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Seed a small demo data set on startup (idempotent).
    #[arg(long = "seed-demo")]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = openwms_core::ServiceConfig {
        data_dir: cli.data_dir.clone(),
        db_path: cli.db_path.clone(),
        listen: cli.listen.clone(),
    };

    if let Some(dir) = &config.data_dir {
        std::fs::create_dir_all(dir)?;
    }

    // Embedded host collaborator: document store + event hub.
    let db_path = config.resolve_db_path();
    let store = Arc::new(
        SqliteDocStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open document store: {}", e))?,
    );
    info!("Document store at {}", db_path.display());

    if cli.seed_demo {
        bootstrap::seed_demo(store.as_ref())?;
    }

    let hub = Arc::new(EventHub::default());

    let wms_module = wms::WmsModule::new(store, hub);
    info!("WMS module initialized");

    let module_routes = vec![(wms_module.name().to_string(), wms_module.routes())];

    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("OpenWMS server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
