//! Issuetrack REST API Server
//!
//! Serves the issue tracker API over HTTP: CRUD on issue records, filtered
//! listing with pagination, and owner/status summary counts.

mod routes;

use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use issuetrack::storage::{IssueStore, JsonFileStorage};

/// Command-line options, each overridable from the environment.
#[derive(Debug, Parser)]
#[command(name = "issuetrack-server", about = "REST API server for the issuetrack issue tracker")]
struct Args {
    /// Directory holding the record store data
    #[arg(long, env = "ISSUETRACK_DATA_DIR", default_value = ".issuetrack")]
    data_dir: String,

    /// Port to listen on
    #[arg(long, env = "ISSUETRACK_PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    info!("Starting issuetrack API server...");

    // The store handle is created once, before the listener accepts
    // connections, and shared across all requests.
    let storage = JsonFileStorage::new(&args.data_dir);
    storage.init().map_err(|e| {
        anyhow::anyhow!(
            "Failed to initialize record store at {}: {}",
            args.data_dir,
            e
        )
    })?;
    info!("Using record store at: {}", args.data_dir);
    let store = Arc::new(storage);

    // Build CORS layer for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .nest("/api", routes::create_routes(store))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Bind to 0.0.0.0 to accept connections from all network interfaces
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
