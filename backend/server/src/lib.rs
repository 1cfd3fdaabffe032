//! Documentation of the fridge inventory backend.
//!
//!
//!
//! # General Infrastructure
//! - Client submits a barcode photo and an expiration label photo as base64 JSON
//! - Server stores the raw photos in the object store
//! - Server runs text detection on both, extracts the barcode and the date, looks up the product
//! - The resulting item lands in the Redis `inventory` hash
//! - Clients list the inventory, the digest job reads the same hash
//!
//!
//!
//! # Routes
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `POST /images` | `{ barcodeImage, expirationImage }` | `{ message, item }` |
//! | `GET /inventory` | | `[{ name, expirationDate }]` |
//! | `POST /barcodes` | `{ barcodeId, fileContent, fileName }` | `{ message }` |
//! | `GET /products/{barcode}` | | product or `{ error }` |
//!
//! Failures respond `{ "error": "..." }`. Nothing is retried, the client alerts and the user resubmits.
//!
//!
//!
//! # Setup
//!
//! Run locally against a Redis on the default port.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
//!
//! Submit a scan.
//! ```sh
//! cargo run -p tester -- submit barcode.jpg expiration.jpg
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod scan;
pub mod state;
pub mod utils;

use config::Config;
use routes::{barcodes_handler, images_handler, inventory_handler, product_handler};
use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/images", post(images_handler))
        .route("/inventory", get(inventory_handler))
        .route("/barcodes", post(barcodes_handler))
        .route("/products/{barcode}", get(product_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(&config).await?;

    info!("Starting server...");
    let app = build_router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
