//! # Fridge Jobs
//!
//! One-shot jobs and utilities around the inventory.
//!
//! ## Digest
//! 1. Read every item from the inventory table.
//!
//! 2. Keep the ones expiring within 3 days, bare dates count from midnight UTC. Unparsable dates are skipped.
//!
//! 3. Nothing left: log and stop, the completion service is not called.
//!
//! 4. Build the prompt, one `• name (expires date)` line per item in table order.
//!
//! 5. Send it with a fresh client token, log the first returned message or `No recipes returned.`
//!
//! Failures are not retried, the next scheduled run starts from scratch.
//!
//! ## Upload
//! - Local file to the object store, keyed by its base name
//!
//! ## Seed
//! - JSON array of inventory items stored in the object store, written item by item to the table
//!
//! ## Lookup
//! - Simulated barcode scan against the product database
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use pantry::{
    completion::{ChatRequest, CompletionService},
    database::InventoryStore,
    digest::{Digest, NO_RECIPES, default_horizon},
    models::InventoryItem,
    products::{ProductClient, ProductLookup},
    storage::ObjectStore,
};
use tokio::fs;
use tracing::info;

pub mod config;
pub mod utils;

use utils::{file_key, progress_bar};

pub const SAMPLE_BARCODE: &str = "737628064502";
pub const SEEDED: &str = "Data uploaded.";

/// Returns the suggestion, `None` when nothing is about to expire.
pub async fn run_digest(
    store: &dyn InventoryStore,
    completion: &dyn CompletionService,
    application_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    let items = store.items().await?;

    let Some(digest) = Digest::collect(&items, now, default_horizon()) else {
        info!("No soon-to-expire items found.");
        return Ok(None);
    };

    info!("{} of {} items expire soon", digest.entries().len(), items.len());

    let request = ChatRequest::new(application_id, digest.prompt());
    let response = completion.chat(&request).await?;

    let suggestion = response.first_message().unwrap_or(NO_RECIPES).to_string();
    info!("Recipe suggestions:\n{suggestion}");

    Ok(Some(suggestion))
}

pub async fn upload_file(objects: &dyn ObjectStore, path: &Path) -> Result<String> {
    let key = file_key(path)?;
    let content = fs::read(path).await?;

    let location = objects.put(&key, &content).await?;
    info!("File uploaded successfully. {location}");

    Ok(location)
}

/// Returns the number of items written.
pub async fn seed_inventory(
    objects: &dyn ObjectStore,
    store: &dyn InventoryStore,
    key: &str,
) -> Result<usize> {
    let data = objects.get(key).await?;
    let items: Vec<InventoryItem> = serde_json::from_slice(&data)?;

    let pb = progress_bar(items.len())?;

    for item in &items {
        pb.set_message(item.name.clone());
        store.put_item(item).await?;
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    info!("{SEEDED}");

    Ok(items.len())
}

pub async fn simulate_scan(products: &ProductClient, barcode: &str) -> ProductLookup {
    let lookup = products.lookup(barcode).await;

    match &lookup {
        ProductLookup::Found(product) => info!("Food Information: {product:?}"),
        ProductLookup::Missing { error } => info!("{error}"),
    }

    lookup
}
