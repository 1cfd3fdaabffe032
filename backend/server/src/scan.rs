//! # Label Scan
//!
//! Turns a submitted photo pair into an inventory item.
//!
//! 1. Detect text on each image
//! 2. Barcode digits from the barcode photo, expiration label from the expiration photo
//! 3. Store both raw images, keyed by the new item id. Unreadable labels store nothing
//! 4. Look up the product, a miss keeps the item with an `Unknown` name
//! 5. Normalize the label to an ISO date when possible, otherwise keep it raw
//! 6. Write the item to the inventory table
use chrono::{DateTime, Utc};
use pantry::{
    extract::{barcode_from_lines, expiration_from_lines, normalize_date},
    models::{BarcodeMeta, InventoryItem, UNKNOWN},
    products::ProductLookup,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AppError::{self, UnreadableLabel},
    state::State,
    utils::Images,
};

pub async fn scan_images(
    state: &State,
    images: Images,
    now: DateTime<Utc>,
) -> Result<InventoryItem, AppError> {
    let barcode_lines = state.detector.detect_lines(&images.barcode).await?;
    let expiration_lines = state.detector.detect_lines(&images.expiration).await?;

    #[cfg(feature = "verbose")]
    info!("Detected texts: {barcode_lines:?} {expiration_lines:?}");

    let (Some(barcode), Some(label)) = (
        barcode_from_lines(&barcode_lines),
        expiration_from_lines(&expiration_lines),
    ) else {
        return Err(UnreadableLabel);
    };

    let id = Uuid::new_v4().to_string();

    state
        .objects
        .put(&format!("barcodes/{id}.jpg"), &images.barcode)
        .await?;
    state
        .objects
        .put(&format!("expirations/{id}.jpg"), &images.expiration)
        .await?;

    let expiration_date = match normalize_date(&label) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => {
            warn!("Could not normalize expiration label {label}, storing it as is");
            label
        }
    };

    let item = match state.products.lookup(&barcode).await {
        ProductLookup::Found(product) => InventoryItem {
            id,
            name: product.name.clone(),
            expiration_date,
            barcode: Some(BarcodeMeta {
                code: Some(barcode),
                name: Some(product.name),
                brand: Some(product.brand),
                ingredients: Some(product.ingredients),
                allergens: Some(product.allergens),
                nutrients: Some(product.nutrients),
            }),
            uploaded_at: Some(now),
        },
        ProductLookup::Missing { error } => {
            info!("No product for barcode {barcode}: {error}");

            InventoryItem {
                id,
                name: UNKNOWN.to_string(),
                expiration_date,
                barcode: Some(BarcodeMeta {
                    code: Some(barcode),
                    ..Default::default()
                }),
                uploaded_at: Some(now),
            }
        }
    };

    state.store.put_item(&item).await?;
    info!("Stored {} expiring {}", item.name, item.expiration_date);

    Ok(item)
}
