use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use pantry::{
    models::{BarcodeRecord, BarcodeUpload, ImagesPayload, InventoryRow},
    products::ProductLookup,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::AppError,
    scan::scan_images,
    state::State,
    utils::{decode_image, decode_images, parse_payload},
};

pub const SUBMITTED: &str = "Images submitted successfully!";
pub const UPLOADED: &str = "File uploaded and metadata saved.";

#[derive(Serialize)]
pub struct ScanReceipt {
    pub message: &'static str,
    pub item: InventoryRow,
}

pub async fn images_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<Json<ScanReceipt>, AppError> {
    let payload: ImagesPayload = parse_payload(&body)?;
    let images = decode_images(&payload)?;
    let item = scan_images(&state, images, Utc::now()).await?;

    Ok(Json(ScanReceipt {
        message: SUBMITTED,
        item: item.row(),
    }))
}

pub async fn inventory_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Json<Vec<InventoryRow>>, AppError> {
    let items = state.store.items().await?;

    Ok(Json(items.iter().map(|item| item.row()).collect()))
}

pub async fn barcodes_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let upload: BarcodeUpload = parse_payload(&body)?;
    let bytes = decode_image(&upload.file_content)?;

    let location = state
        .objects
        .put(&upload.file_name, &bytes)
        .await
        .map_err(AppError::UploadFailed)?;
    info!("File uploaded successfully. {location}");

    let record = BarcodeRecord {
        barcode_id: upload.barcode_id,
        file_name: upload.file_name,
        upload_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    state
        .store
        .put_barcode(&record)
        .await
        .map_err(AppError::UploadFailed)?;

    Ok((StatusCode::OK, Json(json!({ "message": UPLOADED }))))
}

pub async fn product_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(barcode): Path<String>,
) -> impl IntoResponse {
    let lookup = state.products.lookup(&barcode).await;

    let status = match lookup {
        ProductLookup::Found(_) => StatusCode::OK,
        ProductLookup::Missing { .. } => StatusCode::NOT_FOUND,
    };

    (status, Json(lookup))
}
