use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN: &str = "Unknown";

/// A tracked food item as stored in the inventory table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub expiration_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<BarcodeMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, expiration_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            expiration_date: expiration_date.into(),
            barcode: None,
            uploaded_at: None,
        }
    }

    /// Product name from the barcode metadata, falling back to the display name.
    pub fn digest_name(&self) -> &str {
        self.barcode
            .as_ref()
            .and_then(|meta| meta.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }

    pub fn row(&self) -> InventoryRow {
        InventoryRow {
            name: self.digest_name().to_string(),
            expiration_date: self.expiration_date.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<Value>,
}

/// Inventory listing entry served to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub name: String,
    pub expiration_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImagesPayload {
    pub barcode_image: String,
    pub expiration_image: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeUpload {
    pub barcode_id: String,
    pub file_content: String,
    pub file_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRecord {
    pub barcode_id: String,
    pub file_name: String,
    pub upload_timestamp: String,
}
