use pantry::{
    models::{ImagesPayload, InventoryRow},
    products::ProductLookup,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::capture::Submission;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Please select both images before submitting.")]
    MissingImages,

    #[error("Failed to get image data: {0}")]
    Image(#[from] std::io::Error),

    #[error("Image {0} is empty")]
    EmptyImage(String),

    #[error("Failed to submit images: {0}")]
    Submit(#[source] reqwest::Error),

    #[error("Failed to load inventory: {0}")]
    Inventory(#[source] reqwest::Error),

    #[error("Failed to look up product: {0}")]
    Product(#[source] reqwest::Error),

    #[error("Invalid backend url: {0}")]
    InvalidUrl(String),
}

/// Title and message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

impl Alert {
    pub fn success() -> Self {
        Self {
            title: "Success",
            message: "Images submitted successfully!",
        }
    }
}

impl ClientError {
    pub fn alert(&self) -> Alert {
        let message = match self {
            Self::MissingImages => {
                return Alert {
                    title: "Missing Images",
                    message: "Please select both images before submitting.",
                };
            }
            Self::Image(_) | Self::EmptyImage(_) => "Failed to get image data.",
            Self::Submit(_) => "Failed to submit images.",
            Self::Inventory(_) => "Failed to load inventory.",
            Self::Product(_) | Self::InvalidUrl(_) => "Failed to look up product.",
        };

        Alert {
            title: "Error",
            message,
        }
    }
}

/// Inventory row as the client renders it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodRow {
    pub food_name: String,
    pub expiration_date: String,
}

impl From<InventoryRow> for FoodRow {
    fn from(row: InventoryRow) -> Self {
        Self {
            food_name: row.name,
            expiration_date: row.expiration_date,
        }
    }
}

pub struct FridgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl FridgeClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Missing images leave the submission untouched and send nothing.
    /// Otherwise both captures are dropped once the request settles.
    pub async fn submit(&self, submission: &mut Submission) -> Result<Value, ClientError> {
        let payload = submission.payload()?;

        let result = self.post_images(&payload).await;
        submission.clear();

        result.map_err(|e| {
            error!("Failed to submit images: {e}");
            ClientError::Submit(e)
        })
    }

    async fn post_images(&self, payload: &ImagesPayload) -> Result<Value, reqwest::Error> {
        self.http
            .post(format!("{}/images", self.base_url))
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn inventory(&self) -> Result<Vec<FoodRow>, ClientError> {
        let rows: Vec<InventoryRow> = self
            .http
            .get(format!("{}/inventory", self.base_url))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(ClientError::Inventory)?
            .json()
            .await
            .map_err(ClientError::Inventory)?;

        Ok(rows.into_iter().map(FoodRow::from).collect())
    }

    /// Both found and not found come back as values.
    pub async fn product(&self, barcode: &str) -> Result<ProductLookup, ClientError> {
        self.http
            .get(self.product_url(barcode)?)
            .send()
            .await
            .map_err(ClientError::Product)?
            .json()
            .await
            .map_err(ClientError::Product)
    }

    /// The barcode is one encoded path segment, `/` and `?` included.
    fn product_url(&self, barcode: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["products", barcode]);

        Ok(url)
    }
}
