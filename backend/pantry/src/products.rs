//! # Product Lookup
//!
//! Barcode to product details through the Open Food Facts API.
//!
//! ## Response
//! - `status == 1`: product found, missing or empty fields fall back to defaults
//! - anything else: `{ "error": "Product not found in database" }`
//! - transport or decoding failures: `{ "error": "Failed to fetch data: ..." }`
//!
//! ## Commands
//!
//! Example barcode (Coca-Cola).
//! ```sh
//! curl https://world.openfoodfacts.org/api/v0/product/737628064502.json
//! ```
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;

use crate::models::UNKNOWN;

pub const PRODUCT_API: &str = "https://world.openfoodfacts.org/api/v0/product";
pub const NOT_FOUND: &str = "Product not found in database";

const FOUND: i64 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub brand: String,
    pub ingredients: String,
    pub allergens: String,
    pub nutrients: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ProductLookup {
    Found(Product),
    Missing { error: String },
}

impl ProductLookup {
    pub fn not_found() -> Self {
        Self::Missing {
            error: NOT_FOUND.to_string(),
        }
    }

    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self::Missing {
            error: format!("Failed to fetch data: {reason}"),
        }
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Found(product) => Some(product),
            Self::Missing { .. } => None,
        }
    }
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<RawProduct>,
}

#[derive(Deserialize, Default)]
struct RawProduct {
    product_name: Option<String>,
    brands: Option<String>,
    ingredients_text: Option<String>,
    allergens: Option<String>,
    nutriments: Option<Value>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        Self {
            name: or_default(raw.product_name, UNKNOWN),
            brand: or_default(raw.brands, UNKNOWN),
            ingredients: or_default(raw.ingredients_text, UNKNOWN),
            allergens: or_default(raw.allergens, "None"),
            nutrients: raw
                .nutriments
                .filter(Value::is_object)
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn lookup(&self, barcode: &str) -> ProductLookup {
        match self.fetch(barcode).await {
            Ok(response) if response.status == FOUND => {
                ProductLookup::Found(response.product.unwrap_or_default().into())
            }
            Ok(_) => ProductLookup::not_found(),
            Err(e) => {
                error!("Error fetching product data for {barcode}: {e}");

                ProductLookup::failed(e)
            }
        }
    }

    async fn fetch(&self, barcode: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}/{}.json", self.base_url, barcode.trim());

        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_found_product() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/737628064502.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": 1,
                    "product": {
                        "product_name": "Coca-Cola",
                        "brands": "Coca-Cola",
                        "ingredients_text": "Carbonated water, sugar",
                        "allergens": "",
                        "nutriments": { "sugars_100g": 10.6 }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ProductClient::new(reqwest::Client::new(), server.url());
        let lookup = client.lookup("737628064502").await;

        mock.assert_async().await;
        assert_eq!(
            lookup,
            ProductLookup::Found(Product {
                name: "Coca-Cola".to_string(),
                brand: "Coca-Cola".to_string(),
                ingredients: "Carbonated water, sugar".to_string(),
                allergens: "None".to_string(),
                nutrients: json!({ "sugars_100g": 10.6 }),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_fields_fall_back() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/42.json")
            .with_status(200)
            .with_body(r#"{ "status": 1, "product": { "nutriments": [] } }"#)
            .create_async()
            .await;

        let client = ProductClient::new(reqwest::Client::new(), format!("{}/", server.url()));
        let product = client.lookup("42").await.product().cloned().unwrap();

        assert_eq!(product.name, "Unknown");
        assert_eq!(product.brand, "Unknown");
        assert_eq!(product.ingredients, "Unknown");
        assert_eq!(product.allergens, "None");
        assert_eq!(product.nutrients, json!({}));
    }

    #[tokio::test]
    async fn test_absent_barcode_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/000.json")
            .with_status(200)
            .with_body(r#"{ "status": 0, "status_verbose": "product not found" }"#)
            .create_async()
            .await;

        let client = ProductClient::new(reqwest::Client::new(), server.url());
        let lookup = client.lookup("000").await;

        assert_eq!(lookup, ProductLookup::not_found());
        assert_eq!(
            serde_json::to_value(&lookup).unwrap(),
            json!({ "error": "Product not found in database" })
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_a_value() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/1.json")
            .with_status(503)
            .create_async()
            .await;

        let client = ProductClient::new(reqwest::Client::new(), server.url());

        match client.lookup("1").await {
            ProductLookup::Missing { error } => assert!(error.starts_with("Failed to fetch data")),
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_round_trips_untagged() {
        let lookup: ProductLookup = serde_json::from_value(json!({ "error": "nope" })).unwrap();
        assert_eq!(
            lookup,
            ProductLookup::Missing {
                error: "nope".to_string()
            }
        );
    }
}
