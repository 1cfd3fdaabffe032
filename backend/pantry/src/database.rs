//! # Redis
//!
//! Key-value tables for the inventory and the uploaded barcode images.
//!
//! ## Implementation
//!
//! - Redis hash `inventory`: item id to JSON encoded item
//! - Redis hash `barcodes`: barcode id to JSON encoded upload record
//! - Reads return records ordered by key, malformed records are skipped
//! - Expiration filtering happens in the digest, not in the store
//!
//! ## Commands
//!
//! Inspect the inventory.
//! ```sh
//! redis-cli HGETALL inventory
//! ```
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    error::PantryError,
    models::{BarcodeRecord, InventoryItem},
};

pub const INVENTORY_KEY: &str = "inventory";
pub const BARCODES_KEY: &str = "barcodes";

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn items(&self) -> Result<Vec<InventoryItem>, PantryError>;

    async fn put_item(&self, item: &InventoryItem) -> Result<(), PantryError>;

    async fn barcodes(&self) -> Result<Vec<BarcodeRecord>, PantryError>;

    async fn put_barcode(&self, record: &BarcodeRecord) -> Result<(), PantryError>;
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, PantryError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, PantryError> {
        Ok(Self::new(init_redis(redis_url).await?))
    }

    async fn read_all<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, PantryError> {
        let mut connection = self.connection.clone();
        let raw: HashMap<String, String> = connection.hgetall(key).await?;

        let mut entries: Vec<(String, String)> = raw.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries
            .into_iter()
            .filter_map(|(field, json)| {
                serde_json::from_str(&json)
                    .map_err(|e| warn!("Skipping malformed {key} record {field}: {e}"))
                    .ok()
            })
            .collect())
    }

    async fn write<T: Serialize + Sync>(
        &self,
        key: &str,
        field: &str,
        value: &T,
    ) -> Result<(), PantryError> {
        let json = serde_json::to_string(value)?;
        let mut connection = self.connection.clone();

        let _: () = connection.hset(key, field, json).await?;

        Ok(())
    }
}

#[async_trait]
impl InventoryStore for RedisStore {
    async fn items(&self) -> Result<Vec<InventoryItem>, PantryError> {
        self.read_all(INVENTORY_KEY).await
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), PantryError> {
        self.write(INVENTORY_KEY, &item.id, item).await
    }

    async fn barcodes(&self) -> Result<Vec<BarcodeRecord>, PantryError> {
        self.read_all(BARCODES_KEY).await
    }

    async fn put_barcode(&self, record: &BarcodeRecord) -> Result<(), PantryError> {
        self.write(BARCODES_KEY, &record.barcode_id, record).await
    }
}

/// In-process tables, insertion ordered.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<InventoryItem>>,
    barcodes: Mutex<Vec<BarcodeRecord>>,
}

impl MemoryStore {
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self {
            items: Mutex::new(items),
            barcodes: Mutex::default(),
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn items(&self) -> Result<Vec<InventoryItem>, PantryError> {
        Ok(self.items.lock().await.clone())
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), PantryError> {
        let mut items = self.items.lock().await;

        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }

        Ok(())
    }

    async fn barcodes(&self) -> Result<Vec<BarcodeRecord>, PantryError> {
        Ok(self.barcodes.lock().await.clone())
    }

    async fn put_barcode(&self, record: &BarcodeRecord) -> Result<(), PantryError> {
        let mut barcodes = self.barcodes.lock().await;

        match barcodes
            .iter_mut()
            .find(|existing| existing.barcode_id == record.barcode_id)
        {
            Some(existing) => *existing = record.clone(),
            None => barcodes.push(record.clone()),
        }

        Ok(())
    }
}
