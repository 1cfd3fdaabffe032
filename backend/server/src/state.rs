use std::sync::Arc;

use pantry::{
    PantryError,
    database::{InventoryStore, RedisStore},
    products::ProductClient,
    storage::{ObjectStore, open_object_store},
    text::{HttpTextDetector, TextDetector},
};

use super::config::Config;

pub struct State {
    pub store: Arc<dyn InventoryStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub detector: Arc<dyn TextDetector>,
    pub products: ProductClient,
}

impl State {
    pub async fn new(config: &Config) -> Result<Arc<Self>, PantryError> {
        let http = reqwest::Client::new();

        let store = RedisStore::connect(&config.redis_url).await?;
        let objects = open_object_store(&config.object_store, http.clone());

        Ok(Arc::new(Self {
            store: Arc::new(store),
            objects,
            detector: Arc::new(HttpTextDetector::new(http.clone(), config.ocr_url.clone())),
            products: ProductClient::new(http, config.product_api.clone()),
        }))
    }
}
