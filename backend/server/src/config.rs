use pantry::{
    config::{ConfigError, try_load},
    products::PRODUCT_API,
    storage::ObjectStoreConfig,
};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub ocr_url: String,
    pub product_api: String,
    pub object_store: ObjectStoreConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            ocr_url: try_load("OCR_URL", "http://127.0.0.1:9000/detect-text")?,
            product_api: try_load("PRODUCT_API", PRODUCT_API)?,
            object_store: ObjectStoreConfig::load()?,
        })
    }
}
