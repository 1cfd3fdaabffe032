use pantry::{
    config::{ConfigError, read_optional_secret, try_load},
    products::PRODUCT_API,
    storage::ObjectStoreConfig,
};

pub struct Config {
    pub redis_url: String,
    pub completion_url: String,
    pub application_id: String,
    pub completion_key: Option<String>,
    pub product_api: String,
    pub object_store: ObjectStoreConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            completion_url: try_load("COMPLETION_URL", "http://127.0.0.1:9100")?,
            application_id: try_load("Q_APP_ID", "fridge")?,
            completion_key: read_optional_secret("COMPLETION_API_KEY"),
            product_api: try_load("PRODUCT_API", PRODUCT_API)?,
            object_store: ObjectStoreConfig::load()?,
        })
    }
}
