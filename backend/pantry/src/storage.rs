//! # Object Store
//!
//! Raw image and document storage keyed by file name.
//!
//! - Filesystem: objects live under a root directory, the default for local runs
//! - HTTP: `PUT`/`GET <base>/<key>` against any S3-compatible or presigned endpoint
//!
//! Keys are relative paths. Empty segments, `..` and leading slashes are rejected.
//! Over HTTP each key segment is percent-encoded, so `#`, `?` and spaces stay in the object name.
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tokio::fs;
use tracing::info;

use crate::{
    config::{ConfigError, try_load, var},
    error::PantryError,
};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the location of the stored object.
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, PantryError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, PantryError>;
}

pub enum ObjectStoreConfig {
    Fs(PathBuf),
    Http(String),
}

impl ObjectStoreConfig {
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(url) = var("OBJECT_STORE_URL") {
            return Ok(Self::Http(url));
        }

        Ok(Self::Fs(try_load("STORAGE_DIR", "./objects")?))
    }
}

pub fn open_object_store(config: &ObjectStoreConfig, http: reqwest::Client) -> Arc<dyn ObjectStore> {
    match config {
        ObjectStoreConfig::Fs(root) => {
            info!("Using filesystem object store at {}", root.display());
            Arc::new(FsObjectStore::new(root.clone()))
        }
        ObjectStoreConfig::Http(url) => {
            info!("Using HTTP object store at {url}");
            Arc::new(HttpObjectStore::new(http, url.clone()))
        }
    }
}

fn validate_key(key: &str) -> Result<&str, PantryError> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && !key.split('/').any(str::is_empty)
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if valid {
        Ok(key)
    } else {
        Err(PantryError::InvalidKey(key.to_string()))
    }
}

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf, PantryError> {
        Ok(self.root.join(validate_key(key)?))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, PantryError> {
        let path = self.path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        Ok(path.display().to_string())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, PantryError> {
        let path = self.path(key)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PantryError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, key: &str) -> Result<Url, PantryError> {
        let key = validate_key(key)?;
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PantryError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|_| PantryError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(key.split('/'));

        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, PantryError> {
        let url = self.url(key)?;

        self.http
            .put(url.clone())
            .body(data.to_vec())
            .send()
            .await?
            .error_for_status()?;

        Ok(url.to_string())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, PantryError> {
        let response = self.http.get(self.url(key)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PantryError::NotFound(key.to_string()));
        }

        Ok(response.error_for_status()?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    #[test]
    fn test_key_validation() {
        assert!(validate_key("scan.jpg").is_ok());
        assert!(validate_key("barcodes/abc.jpg").is_ok());

        for key in ["", "/etc/passwd", "../up.jpg", "a/../b", "a//b", "a/", "./a"] {
            assert!(
                matches!(validate_key(key), Err(PantryError::InvalidKey(_))),
                "{key} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_fs_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let location = store.put("barcodes/scan.jpg", b"jpeg bytes").await.unwrap();

        assert!(location.ends_with("scan.jpg"));
        assert_eq!(store.get("barcodes/scan.jpg").await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_fs_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.get("nothing.json").await.unwrap_err();
        assert!(matches!(err, PantryError::NotFound(key) if key == "nothing.json"));
    }

    #[tokio::test]
    async fn test_http_put_and_get() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/bucket/scan.jpg")
            .match_body("raw")
            .with_status(200)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/bucket/scan.jpg")
            .with_status(200)
            .with_body("raw")
            .create_async()
            .await;
        server
            .mock("GET", "/bucket/gone.jpg")
            .with_status(404)
            .create_async()
            .await;

        let store = HttpObjectStore::new(reqwest::Client::new(), format!("{}/bucket/", server.url()));

        let location = store.put("scan.jpg", b"raw").await.unwrap();
        assert_eq!(location, format!("{}/bucket/scan.jpg", server.url()));
        assert_eq!(store.get("scan.jpg").await.unwrap(), b"raw");
        assert!(matches!(
            store.get("gone.jpg").await,
            Err(PantryError::NotFound(_))
        ));

        put.assert_async().await;
        get.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_keys_are_percent_encoded() {
        let mut server = Server::new_async().await;
        let encoded = server
            .mock("PUT", "/bucket/photo%231%20a%3F.jpg")
            .match_body("raw")
            .with_status(200)
            .create_async()
            .await;
        let truncated = server
            .mock("PUT", "/bucket/photo")
            .expect(0)
            .create_async()
            .await;
        let nested = server
            .mock("PUT", "/bucket/barcodes/a%20b.jpg")
            .with_status(200)
            .create_async()
            .await;

        let store = HttpObjectStore::new(reqwest::Client::new(), format!("{}/bucket", server.url()));

        let location = store.put("photo#1 a?.jpg", b"raw").await.unwrap();
        assert_eq!(location, format!("{}/bucket/photo%231%20a%3F.jpg", server.url()));
        store.put("barcodes/a b.jpg", b"raw").await.unwrap();

        encoded.assert_async().await;
        truncated.assert_async().await;
        nested.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_bad_base_url() {
        let store = HttpObjectStore::new(reqwest::Client::new(), "not a url");

        assert!(matches!(
            store.put("scan.jpg", b"raw").await,
            Err(PantryError::InvalidUrl(_))
        ));
    }
}
