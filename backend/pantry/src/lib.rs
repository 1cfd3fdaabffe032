//! # Pantry
//!
//! Shared pieces of the fridge inventory backend.
//!
//! - [`models`]: inventory records and wire payloads
//! - [`digest`]: expiring items digest and recipe prompt
//! - [`extract`]: barcode and expiration label extraction from detected text
//! - [`products`]: barcode to product lookup
//! - [`completion`]: conversational completion service
//! - [`storage`]: object store for raw images and documents
//! - [`database`]: inventory and barcode tables
//! - [`text`]: text detection over label photos
//! - [`config`]: environment and secret loading
//!
//! Every client is built by the caller and passed in, nothing here is process-global.
pub mod completion;
pub mod config;
pub mod database;
pub mod digest;
pub mod error;
pub mod extract;
pub mod models;
pub mod products;
pub mod storage;
pub mod text;

pub use error::PantryError;
