//! # Fridge Client
//!
//! Client side of the fridge inventory tracker.
//!
//! ## Flow
//!
//! - Pick a barcode photo and an expiration label photo
//! - Submit both, base64 encoded, to `POST /images`
//! - Either photo missing: alert, nothing is sent
//! - After the request settles, success or not, both photos are dropped
//! - Browse the inventory from `GET /inventory`, rendered as `foodName` + `expirationDate`
//!
//!
//!
//! ## Alerts
//!
//! | Condition | Title | Message |
//! |-----------|-------|---------|
//! | Submitted | Success | Images submitted successfully! |
//! | Photo missing | Missing Images | Please select both images before submitting. |
//! | Photo unreadable | Error | Failed to get image data. |
//! | Submit failed | Error | Failed to submit images. |
//! | Inventory failed | Error | Failed to load inventory. |
pub mod capture;
pub mod client;

pub use capture::{ImageCapture, Submission};
pub use client::{Alert, ClientError, FoodRow, FridgeClient};
