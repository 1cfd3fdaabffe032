use std::{fs, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};
use pantry::models::ImagesPayload;

use crate::ClientError;

/// A picked photo, held until the next submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCapture {
    pub uri: String,
    pub base64: String,
}

impl ImageCapture {
    pub fn new(uri: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            uri: uri.into(),
            base64: STANDARD.encode(bytes),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = fs::read(path)?;

        if bytes.is_empty() {
            return Err(ClientError::EmptyImage(path.display().to_string()));
        }

        Ok(Self::new(format!("file://{}", path.display()), &bytes))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub barcode_image: Option<ImageCapture>,
    pub expiration_image: Option<ImageCapture>,
}

impl Submission {
    pub fn is_ready(&self) -> bool {
        self.barcode_image.is_some() && self.expiration_image.is_some()
    }

    pub fn payload(&self) -> Result<ImagesPayload, ClientError> {
        match (&self.barcode_image, &self.expiration_image) {
            (Some(barcode), Some(expiration)) => Ok(ImagesPayload {
                barcode_image: barcode.base64.clone(),
                expiration_image: expiration.base64.clone(),
            }),
            _ => Err(ClientError::MissingImages),
        }
    }

    pub fn clear(&mut self) {
        self.barcode_image = None;
        self.expiration_image = None;
    }
}
