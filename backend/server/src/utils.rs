use axum::body::Bytes;
use base64::{Engine, engine::general_purpose::STANDARD};
use pantry::models::ImagesPayload;
use serde::de::DeserializeOwned;

use crate::error::AppError::{self, MalformedPayload};

pub struct Images {
    pub barcode: Vec<u8>,
    pub expiration: Vec<u8>,
}

/// Bodies that fail to deserialize, missing fields included, are malformed.
pub fn parse_payload<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(bytes).map_err(|_| MalformedPayload)
}

/// Accepts plain base64 or a `data:<mime>;base64,` URI.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| MalformedPayload)?;

    if bytes.is_empty() {
        return Err(MalformedPayload);
    }

    Ok(bytes)
}

pub fn decode_images(payload: &ImagesPayload) -> Result<Images, AppError> {
    Ok(Images {
        barcode: decode_image(&payload.barcode_image)?,
        expiration: decode_image(&payload.expiration_image)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_base64() {
        assert_eq!(decode_image("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_image(" aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(decode_image("data:image/jpeg;base64,aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_rejects_garbage_and_empty() {
        assert!(matches!(decode_image("not base64!"), Err(MalformedPayload)));
        assert!(matches!(decode_image(""), Err(MalformedPayload)));
    }

    #[test]
    fn test_payload_missing_field() {
        let body = Bytes::from_static(br#"{ "barcodeImage": "aGk=" }"#);
        assert!(matches!(parse_payload::<ImagesPayload>(&body), Err(MalformedPayload)));

        let body = Bytes::from_static(br#"{ "barcodeImage": "aGk=", "expirationImage": "aGk=" }"#);
        assert!(parse_payload::<ImagesPayload>(&body).is_ok());
    }

    #[test]
    fn test_both_images_required_to_decode() {
        let payload = ImagesPayload {
            barcode_image: "aGVsbG8=".to_string(),
            expiration_image: "???".to_string(),
        };

        assert!(matches!(decode_images(&payload), Err(MalformedPayload)));
    }
}
