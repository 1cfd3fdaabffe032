use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PantryError;

const LINE: &str = "LINE";

/// OCR over a single image, returning detected lines in reading order.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_lines(&self, image: &[u8]) -> Result<Vec<String>, PantryError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TextDetection {
    pub detected_text: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct DetectTextResponse {
    #[serde(default)]
    text_detections: Vec<TextDetection>,
}

fn lines(detections: Vec<TextDetection>) -> Vec<String> {
    detections
        .into_iter()
        .filter(|detection| detection.kind == LINE)
        .map(|detection| detection.detected_text)
        .collect()
}

pub struct HttpTextDetector {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTextDetector {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TextDetector for HttpTextDetector {
    async fn detect_lines(&self, image: &[u8]) -> Result<Vec<String>, PantryError> {
        let body = json!({ "Image": { "Bytes": STANDARD.encode(image) } });

        let response: DetectTextResponse = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(lines(response.text_detections))
    }
}
