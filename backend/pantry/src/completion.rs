use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PantryError;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub application_id: String,
    pub client_token: Uuid,
    pub user_message: String,
}

impl ChatRequest {
    /// Every request gets a fresh idempotency token.
    pub fn new(application_id: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            client_token: Uuid::new_v4(),
            user_message: user_message.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody<'a> {
    client_token: &'a Uuid,
    user_message: &'a str,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub system_message: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    pub fn first_message(&self) -> Option<&str> {
        self.messages
            .first()
            .and_then(|message| message.content.as_deref())
            .or(self.system_message.as_deref())
    }
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, PantryError>;
}

/// Conversational completion endpoint reached over HTTP JSON.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, PantryError> {
        let url = format!(
            "{}/applications/{}/conversations?sync",
            self.endpoint, request.application_id
        );

        let mut builder = self.http.post(url).json(&ChatBody {
            client_token: &request.client_token,
            user_message: &request.user_message,
        });

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?.error_for_status()?.json().await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fresh_token_per_request() {
        let first = ChatRequest::new("app", "hi");
        let second = ChatRequest::new("app", "hi");

        assert_ne!(first.client_token, second.client_token);
    }

    #[test]
    fn test_first_message_fallbacks() {
        let response: ChatResponse = serde_json::from_value(json!({
            "messages": [{ "content": "Omelette" }, { "content": "Quiche" }]
        }))
        .unwrap();
        assert_eq!(response.first_message(), Some("Omelette"));

        let response: ChatResponse =
            serde_json::from_value(json!({ "systemMessage": "Frittata" })).unwrap();
        assert_eq!(response.first_message(), Some("Frittata"));

        let response: ChatResponse = serde_json::from_value(json!({ "messages": [{}] })).unwrap();
        assert_eq!(response.first_message(), None);
    }

    #[tokio::test]
    async fn test_chat_posts_token_and_message() {
        let mut server = Server::new_async().await;
        let request = ChatRequest::new("fridge", "What can I cook?");

        let mock = server
            .mock("POST", "/applications/fridge/conversations")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer key")
            .match_body(Matcher::Json(json!({
                "clientToken": request.client_token.to_string(),
                "userMessage": "What can I cook?"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "messages": [{ "content": "Pancakes" }] }"#)
            .create_async()
            .await;

        let client = HttpCompletionClient::new(
            reqwest::Client::new(),
            format!("{}/", server.url()),
            Some("key".to_string()),
        );
        let response = client.chat(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.first_message(), Some("Pancakes"));
    }

    #[tokio::test]
    async fn test_chat_surfaces_upstream_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/applications/fridge/conversations")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = HttpCompletionClient::new(reqwest::Client::new(), server.url(), None);
        let result = client.chat(&ChatRequest::new("fridge", "hi")).await;

        assert!(matches!(result, Err(PantryError::Http(_))));
    }
}
