use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::model::{AddToCartAck, ChatReply, ProductId};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to parse JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct AddToCartRequest<'a> {
    id: &'a ProductId,
}

/// HTTP client for the shopping backend. One attempt per call, no timeout.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn chat(&self, message: &str) -> Result<ChatReply, ClientError> {
        let body = self.post_json("chat", &ChatRequest { message }).await?;
        Ok(ChatReply::from_json(&body))
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, id: &ProductId) -> Result<AddToCartAck, ClientError> {
        let body = self.post_json("add_to_cart", &AddToCartRequest { id }).await?;
        Ok(AddToCartAck::from_json(&body))
    }

    async fn post_json<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, %url, "Backend request failed");
            return Err(ClientError::Status { url, status });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!(%url, ?body, "Received backend response");
        Ok(body)
    }
}
