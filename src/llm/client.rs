use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

/// Gemini REST client. The API key travels as the `key` query parameter.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Turns a non-2xx reply into `UpstreamStatus`, keeping the body for the logs.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::UpstreamStatus {
            status: status.as_u16(),
            body,
        })
    }
}

// reqwest errors carry the request URL, which holds the API key.
fn network_error(e: reqwest::Error) -> Error {
    Error::Network(e.without_url())
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!(
            model = %self.model,
            turns = request.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check_status(response).await?;
        let body: GenerateContentResponse = response.json().await.map_err(network_error)?;

        debug!(
            "Received generateContent response with {} candidates",
            body.candidates.len()
        );

        Ok(body)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.models_url())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check_status(response).await?;
        let body: ListModelsResponse = response.json().await.map_err(network_error)?;

        debug!("Upstream lists {} models", body.models.len());

        Ok(body.models)
    }
}
