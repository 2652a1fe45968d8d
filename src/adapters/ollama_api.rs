use crate::domain::ports::MetadataSource;
use crate::utils::error::{ConvertError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ShowRequest<'a> {
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShowResponse {
    #[serde(default)]
    modelfile: String,
}

/// Reads the Modelfile through a running Ollama server (`POST /api/show`).
pub struct OllamaApi {
    client: Client,
    base_url: String,
}

impl OllamaApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataSource for OllamaApi {
    async fn fetch_modelfile(&self, model: &str) -> Result<String> {
        let url = format!("{}/api/show", self.base_url);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ShowRequest { model })
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ConvertError::ApiStatusError { status, body });
        }

        let show: ShowResponse = response.json().await?;
        if show.modelfile.trim().is_empty() {
            return Err(ConvertError::ProcessingError {
                message: format!("Ollama returned an empty Modelfile for {}", model),
            });
        }

        Ok(show.modelfile)
    }

    fn describe(&self) -> String {
        format!("{}/api/show", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_modelfile_from_api() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/show")
                .json_body(serde_json::json!({"model": "gemma2:2b"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "modelfile": "FROM gemma2:2b\nPARAMETER stop <end_of_turn>\n",
                    "parameters": "stop \"<end_of_turn>\"",
                    "details": {"family": "gemma2", "parameter_size": "2.6B"}
                }));
        });

        let api = OllamaApi::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let modelfile = api.fetch_modelfile("gemma2:2b").await.unwrap();

        api_mock.assert();
        assert!(modelfile.starts_with("FROM gemma2:2b"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/show");
            then.status(404).body(r#"{"error":"model 'nope' not found"}"#);
        });

        let api = OllamaApi::new(format!("{}/", server.base_url()), Duration::from_secs(5)).unwrap();
        match api.fetch_modelfile("nope").await {
            Err(ConvertError::ApiStatusError { status, body }) => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected ApiStatusError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_modelfile_field_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/show");
            then.status(200).json_body(serde_json::json!({"details": {}}));
        });

        let api = OllamaApi::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let result = api.fetch_modelfile("gemma2:2b").await;
        assert!(matches!(result, Err(ConvertError::ProcessingError { .. })));
    }
}
