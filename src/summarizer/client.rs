//! HTTP client for the hosted text generation service.
use async_trait::async_trait;
use log::*;
#[cfg(test)]
use mockall::automock;
use reqwest::{
    Client, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::{
    Result,
    error::ScribeError,
    summarizer::{prompt::ChatRequest, response::ProviderResponse},
};

/// Anything that can turn a chat request into a provider response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &ChatRequest) -> Result<ProviderResponse>;
}

/// Chat completion client authenticated with a bearer token.
pub struct InferenceClient {
    client: Client,
    api_url: Url,
}

impl InferenceClient {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(
        api_url: Url,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut token_value = HeaderValue::from_str(
            format!("Bearer {}", api_key.expose_secret()).as_str(),
        )?;
        token_value.set_sensitive(true);

        headers.append(AUTHORIZATION, token_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, api_url })
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate(&self, request: &ChatRequest) -> Result<ProviderResponse> {
        let response = self
            .client
            .post(self.api_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("api response: {body}");
            return Err(ScribeError::from_status(status, body.trim()));
        }

        if body.trim().is_empty() {
            return Err(ScribeError::invalid_response("empty response body"));
        }

        serde_json::from_str::<ProviderResponse>(&body).map_err(|err| {
            debug!("unrecognized api response: {body}");
            ScribeError::invalid_response(format!(
                "unrecognized response shape: {err}"
            ))
        })
    }
}
