//! Sanity HTTP Query Client
//!
//! Runs GROQ queries through the content store's HTTP query endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use super::error::ContentError;
use super::store::{ContentStore, QueryParams};
use crate::config::ContentConfig;

/// Content store client backed by the Sanity query API
pub struct SanityClient {
    client: Client,
    config: ContentConfig,
    base_url: String,
}

impl SanityClient {
    /// Create a client for the configured project
    pub fn new(config: ContentConfig) -> Result<Self, ContentError> {
        if config.project_id.trim().is_empty() {
            return Err(ContentError::InvalidConfig(
                "project_id must be set".to_string(),
            ));
        }

        let base_url = Self::project_base_url(&config);
        Self::with_base_url(config, base_url)
    }

    /// Create a client pointed at an explicit base URL (proxies, local stubs)
    pub fn with_base_url(
        config: ContentConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("realty-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `https://{project}.api.sanity.io`, or the CDN host for anonymous reads
    fn project_base_url(config: &ContentConfig) -> String {
        let host = if config.use_cdn && config.token.is_none() {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!("https://{}.{}", config.project_id, host)
    }

    /// Full query endpoint for the configured dataset
    pub fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.base_url,
            self.config.api_version.trim_start_matches('v'),
            self.config.dataset
        )
    }

    /// Query-string pairs: the GROQ text, perspective, and `$name` JSON params
    fn encode_params(&self, groq: &str, params: &QueryParams) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(params.iter().count() + 2);
        pairs.push(("query".to_string(), groq.to_string()));
        if !self.config.perspective.is_empty() {
            pairs.push(("perspective".to_string(), self.config.perspective.clone()));
        }
        for (name, value) in params.iter() {
            pairs.push((format!("${}", name), value.to_string()));
        }
        pairs
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn query(&self, groq: &str, params: &QueryParams) -> Result<Value, ContentError> {
        let started = Instant::now();

        let mut request = self
            .client
            .get(self.query_url())
            .query(&self.encode_params(groq, params));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ContentError::from_transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or(text);
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: QueryResponse = response.json().await.map_err(ContentError::from_transport)?;

        tracing::trace!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            server_ms = body.ms.unwrap_or_default(),
            "Content query completed"
        );

        Ok(body.result)
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    description: Option<String>,
}
