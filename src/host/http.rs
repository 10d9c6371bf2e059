use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use super::ApiClient;

/// HTTP-backed API client with connection pooling.
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("studycircle-client/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        debug!("health check against {url}");
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("health check request to {url} failed"))?;
        Ok(response.status().is_success())
    }
}
