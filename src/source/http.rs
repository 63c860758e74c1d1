// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Remote job API client.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::{JobDescriptor, JobSource};
use crate::error::SourceError;

/// Default job API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.music.ai/v1";

/// Client for the analysis job API
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpSource {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Descriptor URL for a job id
    pub fn job_url(&self, id: &str) -> String {
        format!("{}/job/{}", self.base_url, id)
    }

    async fn get_json(&self, url: &str, authorized: bool) -> Result<Value, SourceError> {
        debug!(url, "GET");
        let mut request = self.http.get(url);
        if authorized {
            request = request.header(reqwest::header::AUTHORIZATION, &self.api_key);
        }

        let response = request.send().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| SourceError::Json {
            origin: url.to_string(),
            source,
        })
    }
}

impl JobSource for HttpSource {
    async fn get_job(&self, id: &str) -> Result<JobDescriptor, SourceError> {
        let url = self.job_url(id);
        let value = self.get_json(&url, true).await?;
        serde_json::from_value(value).map_err(|source| SourceError::Json { origin: url, source })
    }

    /// Stream locations are pre-signed, so no credentials are sent
    async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        self.get_json(url, false).await
    }
}
