use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{Entry, EntryClient};

pub const DEFAULT_API_URL: &str = "http://localhost:2100";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct CreateEntryRequest<'a> {
    raw_text: &'a str,
}

/// [EntryClient] backed by the Tact HTTP API.
pub struct HttpEntryClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpEntryClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn entries_url(&self) -> String {
        format!("{}/entries", self.base_url)
    }
}

#[async_trait]
impl EntryClient for HttpEntryClient {
    #[instrument(skip(self))]
    async fn create_entry(&self, raw_text: &str) -> Result<Entry> {
        let url = self.entries_url();
        debug!("Posting entry to {url}");

        let response = self
            .http
            .post(&url)
            .json(&CreateEntryRequest { raw_text })
            .send()
            .await
            .with_context(|| format!("Failed to create entry at {url}"))?;

        let response = expect_status(response, StatusCode::CREATED).await?;

        response
            .json::<Entry>()
            .await
            .context("Failed to decode created entry")
    }
}

/// Turns any status other than `expected` into an error carrying the status and the body.
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        bail!("Unexpected status {status}: {}", body.trim());
    }
    Ok(response)
}
