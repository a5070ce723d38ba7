use anyhow::{Context, Result};
use wreq::{Client, header};

use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::types::{Address, ViaCepResponse};
use crate::zipcode;

/// HTTP client for the ViaCEP postal code service
///
/// One `wreq::Client` is built up front and shared by every lookup.
#[derive(Clone)]
pub struct CepClient {
    http_client: Client,
    base_url: String,
}

impl CepClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let mut http_builder = Client::builder().gzip(true).brotli(true).zstd(true);

        if let Some(timeout) = config.request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        let http_client = http_builder
            .build()
            .context("Failed to build lookup HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lookup URL for an already normalized code
    pub fn lookup_url(&self, code: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url, code)
    }

    /// Resolve a normalized postal code to an address
    ///
    /// A single GET, no retries. Non-2xx statuses and unparseable bodies are
    /// reported as transport failures; the `erro` marker as `NotFound`.
    pub async fn lookup(&self, code: &str) -> Result<Address, LookupError> {
        if !zipcode::is_url_safe(code) {
            return Err(LookupError::InvalidCode {
                code: code.to_string(),
            });
        }

        let url = self.lookup_url(code);
        tracing::debug!(%url, "Requesting postal code lookup");

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: ViaCepResponse = serde_json::from_str(&body)?;
        data.into_address(code)
    }
}
