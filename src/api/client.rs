use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use crate::api::{decode_history, decode_scan, ScanSource};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{PricePoint, ScanSnapshot};
use crate::validation::{validate_base_url, validate_ticker};

/// HTTP client for the screening service.
#[derive(Debug, Clone)]
pub struct ScannerClient {
    client: Client,
    base_url: String,
}

impl ScannerClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        validate_base_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!("Scanner client targeting {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scan_url(&self) -> String {
        format!("{}/scan", self.base_url)
    }

    pub fn history_url(&self, ticker: &str) -> String {
        format!("{}/history/{}", self.base_url, ticker)
    }

    async fn get_body(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Protocol {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ScanSource for ScannerClient {
    async fn fetch_scan(&self) -> Result<ScanSnapshot> {
        let body = self.get_body(&self.scan_url()).await?;
        let snapshot = decode_scan(&body)?;
        debug!(
            "Scan decoded: {} candidates, {} rejected",
            snapshot.candidates.len(),
            snapshot.rejected.len()
        );
        Ok(snapshot)
    }

    async fn fetch_history(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        validate_ticker(ticker)?;
        let body = self.get_body(&self.history_url(ticker)).await?;
        decode_history(&body)
    }
}
