use async_trait::async_trait;
use crate::error::Result;
use crate::models::{PricePoint, ScanSnapshot};

pub mod client;
pub mod types;

pub use client::ScannerClient;
pub use types::{decode_history, decode_scan, ScanPayload, StructuredScan};

/// The screening service as seen by the rest of the client.
///
/// Implementations make exactly one request per call. Retrying is the
/// poll scheduler's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanSource: Send + Sync {
    async fn fetch_scan(&self) -> Result<ScanSnapshot>;
    async fn fetch_history(&self, ticker: &str) -> Result<Vec<PricePoint>>;
}
