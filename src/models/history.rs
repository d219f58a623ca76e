use serde::{Deserialize, Serialize};

/// One daily bar from `GET /history/{ticker}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub close: f64,
    /// Absent for the first 49 bars of a series.
    #[serde(default)]
    pub sma_50: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub volume: Option<u64>,
}

impl PricePoint {
    pub fn new(date: &str, close: f64, sma_50: Option<f64>) -> Self {
        Self {
            date: date.to_string(),
            close,
            sma_50,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }
}
