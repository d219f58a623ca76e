use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use super::SignalStatus;

/// Breakout context computed by the screening service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalDetails {
    #[serde(default)]
    pub drawdown: Option<f64>,
    /// Breakout level; doubles as the entry reference on charts.
    #[serde(default)]
    pub signal_price: Option<f64>,
    #[serde(default)]
    pub days_since_peak: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Suggested risk parameters computed by the screening service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub atr_14: Option<f64>,
    #[serde(default)]
    pub risk_per_share: Option<f64>,
    #[serde(default)]
    pub stop_price: Option<f64>,
    #[serde(default)]
    pub stop_note: Option<String>,
    #[serde(default)]
    pub shares: Option<i64>,
    #[serde(default)]
    pub position_value: Option<f64>,
    #[serde(default)]
    pub trailing_stop_sma10: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub ticker: String,
    pub price: f64,
    pub status: SignalStatus,
    #[serde(default)]
    pub signal_details: Option<SignalDetails>,
    #[serde(default)]
    pub execution: Option<Execution>,
    #[serde(default)]
    pub sma_50: Option<f64>,
    #[serde(default)]
    pub vol_avg: Option<f64>,
}

impl Candidate {
    pub fn new(ticker: &str, status: SignalStatus, price: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            price,
            status,
            signal_details: None,
            execution: None,
            sma_50: None,
            vol_avg: None,
        }
    }

    pub fn signal_price(&self) -> Option<f64> {
        self.signal_details.as_ref().and_then(|d| d.signal_price)
    }

    pub fn stop_price(&self) -> Option<f64> {
        self.execution.as_ref().and_then(|e| e.stop_price)
    }

    pub fn drawdown(&self) -> Option<f64> {
        self.signal_details.as_ref().and_then(|d| d.drawdown)
    }

    pub fn atr_14(&self) -> Option<f64> {
        self.execution.as_ref().and_then(|e| e.atr_14)
    }

    pub fn risk_per_share(&self) -> Option<f64> {
        self.execution.as_ref().and_then(|e| e.risk_per_share)
    }

    pub fn shares(&self) -> Option<i64> {
        self.execution.as_ref().and_then(|e| e.shares)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub ticker: String,
    pub reason: String,
}

/// Trading session state reported alongside a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    Open,
    Closed,
    Unknown,
}

impl MarketStatus {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("OPEN") => MarketStatus::Open,
            Some("CLOSED") => MarketStatus::Closed,
            _ => MarketStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketStatus::Open => "Open",
            MarketStatus::Closed => "Closed",
            MarketStatus::Unknown => "Unknown",
        }
    }
}

/// One complete scan result. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Server order, treated as relevance rank.
    pub candidates: Vec<Candidate>,
    pub rejected: Vec<Rejection>,
    pub market_status: MarketStatus,
    pub universe_size: Option<u64>,
    pub fetched_at: DateTime<Utc>,
}

impl ScanSnapshot {
    pub fn new(candidates: Vec<Candidate>, rejected: Vec<Rejection>) -> Self {
        Self {
            candidates,
            rejected,
            market_status: MarketStatus::Unknown,
            universe_size: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.rejected.is_empty()
    }

    pub fn find(&self, ticker: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.ticker == ticker)
    }

    pub fn count_status(&self, status: &SignalStatus) -> usize {
        self.candidates.iter().filter(|c| &c.status == status).count()
    }

    /// Compares everything except the fetch time.
    pub fn same_content(&self, other: &ScanSnapshot) -> bool {
        self.candidates == other.candidates
            && self.rejected == other.rejected
            && self.market_status == other.market_status
            && self.universe_size == other.universe_size
    }
}
