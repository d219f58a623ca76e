use crate::config::{ApiConfig, Config, DashboardConfig, PollingConfig};
use crate::models::{Candidate, Execution, Rejection, ScanSnapshot, SignalDetails, SignalStatus};

// Helper to create a default test config
pub fn create_test_config() -> Config {
    Config {
        api: ApiConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: Some(5),
        },
        polling: PollingConfig {
            refresh_interval_secs: 60,
        },
        dashboard: DashboardConfig {
            risk_per_trade: 2000.0,
            preview_rows: 5,
        },
    }
}

// Candidate with every optional metric filled in
pub fn create_test_candidate(ticker: &str, status: SignalStatus) -> Candidate {
    let mut candidate = Candidate::new(ticker, status, 120.5);
    candidate.signal_details = Some(SignalDetails {
        drawdown: Some(0.12),
        signal_price: Some(118.0),
        days_since_peak: Some(9),
        reason: Some("Tight consolidation near highs".to_string()),
    });
    candidate.execution = Some(Execution {
        atr_14: Some(4.2),
        risk_per_share: Some(6.3),
        stop_price: Some(112.5),
        stop_note: Some("1.5x ATR".to_string()),
        shares: Some(317),
        position_value: Some(38_198.5),
        trailing_stop_sma10: None,
    });
    candidate.sma_50 = Some(104.0);
    candidate
}

// One BUY, one SETUP, one WAIT and one rejection
pub fn create_test_snapshot() -> ScanSnapshot {
    ScanSnapshot::new(
        vec![
            create_test_candidate("NVDA", SignalStatus::Buy),
            create_test_candidate("MSFT", SignalStatus::Setup),
            Candidate::new("AMD", SignalStatus::Wait, 150.0),
        ],
        vec![Rejection {
            ticker: "FOO".to_string(),
            reason: "Price below 50-day SMA".to_string(),
        }],
    )
}
