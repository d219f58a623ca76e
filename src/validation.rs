use crate::error::{Result, Error};

const MAX_TICKER_LEN: usize = 16;

/// Tickers end up as a URL path segment, so only the characters the
/// screening universe actually uses are allowed (`BRK-B`, `^GSPC`, `EURUSD=X`).
pub fn validate_ticker(ticker: &str) -> Result<()> {
    if ticker.is_empty() {
        return Err(Error::Validation("Ticker cannot be empty".to_string()));
    }
    if ticker.len() > MAX_TICKER_LEN {
        return Err(Error::Validation(format!("Ticker is too long: {}", ticker)));
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(Error::Validation(format!(
            "Ticker contains unsupported characters: {}",
            ticker
        )));
    }
    Ok(())
}

pub fn validate_base_url(base_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|e| Error::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::Config(format!(
            "Base URL must use http or https, got {}",
            scheme
        ))),
    }
}

pub fn validate_risk_per_trade(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Config(format!(
            "Risk per trade must be a non-negative amount, got {}",
            amount
        )));
    }
    Ok(())
}
