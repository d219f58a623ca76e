use serde::Serialize;
use crate::models::{Candidate, Rejection};
use crate::signals::{classify_status, Badge};
use crate::utils::{format_percent, format_price, or_placeholder, present};

pub const SCANNING_MESSAGE: &str = "Scanning Universe...";
pub const NO_CANDIDATES_MESSAGE: &str = "No stocks met the criteria in this scan.";
pub const NO_REJECTIONS_MESSAGE: &str = "No rejections recorded.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRow {
    pub ticker: String,
    pub price: String,
    pub drawdown: String,
    pub atr: String,
    pub risk_per_share: String,
    pub badge: Badge,
}

impl From<&Candidate> for SignalRow {
    fn from(candidate: &Candidate) -> Self {
        Self {
            ticker: candidate.ticker.clone(),
            price: format_price(candidate.price),
            drawdown: or_placeholder(present(candidate.drawdown()), format_percent),
            atr: or_placeholder(present(candidate.atr_14()), |v| v.to_string()),
            risk_per_share: or_placeholder(present(candidate.risk_per_share()), format_price),
            badge: classify_status(&candidate.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTable {
    /// Unix seconds of the scan being shown.
    pub scan_id: i64,
    pub rows: Vec<SignalRow>,
    pub placeholder: Option<&'static str>,
}

impl SignalTable {
    /// Rows already on screen stay visible during a refresh; the loading
    /// message only replaces an empty table.
    pub fn build(candidates: &[Candidate], scan_id: i64, loading: bool) -> Self {
        let rows: Vec<SignalRow> = candidates.iter().map(SignalRow::from).collect();
        let placeholder = match (rows.is_empty(), loading) {
            (true, true) => Some(SCANNING_MESSAGE),
            (true, false) => Some(NO_CANDIDATES_MESSAGE),
            (false, _) => None,
        };
        Self { scan_id, rows, placeholder }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub ticker: String,
    pub reason: String,
}

impl From<&Rejection> for AuditRow {
    fn from(rejection: &Rejection) -> Self {
        Self {
            ticker: rejection.ticker.clone(),
            reason: rejection.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditTable {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub rows: Vec<AuditRow>,
    pub placeholder: Option<&'static str>,
}

impl AuditTable {
    pub fn build(rejected: &[Rejection], loading: bool) -> Self {
        let rows: Vec<AuditRow> = rejected.iter().map(AuditRow::from).collect();
        let placeholder = if rows.is_empty() && !loading {
            Some(NO_REJECTIONS_MESSAGE)
        } else {
            None
        };
        Self {
            title: "Screening Audit Log",
            subtitle: "Showing why stocks were rejected from the scan.",
            rows,
            placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Execution, SignalDetails, SignalStatus};
    use crate::signals::{BUY_CLASS, NEUTRAL_CLASS};
    use crate::utils::PLACEHOLDER;

    #[test]
    fn test_full_row() {
        let mut c = Candidate::new("NVDA", SignalStatus::Buy, 120.5);
        c.signal_details = Some(SignalDetails { drawdown: Some(0.123), ..Default::default() });
        c.execution = Some(Execution { atr_14: Some(4.1), risk_per_share: Some(3.25), ..Default::default() });

        let row = SignalRow::from(&c);
        assert_eq!(row.price, "$120.5");
        assert_eq!(row.drawdown, "12.3%");
        assert_eq!(row.atr, "4.1");
        assert_eq!(row.risk_per_share, "$3.25");
        assert_eq!(row.badge.color_class, BUY_CLASS);
    }

    #[test]
    fn test_missing_metrics_render_placeholder() {
        let row = SignalRow::from(&Candidate::new("BARE", SignalStatus::Other("NEW".into()), 9.0));
        assert_eq!(row.drawdown, PLACEHOLDER);
        assert_eq!(row.atr, PLACEHOLDER);
        assert_eq!(row.risk_per_share, PLACEHOLDER);
        assert_eq!(row.badge.label, "NEW");
        assert_eq!(row.badge.color_class, NEUTRAL_CLASS);
    }

    #[test]
    fn test_table_placeholders() {
        assert_eq!(SignalTable::build(&[], 0, true).placeholder, Some(SCANNING_MESSAGE));
        assert_eq!(SignalTable::build(&[], 0, false).placeholder, Some(NO_CANDIDATES_MESSAGE));

        let rows = [Candidate::new("A", SignalStatus::Wait, 1.0)];
        let table = SignalTable::build(&rows, 1_700_000_000, true);
        assert!(table.placeholder.is_none());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.scan_id, 1_700_000_000);
    }

    #[test]
    fn test_audit_table() {
        let rejected = [Rejection { ticker: "FOO".into(), reason: "Volume < 300k".into() }];
        let table = AuditTable::build(&rejected, false);
        assert_eq!(table.rows, vec![AuditRow { ticker: "FOO".into(), reason: "Volume < 300k".into() }]);
        assert!(table.placeholder.is_none());

        assert_eq!(AuditTable::build(&[], false).placeholder, Some(NO_REJECTIONS_MESSAGE));
        assert_eq!(AuditTable::build(&[], true).placeholder, None);
    }
}
