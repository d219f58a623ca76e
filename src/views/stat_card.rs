use serde::Serialize;
use crate::store::ScanMetrics;
use crate::utils::format_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub sub_value: &'static str,
    pub trend: Trend,
}

pub fn stat_cards(metrics: &ScanMetrics) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Capital at Risk (Potential)",
            value: format_money(metrics.capital_at_risk),
            sub_value: "2% per trade",
            trend: Trend::Up,
        },
        StatCard {
            title: "Active Buy Signals",
            value: metrics.buy_count.to_string(),
            sub_value: "Breakout confirmed",
            trend: if metrics.buy_count > 0 { Trend::Up } else { Trend::Neutral },
        },
        StatCard {
            title: "Setup Watchlist",
            value: metrics.setup_count.to_string(),
            sub_value: "In Consolidation",
            trend: Trend::Neutral,
        },
    ]
}
