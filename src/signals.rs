use serde::Serialize;
use crate::models::SignalStatus;

/// Presentation of a signal status: what the badge says and how it is tinted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub color_class: &'static str,
}

pub const BUY_CLASS: &str = "text-emerald-400 bg-emerald-500/10 border-emerald-500/20";
pub const SETUP_CLASS: &str = "text-cyan-400 bg-cyan-500/10 border-cyan-500/20";
pub const NEUTRAL_CLASS: &str = "text-slate-400 bg-slate-500/10 border-slate-500/20";

/// Maps any status string to a badge. Total: unknown statuses get the
/// neutral tint and keep their own text as the label.
pub fn classify(status: &str) -> Badge {
    classify_status(&SignalStatus::from(status))
}

pub fn classify_status(status: &SignalStatus) -> Badge {
    let color_class = match status {
        SignalStatus::Buy => BUY_CLASS,
        SignalStatus::Setup => SETUP_CLASS,
        SignalStatus::Wait | SignalStatus::Other(_) => NEUTRAL_CLASS,
    };
    Badge {
        label: status.as_str().to_string(),
        color_class,
    }
}
