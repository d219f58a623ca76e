use serde::Serialize;
use crate::models::{Candidate, PricePoint};
use crate::utils::present;

/// Default headroom added above and below the plotted range.
pub const DOMAIN_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelKind {
    Breakout,
    Stop,
}

/// A horizontal reference line drawn across the price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLevel {
    pub kind: LevelKind,
    pub value: f64,
    pub label: &'static str,
    pub color: &'static str,
    pub dashed: bool,
}

impl ReferenceLevel {
    pub fn breakout(value: f64) -> Self {
        Self {
            kind: LevelKind::Breakout,
            value,
            label: "Breakout",
            color: "#fbbf24",
            dashed: true,
        }
    }

    pub fn stop(value: f64) -> Self {
        Self {
            kind: LevelKind::Stop,
            value,
            label: "Stop",
            color: "#f43f5e",
            dashed: false,
        }
    }

    /// Signed distance from `price` to this level, as a fraction of `price`.
    pub fn distance_from(&self, price: f64) -> Option<f64> {
        if !price.is_finite() || price == 0.0 {
            return None;
        }
        Some((self.value - price) / price)
    }
}

/// Levels computed upstream for this candidate. Missing, zero or
/// non-finite values produce no line.
pub fn reference_levels(candidate: &Candidate) -> Vec<ReferenceLevel> {
    let mut levels = Vec::with_capacity(2);
    if let Some(value) = present(candidate.signal_price()) {
        levels.push(ReferenceLevel::breakout(value));
    }
    if let Some(value) = present(candidate.stop_price()) {
        levels.push(ReferenceLevel::stop(value));
    }
    levels
}

/// Vertical extent of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceDomain {
    pub min: f64,
    pub max: f64,
}

impl PriceDomain {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` from the bottom of the chart, 0.0 to 1.0.
    pub fn position(&self, value: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Smallest range holding every close, every 50 SMA value and every
/// reference level, widened by `padding` of its span on both sides.
///
/// A reference level far outside the recent price action still gets drawn,
/// which is the point of the overlay. Returns `None` when there is nothing
/// to plot.
pub fn price_domain(points: &[PricePoint], levels: &[ReferenceLevel], padding: f64) -> Option<PriceDomain> {
    let values = points
        .iter()
        .flat_map(|p| std::iter::once(p.close).chain(p.sma_50))
        .chain(levels.iter().map(|l| l.value))
        .filter(|v| v.is_finite());

    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    let span = max - min;
    // A flat series still needs some height.
    let pad = if span > 0.0 { span * padding } else { max.abs().max(1.0) * padding };
    Some(PriceDomain {
        min: min - pad,
        max: max + pad,
    })
}
