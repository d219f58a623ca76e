use serde::Serialize;
use log::{debug, warn};
use crate::error::Error;
use crate::models::{Candidate, PricePoint};
use crate::store::ApplyOutcome;
use crate::utils::{format_price, or_placeholder, present};

pub mod levels;

pub use levels::{price_domain, reference_levels, LevelKind, PriceDomain, ReferenceLevel, DOMAIN_PADDING};

pub const LOADING_MESSAGE: &str = "Loading Chart Data...";
pub const EMPTY_MESSAGE: &str = "No Price Data Available";

/// Ties a history response to the selection that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    generation: u64,
    ticker: String,
}

impl HistoryTicket {
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    Loading,
    Ready(Vec<PricePoint>),
    /// Fetch failed or returned no bars.
    Empty,
}

#[derive(Debug, Clone)]
struct Selection {
    generation: u64,
    candidate: Candidate,
    chart: ChartState,
}

/// Price chart shown for the selected ticker.
///
/// Each selection gets a new generation; a response is applied only while
/// its generation is still the open one. Closing also bumps the generation,
/// so nothing can reopen a closed overlay.
#[derive(Debug, Default)]
pub struct DetailOverlay {
    generation: u64,
    selection: Option<Selection>,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_some()
    }

    pub fn ticker(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.candidate.ticker.as_str())
    }

    pub fn chart(&self) -> Option<&ChartState> {
        self.selection.as_ref().map(|s| &s.chart)
    }

    /// Opens (or switches) the overlay. The previous series is dropped.
    pub fn open(&mut self, candidate: Candidate) -> HistoryTicket {
        self.generation += 1;
        let ticket = HistoryTicket {
            generation: self.generation,
            ticker: candidate.ticker.clone(),
        };
        if let Some(previous) = &self.selection {
            debug!("Overlay switching from {} to {}", previous.candidate.ticker, candidate.ticker);
        }
        self.selection = Some(Selection {
            generation: self.generation,
            candidate,
            chart: ChartState::Loading,
        });
        ticket
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.selection = None;
    }

    pub fn is_current(&self, ticket: &HistoryTicket) -> bool {
        self.selection
            .as_ref()
            .map_or(false, |s| s.generation == ticket.generation)
    }

    pub fn complete(
        &mut self,
        ticket: &HistoryTicket,
        result: Result<Vec<PricePoint>, Error>,
    ) -> ApplyOutcome {
        if !self.is_current(ticket) {
            debug!("Dropping history for {} (selection #{} superseded)", ticket.ticker, ticket.generation);
            return ApplyOutcome::Stale;
        }
        let Some(selection) = self.selection.as_mut() else {
            return ApplyOutcome::Stale;
        };

        match result {
            Ok(points) if points.is_empty() => {
                selection.chart = ChartState::Empty;
                ApplyOutcome::Applied
            }
            Ok(points) => {
                selection.chart = ChartState::Ready(points);
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!("History for {} failed ({}): {}", ticket.ticker, e.kind(), e);
                selection.chart = ChartState::Empty;
                ApplyOutcome::Failed
            }
        }
    }

    /// Replaces the candidate behind an open overlay with its version from a
    /// newer scan so the reference levels track the server. The loaded series
    /// is kept.
    pub fn refresh_candidate(&mut self, candidate: &Candidate) {
        if let Some(selection) = self.selection.as_mut() {
            if selection.candidate.ticker == candidate.ticker {
                selection.candidate = candidate.clone();
            }
        }
    }

    pub fn model(&self) -> Option<OverlayModel> {
        self.selection.as_ref().map(OverlayModel::from_selection)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFooter {
    pub stop_loss: String,
    pub target_entry: String,
    pub shares: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub close: f64,
    pub sma_50: Option<f64>,
}

/// Everything a renderer needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayModel {
    pub ticker: String,
    pub interval_label: &'static str,
    pub series: Vec<SeriesPoint>,
    pub levels: Vec<ReferenceLevel>,
    pub domain: Option<PriceDomain>,
    /// Set while there is no series to draw.
    pub placeholder: Option<&'static str>,
    pub footer: OverlayFooter,
}

impl OverlayModel {
    fn from_selection(selection: &Selection) -> Self {
        let candidate = &selection.candidate;
        let levels = reference_levels(candidate);
        let (series, placeholder) = match &selection.chart {
            ChartState::Loading => (Vec::new(), Some(LOADING_MESSAGE)),
            ChartState::Empty => (Vec::new(), Some(EMPTY_MESSAGE)),
            ChartState::Ready(points) => (
                points
                    .iter()
                    .map(|p| SeriesPoint { date: p.date.clone(), close: p.close, sma_50: p.sma_50 })
                    .collect(),
                None,
            ),
        };
        let domain = match &selection.chart {
            ChartState::Ready(points) => price_domain(points, &levels, DOMAIN_PADDING),
            _ => None,
        };

        Self {
            ticker: candidate.ticker.clone(),
            interval_label: "Daily",
            series,
            levels,
            domain,
            placeholder,
            footer: OverlayFooter {
                stop_loss: or_placeholder(present(candidate.stop_price()), format_price),
                target_entry: or_placeholder(present(candidate.signal_price()), format_price),
                shares: or_placeholder(candidate.shares().filter(|s| *s != 0), |s| s.to_string()),
            },
        }
    }
}
