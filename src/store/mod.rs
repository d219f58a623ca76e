use std::collections::BTreeSet;
use serde::Serialize;
use log::{debug, info, warn};
use crate::error::Error;
use crate::models::{ScanSnapshot, SignalStatus};

/// Aggregates shown on the dashboard. Always derived from the snapshot they
/// are stored next to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanMetrics {
    pub buy_count: usize,
    pub setup_count: usize,
    pub capital_at_risk: f64,
}

pub fn derive_metrics(snapshot: &ScanSnapshot, risk_per_trade: f64) -> ScanMetrics {
    let buy_count = snapshot.count_status(&SignalStatus::Buy);
    ScanMetrics {
        buy_count,
        setup_count: snapshot.count_status(&SignalStatus::Setup),
        capital_at_risk: buy_count as f64 * risk_per_trade,
    }
}

/// Issued when a scan request starts; presented again when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer response was already applied; this one was dropped.
    Stale,
    /// The request failed; held data is untouched.
    Failed,
}

#[derive(Debug, Clone)]
struct AppliedScan {
    seq: u64,
    snapshot: ScanSnapshot,
    metrics: ScanMetrics,
}

/// Single source of truth for scan data.
///
/// Mutations replace the whole snapshot together with its metrics. A
/// response is applied only when its sequence number is above the one of the
/// snapshot currently held, so overlapping polls resolve to the most recently
/// issued successful request.
#[derive(Debug)]
pub struct ScanStore {
    current: AppliedScan,
    risk_per_trade: f64,
    next_seq: u64,
    in_flight: BTreeSet<u64>,
    last_error: Option<String>,
    refreshed: bool,
}

impl ScanStore {
    pub fn new(risk_per_trade: f64) -> Self {
        let snapshot = ScanSnapshot::empty();
        let metrics = derive_metrics(&snapshot, risk_per_trade);
        Self {
            current: AppliedScan { seq: 0, snapshot, metrics },
            risk_per_trade,
            next_seq: 1,
            in_flight: BTreeSet::new(),
            last_error: None,
            refreshed: false,
        }
    }

    pub fn snapshot(&self) -> &ScanSnapshot {
        &self.current.snapshot
    }

    pub fn metrics(&self) -> ScanMetrics {
        self.current.metrics
    }

    pub fn risk_per_trade(&self) -> f64 {
        self.risk_per_trade
    }

    /// True while a request newer than the held snapshot is outstanding.
    pub fn loading(&self) -> bool {
        self.in_flight.range(self.current.seq + 1..).next().is_some()
    }

    /// Sequence number of the snapshot currently held; 0 before the first.
    pub fn applied_seq(&self) -> u64 {
        self.current.seq
    }

    /// Requests issued after the held snapshot that have not completed.
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether any snapshot has been applied since start.
    pub fn has_data(&self) -> bool {
        self.refreshed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq);
        debug!("Scan request #{} issued ({} in flight)", seq, self.in_flight.len());
        RefreshTicket(seq)
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<ScanSnapshot, Error>,
    ) -> ApplyOutcome {
        self.in_flight.remove(&ticket.0);

        match result {
            Ok(snapshot) => {
                if ticket.0 <= self.current.seq {
                    debug!(
                        "Discarding scan response #{}; snapshot #{} is newer",
                        ticket.0, self.current.seq
                    );
                    return ApplyOutcome::Stale;
                }
                self.replace(ticket.0, snapshot);
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!("Scan request #{} failed ({}): {}", ticket.0, e.kind(), e);
                self.last_error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    /// Replaces the held snapshot outright, superseding anything in flight.
    pub fn set_snapshot(&mut self, snapshot: ScanSnapshot) {
        let ticket = self.begin_refresh();
        self.complete_refresh(ticket, Ok(snapshot));
    }

    fn replace(&mut self, seq: u64, snapshot: ScanSnapshot) {
        let metrics = derive_metrics(&snapshot, self.risk_per_trade);
        info!(
            "Scan #{} applied: {} candidates ({} BUY, {} SETUP), {} rejected",
            seq,
            snapshot.candidates.len(),
            metrics.buy_count,
            metrics.setup_count,
            snapshot.rejected.len()
        );
        self.current = AppliedScan { seq, snapshot, metrics };
        // Anything issued before this one can only come back stale.
        self.in_flight = self.in_flight.split_off(&(seq + 1));
        self.last_error = None;
        self.refreshed = true;
    }
}
