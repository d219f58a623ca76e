use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use crate::error::Error;
use crate::overlay::OverlayModel;
use crate::store::{ScanMetrics, ScanStore};

pub mod stat_card;
pub mod table;

pub use stat_card::{stat_cards, StatCard, Trend};
pub use table::{AuditRow, AuditTable, SignalRow, SignalTable};

pub const DASHBOARD_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Dashboard,
    Scanner,
    /// The screening audit log.
    Status,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Scanner, View::Status];

    pub fn id(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Scanner => "scanner",
            View::Status => "status",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Scanner => "Scanner",
            View::Status => "Status",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Scanner => "Scanner",
            View::Status => "Screening Audit",
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Scanner
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(View::Dashboard),
            "scanner" => Ok(View::Scanner),
            "status" | "audit" => Ok(View::Status),
            other => Err(Error::Validation(format!("Unknown view: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub preview: SignalTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewModel {
    Dashboard(DashboardView),
    Scanner(SignalTable),
    Audit(AuditTable),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub view: View,
    pub label: &'static str,
    pub active: bool,
}

/// One full frame: navigation, the active view and the overlay if open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub title: &'static str,
    pub market_status: &'static str,
    pub nav: Vec<NavItem>,
    pub metrics: ScanMetrics,
    pub view: ViewModel,
    pub overlay: Option<OverlayModel>,
}

/// Which view is showing. Any view can be selected from any other.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    current: View,
    preview_rows: usize,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new(DASHBOARD_PREVIEW_ROWS)
    }
}

impl ViewRouter {
    pub fn new(preview_rows: usize) -> Self {
        Self {
            current: View::default(),
            preview_rows,
        }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns the view that was showing before.
    pub fn select(&mut self, view: View) -> View {
        std::mem::replace(&mut self.current, view)
    }

    pub fn nav(&self) -> Vec<NavItem> {
        View::ALL
            .iter()
            .map(|&view| NavItem {
                view,
                label: view.nav_label(),
                active: view == self.current,
            })
            .collect()
    }

    pub fn render(&self, store: &ScanStore) -> ViewModel {
        let snapshot = store.snapshot();
        let scan_id = snapshot.fetched_at.timestamp();
        let loading = store.loading();

        match self.current {
            View::Dashboard => {
                let shown = snapshot.candidates.len().min(self.preview_rows);
                ViewModel::Dashboard(DashboardView {
                    cards: stat_cards(&store.metrics()),
                    preview: SignalTable::build(&snapshot.candidates[..shown], scan_id, loading),
                })
            }
            View::Scanner => ViewModel::Scanner(SignalTable::build(&snapshot.candidates, scan_id, loading)),
            View::Status => ViewModel::Audit(AuditTable::build(&snapshot.rejected, loading)),
        }
    }

    pub fn screen(&self, store: &ScanStore, overlay: Option<OverlayModel>) -> Screen {
        Screen {
            title: self.current.title(),
            market_status: store.snapshot().market_status.label(),
            nav: self.nav(),
            metrics: store.metrics(),
            view: self.render(store),
            overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Rejection, ScanSnapshot, SignalStatus};

    fn store_with(n: usize) -> ScanStore {
        let mut store = ScanStore::new(2000.0);
        let candidates = (0..n)
            .map(|i| Candidate::new(&format!("T{}", i), SignalStatus::Wait, i as f64 + 1.0))
            .collect();
        store.set_snapshot(ScanSnapshot::new(
            candidates,
            vec![Rejection { ticker: "FOO".into(), reason: "Downtrend".into() }],
        ));
        store
    }

    #[test]
    fn test_initial_view_is_scanner() {
        assert_eq!(ViewRouter::default().current(), View::Scanner);
    }

    #[test]
    fn test_every_transition_is_allowed() {
        let mut router = ViewRouter::default();
        for from in View::ALL {
            for to in View::ALL {
                router.select(from);
                assert_eq!(router.select(to), from);
                assert_eq!(router.current(), to);
            }
        }
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("dashboard".parse::<View>().unwrap(), View::Dashboard);
        assert_eq!(" Audit ".parse::<View>().unwrap(), View::Status);
        assert!("settings".parse::<View>().is_err());
    }

    #[test]
    fn test_dashboard_previews_first_five_without_reordering() {
        let store = store_with(8);
        let mut router = ViewRouter::default();
        router.select(View::Dashboard);

        let ViewModel::Dashboard(dashboard) = router.render(&store) else {
            panic!("expected dashboard view");
        };
        let tickers: Vec<&str> = dashboard.preview.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["T0", "T1", "T2", "T3", "T4"]);
        assert_eq!(store.snapshot().candidates.len(), 8);
        assert_eq!(store.snapshot().candidates[7].ticker, "T7");
    }

    #[test]
    fn test_dashboard_with_fewer_rows_than_preview() {
        let store = store_with(2);
        let mut router = ViewRouter::default();
        router.select(View::Dashboard);
        let ViewModel::Dashboard(dashboard) = router.render(&store) else {
            panic!("expected dashboard view");
        };
        assert_eq!(dashboard.preview.rows.len(), 2);
    }

    #[test]
    fn test_scanner_and_audit_share_the_store() {
        let store = store_with(8);
        let mut router = ViewRouter::default();

        let ViewModel::Scanner(table) = router.render(&store) else {
            panic!("expected scanner view");
        };
        assert_eq!(table.rows.len(), 8);

        router.select(View::Status);
        let ViewModel::Audit(audit) = router.render(&store) else {
            panic!("expected audit view");
        };
        assert_eq!(audit.rows.len(), 1);
    }

    #[test]
    fn test_screen_nav_marks_active_view() {
        let store = store_with(1);
        let mut router = ViewRouter::default();
        router.select(View::Status);
        let screen = router.screen(&store, None);
        assert_eq!(screen.title, "Status");
        assert_eq!(screen.market_status, "Unknown");
        let active: Vec<&str> = screen.nav.iter().filter(|n| n.active).map(|n| n.label).collect();
        assert_eq!(active, vec!["Screening Audit"]);
    }
}
