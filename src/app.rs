use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::ScanSource;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{PricePoint, ScanSnapshot};
use crate::overlay::{DetailOverlay, HistoryTicket};
use crate::scheduler::PollScheduler;
use crate::store::{ApplyOutcome, RefreshTicket, ScanStore};
use crate::validation::validate_ticker;
use crate::views::{Screen, View, ViewRouter};

/// Completions posted back to the event loop by fetch tasks.
#[derive(Debug)]
pub enum AppEvent {
    ScanFinished {
        ticket: RefreshTicket,
        result: Result<ScanSnapshot>,
    },
    HistoryFinished {
        ticket: HistoryTicket,
        result: Result<Vec<PricePoint>>,
    },
}

/// Operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(View),
    Open(String),
    Close,
    Refresh,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| Error::Validation("Empty command".to_string()))?
            .to_ascii_lowercase();

        let command = match verb.as_str() {
            "open" => {
                let ticker = parts
                    .next()
                    .ok_or_else(|| Error::Validation("Usage: open <TICKER>".to_string()))?;
                Command::Open(ticker.to_ascii_uppercase())
            }
            "close" => Command::Close,
            "refresh" => Command::Refresh,
            "quit" | "exit" => Command::Quit,
            view => Command::Show(view.parse()?),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Show(view) => write!(f, "{}", view),
            Command::Open(ticker) => write!(f, "open {}", ticker),
            Command::Close => f.write_str("close"),
            Command::Refresh => f.write_str("refresh"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

pub trait Renderer {
    fn render(&mut self, screen: &Screen) -> Result<()>;

    fn notice(&mut self, message: &str) -> Result<()>;
}

/// Owns all dashboard state. Every mutation happens on the task driving
/// the app; fetches run on spawned tasks and report back through `events`.
pub struct App {
    source: Arc<dyn ScanSource>,
    store: ScanStore,
    router: ViewRouter,
    overlay: DetailOverlay,
    scheduler: PollScheduler,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Scan fetches still running, by sequence number.
    scan_tasks: BTreeMap<u64, JoinHandle<()>>,
    history_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(source: Arc<dyn ScanSource>, config: &Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            store: ScanStore::new(config.dashboard.risk_per_trade),
            router: ViewRouter::new(config.dashboard.preview_rows),
            overlay: DetailOverlay::new(),
            scheduler: PollScheduler::new(config.polling.refresh_interval()),
            events_tx,
            events_rx,
            scan_tasks: BTreeMap::new(),
            history_task: None,
        }
    }

    pub fn store(&self) -> &ScanStore {
        &self.store
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    pub fn pending_scans(&self) -> usize {
        self.scan_tasks.len()
    }

    pub fn screen(&self) -> Screen {
        self.router.screen(&self.store, self.overlay.model())
    }

    /// Issues a scan request. Requests may overlap.
    pub fn request_refresh(&mut self) -> RefreshTicket {
        let ticket = self.store.begin_refresh();
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();

        let task = tokio::spawn(async move {
            let result = source.fetch_scan().await;
            if events.send(AppEvent::ScanFinished { ticket, result }).is_err() {
                debug!("Scan #{} finished after shutdown", ticket.seq());
            }
        });
        self.scan_tasks.insert(ticket.seq(), task);
        ticket
    }

    pub fn select_view(&mut self, view: View) {
        let previous = self.router.select(view);
        if previous != view {
            info!("View changed: {} -> {}", previous, view);
        }
    }

    /// Opens the overlay for a ticker from the current snapshot and starts
    /// loading its history. A pending history load is cancelled.
    pub fn select_ticker(&mut self, ticker: &str) -> Result<HistoryTicket> {
        validate_ticker(ticker)?;
        let candidate = self
            .store
            .snapshot()
            .find(ticker)
            .cloned()
            .ok_or_else(|| Error::Validation(format!("{} is not in the current scan", ticker)))?;

        self.cancel_history();
        let ticket = self.overlay.open(candidate);
        info!("Loading history for {}", ticket.ticker());

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let task_ticket = ticket.clone();
        self.history_task = Some(tokio::spawn(async move {
            let result = source.fetch_history(task_ticket.ticker()).await;
            let ticker = task_ticket.ticker().to_string();
            if events
                .send(AppEvent::HistoryFinished { ticket: task_ticket, result })
                .is_err()
            {
                debug!("History for {} finished after shutdown", ticker);
            }
        }));
        Ok(ticket)
    }

    pub fn close_overlay(&mut self) {
        self.cancel_history();
        if let Some(ticker) = self.overlay.ticker() {
            debug!("Closing overlay for {}", ticker);
        }
        self.overlay.close();
    }

    /// Aborts scan fetches that can no longer change the held snapshot.
    fn cancel_superseded_scans(&mut self) {
        let newer = self.scan_tasks.split_off(&(self.store.applied_seq() + 1));
        let superseded = std::mem::replace(&mut self.scan_tasks, newer);
        for (seq, task) in superseded {
            debug!("Aborting superseded scan #{}", seq);
            task.abort();
        }
    }

    fn cancel_history(&mut self) {
        if let Some(task) = self.history_task.take() {
            task.abort();
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> ApplyOutcome {
        match event {
            AppEvent::ScanFinished { ticket, result } => {
                self.scan_tasks.remove(&ticket.seq());
                let outcome = self.store.complete_refresh(ticket, result);
                if outcome == ApplyOutcome::Applied {
                    self.cancel_superseded_scans();
                    self.sync_overlay();
                }
                outcome
            }
            AppEvent::HistoryFinished { ticket, result } => {
                let outcome = self.overlay.complete(&ticket, result);
                if outcome != ApplyOutcome::Stale {
                    self.history_task = None;
                }
                outcome
            }
        }
    }

    fn sync_overlay(&mut self) {
        let Some(ticker) = self.overlay.ticker() else {
            return;
        };
        if let Some(candidate) = self.store.snapshot().find(ticker).cloned() {
            self.overlay.refresh_candidate(&candidate);
        }
    }

    /// Waits for the next fetch completion and applies it.
    pub async fn pump(&mut self) -> Option<ApplyOutcome> {
        let event = self.events_rx.recv().await?;
        Some(self.handle_event(event))
    }

    /// Returns false when the app should stop.
    pub fn handle_command(&mut self, command: Command) -> Result<bool> {
        debug!("Command: {}", command);
        match command {
            Command::Show(view) => self.select_view(view),
            Command::Open(ticker) => {
                self.select_ticker(&ticker)?;
            }
            Command::Close => self.close_overlay(),
            Command::Refresh => {
                self.request_refresh();
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Fetches one scan and waits for it.
    pub async fn run_once(&mut self) -> ApplyOutcome {
        let ticket = self.request_refresh();
        loop {
            match self.events_rx.recv().await {
                Some(AppEvent::ScanFinished { ticket: done, result }) if done == ticket => {
                    return self.handle_event(AppEvent::ScanFinished { ticket: done, result });
                }
                Some(other) => {
                    self.handle_event(other);
                }
                None => return ApplyOutcome::Failed,
            }
        }
    }

    /// Runs the polling loop until `quit` or Ctrl-C.
    pub async fn run<R: Renderer>(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        renderer: &mut R,
    ) -> Result<()> {
        let mut ticker = self.scheduler.start();
        let mut commands_open = true;
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!(
            "Polling scan every {}s",
            self.scheduler.period().as_secs()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let ticket = self.request_refresh();
                    debug!("Poll tick issued scan #{}", ticket.seq());
                    continue;
                }
                Some(event) = self.events_rx.recv() => {
                    if self.handle_event(event) == ApplyOutcome::Stale {
                        continue;
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(command) => match self.handle_command(command) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            warn!("Command rejected: {}", e);
                            renderer.notice(&e.to_string())?;
                            continue;
                        }
                    },
                    None => {
                        debug!("Command input closed; continuing to poll");
                        commands_open = false;
                        continue;
                    }
                },
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!("Failed to listen for Ctrl-C: {}", e);
                    }
                    break;
                }
            }

            renderer.render(&self.screen())?;
        }

        self.cancel_history();
        for (_, task) in std::mem::take(&mut self.scan_tasks) {
            task.abort();
        }
        info!("Dashboard stopped");
        Ok(())
    }
}
