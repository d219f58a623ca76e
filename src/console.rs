use std::io::Write;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::app::{Command, Renderer};
use crate::error::Result;
use crate::overlay::OverlayModel;
use crate::views::{AuditTable, Screen, SignalTable, ViewModel};

pub const HELP: &str = "commands: dashboard | scanner | status | open <TICKER> | close | refresh | quit";

/// Plain-text frames for a terminal or log pipe.
pub struct ConsoleRenderer<W: Write> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn signal_table(&mut self, table: &SignalTable) -> Result<()> {
        writeln!(self.out, "SCAN_ID: {}", table.scan_id)?;
        writeln!(
            self.out,
            "{:<8} {:>12} {:>10} {:>8} {:>10}  {}",
            "TICKER", "PRICE", "DRAWDOWN", "ATR", "RISK/SH", "SIGNAL"
        )?;
        for row in &table.rows {
            writeln!(
                self.out,
                "{:<8} {:>12} {:>10} {:>8} {:>10}  {}",
                row.ticker, row.price, row.drawdown, row.atr, row.risk_per_share, row.badge.label
            )?;
        }
        if let Some(message) = table.placeholder {
            writeln!(self.out, "  {}", message)?;
        }
        Ok(())
    }

    fn audit_table(&mut self, table: &AuditTable) -> Result<()> {
        writeln!(self.out, "{}", table.title)?;
        writeln!(self.out, "{}", table.subtitle)?;
        for row in &table.rows {
            writeln!(self.out, "{:<8} {}", row.ticker, row.reason)?;
        }
        if let Some(message) = table.placeholder {
            writeln!(self.out, "  {}", message)?;
        }
        Ok(())
    }

    fn overlay(&mut self, model: &OverlayModel) -> Result<()> {
        writeln!(self.out, "--- {} ({}) ---", model.ticker, model.interval_label)?;
        match model.placeholder {
            Some(message) => writeln!(self.out, "  {}", message)?,
            None => {
                if let Some(domain) = &model.domain {
                    writeln!(self.out, "  range {:.2} .. {:.2}", domain.min, domain.max)?;
                }
                if let (Some(first), Some(last)) = (model.series.first(), model.series.last()) {
                    writeln!(
                        self.out,
                        "  {} bars, {} close {} -> {} close {}",
                        model.series.len(),
                        first.date,
                        first.close,
                        last.date,
                        last.close
                    )?;
                }
            }
        }
        for level in &model.levels {
            writeln!(self.out, "  {:<9} {}", level.label, level.value)?;
        }
        writeln!(
            self.out,
            "  Stop Loss {} | Target Entry {} | Shares {}",
            model.footer.stop_loss, model.footer.target_entry, model.footer.shares
        )?;
        Ok(())
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        let nav: Vec<String> = screen
            .nav
            .iter()
            .map(|item| {
                if item.active {
                    format!("[{}]", item.label)
                } else {
                    item.label.to_string()
                }
            })
            .collect();
        writeln!(self.out)?;
        writeln!(self.out, "== {} == market: {}", screen.title, screen.market_status)?;
        writeln!(self.out, "{}", nav.join(" | "))?;

        match &screen.view {
            ViewModel::Dashboard(dashboard) => {
                for card in &dashboard.cards {
                    writeln!(self.out, "{}: {} ({})", card.title, card.value, card.sub_value)?;
                }
                self.signal_table(&dashboard.preview)?;
            }
            ViewModel::Scanner(table) => self.signal_table(table)?,
            ViewModel::Audit(table) => self.audit_table(table)?,
        }

        if let Some(model) = &screen.overlay {
            self.overlay(model)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "! {}", message)?;
        writeln!(self.out, "  {}", HELP)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Reads commands from stdin, one per line. Lines that fail to parse are
/// logged and skipped. The channel closes at end of input.
pub fn spawn_command_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => {
                        if tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{} ({})", e, HELP),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
