//! Line-oriented operator console for `kot-monitor`.
//!
//! Commands:
//!
//! ```text
//! refresh                      poll now
//! status <ticketId> <status>   request a status change
//! test <printerId>             send a test print
//! auto on|off                  toggle auto-refresh
//! dismiss                      clear the error banner
//! view                         print the dashboard
//! quit                         end the session
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tokio::task::JoinSet;

use kot_protocol::{ParseStatusError, TicketStatus};

use crate::engine::{DashboardView, ReconciliationEngine};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Refresh,
    SetStatus {
        ticket_id: String,
        status: TicketStatus,
    },
    TestPrinter {
        printer_id: String,
    },
    AutoRefresh(bool),
    Dismiss,
    View,
    Quit,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Status(#[from] ParseStatusError),
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("refresh" | "r", []) => ConsoleCommand::Refresh,
        ("status" | "s", [ticket_id, status]) => ConsoleCommand::SetStatus {
            ticket_id: (*ticket_id).to_string(),
            status: status.parse()?,
        },
        ("status" | "s", _) => return Err(ConsoleError::Usage("status <ticketId> <status>")),
        ("test", [printer_id]) => ConsoleCommand::TestPrinter {
            printer_id: (*printer_id).to_string(),
        },
        ("test", _) => return Err(ConsoleError::Usage("test <printerId>")),
        ("auto", ["on"]) => ConsoleCommand::AutoRefresh(true),
        ("auto", ["off"]) => ConsoleCommand::AutoRefresh(false),
        ("auto", _) => return Err(ConsoleError::Usage("auto on|off")),
        ("dismiss", []) => ConsoleCommand::Dismiss,
        ("view" | "v", []) => ConsoleCommand::View,
        ("quit" | "exit" | "q", []) => ConsoleCommand::Quit,
        ("help" | "?", _) => ConsoleCommand::Help,
        _ => return Err(ConsoleError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}

/// Read commands from `input` until `quit` or end of input, then shut the
/// engine down.
///
/// Refreshes and staff actions run as tasks so the console keeps reading
/// while they are in flight. Tasks still running at exit are aborted.
pub async fn run<R>(
    engine: Arc<ReconciliationEngine>,
    auto_refresh: watch::Sender<bool>,
    input: R,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut actions = JoinSet::new();

    loop {
        while actions.try_join_next().is_some() {}

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("console input closed");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read console input");
                break;
            }
        };

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        tracing::debug!(?command, "console command");
        match command {
            ConsoleCommand::Refresh => {
                let engine = engine.clone();
                actions.spawn(async move {
                    engine.refresh().await;
                });
            }
            ConsoleCommand::SetStatus { ticket_id, status } => {
                let engine = engine.clone();
                actions.spawn(async move {
                    engine.set_status(&ticket_id, status).await;
                });
            }
            ConsoleCommand::TestPrinter { printer_id } => {
                let engine = engine.clone();
                actions.spawn(async move {
                    engine.test_printer(&printer_id).await;
                });
            }
            ConsoleCommand::AutoRefresh(enabled) => {
                auto_refresh.send_replace(enabled);
            }
            ConsoleCommand::Dismiss => engine.dismiss_error().await,
            ConsoleCommand::View => print!("{}", render(&engine.view().await)),
            ConsoleCommand::Help => print!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    engine.shutdown();
    actions.shutdown().await;
}

const HELP: &str = "\
commands:
  refresh                      poll now
  status <ticketId> <status>   pending|preparing|ready|served|cancelled
  test <printerId>             send a test print
  auto on|off                  toggle auto-refresh
  dismiss                      clear the error banner
  view                         show the dashboard
  quit                         end the session
";

/// Plain-text rendering of the dashboard.
pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();
    let now = Utc::now();
    let c = view.counts;

    let _ = writeln!(
        out,
        "total {} | pending {} | preparing {} | ready {} | served {} | cancelled {}",
        c.total, c.pending, c.preparing, c.ready, c.served, c.cancelled
    );
    match view.last_updated {
        Some(at) => {
            let _ = writeln!(out, "updated {}", at.format("%H:%M:%S"));
        }
        None => {
            let _ = writeln!(out, "not loaded yet");
        }
    }
    if let Some(banner) = &view.printer_banner {
        let _ = writeln!(out, "[printer {:?}] {}", banner.level, banner.message);
    }
    if let Some(stats) = view.print_stats.filter(|s| s.failed > 0) {
        let _ = writeln!(out, "[print] {} failed of {}", stats.failed, stats.total);
    }
    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "[error] {error}");
    }

    for status in [
        TicketStatus::Pending,
        TicketStatus::Preparing,
        TicketStatus::Ready,
    ] {
        for ticket in view.snapshot.bucket(status) {
            let minutes = ticket
                .time_in_status(now)
                .map_or(0, |elapsed| elapsed.num_minutes());
            let room = ticket.room_number.as_deref().unwrap_or("-");
            let _ = writeln!(
                out,
                "{:<10} {:<12} room {:<6} items {:<3} {}m  [{}]",
                status.as_str(),
                ticket.kot_number,
                room,
                ticket.item_count(),
                minutes,
                ticket.id
            );
        }
    }
    out
}
