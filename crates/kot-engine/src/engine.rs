//! KOT reconciliation engine.
//!
//! Owns the dashboard state for one kitchen session. Every successful poll
//! replaces the snapshot wholesale; failures leave the last good snapshot in
//! place. Staff actions are pessimistic: nothing moves locally until a
//! follow-up poll shows the server's new state.
//!
//! Overlapping polls are allowed. Each request takes a sequence number when
//! it is issued and a response is applied only if no later-issued response
//! has been applied already.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tokio_util::sync::CancellationToken;

use kot_client::{ApiError, KitchenApi};
use kot_protocol::{
    KitchenSnapshot, KitchenView, PrintStats, PrinterBanner, PrinterHealth, TicketCounts,
    TicketStatus,
};

use crate::alert::AlertSink;
use crate::events::{EngineEvent, NotificationLevel};
use crate::seen::SeenAlertSet;

const EVENT_CAPACITY: usize = 256;

/// Behaviour switches for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Warn while the server reports failed prints.
    pub print_warnings: bool,
    /// Only warn when the failed-print count changes.
    pub dedupe_print_warnings: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            print_warnings: true,
            dedupe_print_warnings: false,
        }
    }
}

/// Result of one `poll`.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The snapshot was replaced. `new_tickets` holds the ids alerted for.
    Applied { new_tickets: Vec<String> },
    /// A later-issued poll had already been applied; this response was dropped.
    Stale,
    /// The engine was shut down; nothing was applied.
    Cancelled,
    /// No token, or the server rejected it.
    Unauthenticated,
    /// The fetch failed; the previous snapshot is still displayed.
    Failed(ApiError),
}

/// Result of a staff action (`set_status`, `test_printer`).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Succeeded,
    /// The server handled the request but reported a problem.
    Warned(String),
    Failed(ApiError),
    Unauthenticated,
    Cancelled,
}

/// Read-only copy of the dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub snapshot: KitchenSnapshot,
    pub counts: TicketCounts,
    pub printer_health: Option<PrinterHealth>,
    pub print_stats: Option<PrintStats>,
    pub printer_banner: Option<PrinterBanner>,
    pub last_updated: Option<DateTime<Utc>>,
    pub refreshing: bool,
    /// Dismissible error banner from the most recent failed fetch.
    pub last_error: Option<String>,
    /// Number of tickets the new-order alert has sounded for.
    pub alerted_tickets: usize,
}

#[derive(Default)]
struct DashboardState {
    snapshot: KitchenSnapshot,
    counts: TicketCounts,
    printer_health: Option<PrinterHealth>,
    print_stats: Option<PrintStats>,
    seen: SeenAlertSet,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
    /// Highest request sequence number whose outcome has been applied.
    applied_seq: u64,
    /// Failed-print count last warned about, for deduplication.
    warned_failed: Option<u32>,
}

/// Polling and reconciliation engine for one kitchen dashboard session.
pub struct ReconciliationEngine {
    api: Arc<dyn KitchenApi>,
    alert: Box<dyn AlertSink>,
    settings: EngineSettings,
    state: RwLock<DashboardState>,
    next_seq: AtomicU64,
    /// Manual refreshes still in flight.
    refreshing: AtomicUsize,
    event_tx: broadcast::Sender<EngineEvent>,
    cancel: CancellationToken,
}

impl ReconciliationEngine {
    pub fn new(
        api: Arc<dyn KitchenApi>,
        alert: Box<dyn AlertSink>,
        settings: EngineSettings,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            alert,
            settings,
            state: RwLock::new(DashboardState::default()),
            next_seq: AtomicU64::new(0),
            refreshing: AtomicUsize::new(0),
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Receive engine events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Token cancelled when the session ends.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// End the session. Requests already in flight still complete, but
    /// their results are discarded.
    pub fn shutdown(&self) {
        tracing::info!("kitchen dashboard session closed");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        DashboardView {
            snapshot: state.snapshot.clone(),
            counts: state.counts,
            printer_health: state.printer_health.clone(),
            print_stats: state.print_stats,
            printer_banner: state.printer_health.as_ref().and_then(|h| h.banner()),
            last_updated: state.last_updated,
            refreshing: self.refreshing.load(Ordering::SeqCst) > 0,
            last_error: state.last_error.clone(),
            alerted_tickets: state.seen.len(),
        }
    }

    /// Clear the error banner.
    pub async fn dismiss_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Fetch the kitchen view and reconcile it into the dashboard.
    pub async fn poll(&self) -> PollOutcome {
        if self.cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.kitchen_view().await;

        if self.cancel.is_cancelled() {
            tracing::debug!(seq, "session closed, discarding kitchen view");
            return PollOutcome::Cancelled;
        }

        match result {
            Ok(view) => self.apply(seq, view).await,
            Err(e) if e.is_auth() => {
                self.session_expired();
                PollOutcome::Unauthenticated
            }
            Err(e) => self.record_failure(seq, e).await,
        }
    }

    /// Manual refresh: a poll that raises the `refreshing` flag until it settles.
    pub async fn refresh(&self) -> PollOutcome {
        let _refreshing = RefreshGuard::new(&self.refreshing);
        self.poll().await
    }

    /// Ask the server to move a ticket to `status`, then re-poll.
    ///
    /// Any status may be requested; the server decides whether the
    /// transition is valid.
    pub async fn set_status(&self, ticket_id: &str, status: TicketStatus) -> ActionOutcome {
        if self.cancel.is_cancelled() {
            return ActionOutcome::Cancelled;
        }
        let result = self.api.update_status(ticket_id, status).await;
        if self.cancel.is_cancelled() {
            return ActionOutcome::Cancelled;
        }

        match result {
            Ok(update) => {
                let label = update.kot_number.unwrap_or_else(|| ticket_id.to_string());
                tracing::info!(ticket_id, kot = %label, %status, "KOT status updated");
                self.notify(
                    NotificationLevel::Success,
                    format!("KOT {label} marked as {status}"),
                );
                self.poll().await;
                ActionOutcome::Succeeded
            }
            Err(e) if e.is_auth() => {
                self.session_expired();
                ActionOutcome::Unauthenticated
            }
            Err(e) => {
                tracing::warn!(ticket_id, %status, error = %e, "KOT status update failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("Failed to update KOT status: {}", failure_message(&e)),
                );
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Send a test print, then re-poll to refresh printer health whatever
    /// the outcome.
    pub async fn test_printer(&self, printer_id: &str) -> ActionOutcome {
        if self.cancel.is_cancelled() {
            return ActionOutcome::Cancelled;
        }
        let result = self.api.test_printer(printer_id).await;
        if self.cancel.is_cancelled() {
            return ActionOutcome::Cancelled;
        }

        let outcome = match result {
            Ok(test) if test.success => {
                let message = match test.details {
                    Some(details) if !details.address.is_empty() => {
                        format!("Printer test successful ({})", details.address)
                    }
                    _ => "Printer test successful".to_string(),
                };
                tracing::info!(printer_id, "printer test succeeded");
                self.notify(NotificationLevel::Success, message);
                ActionOutcome::Succeeded
            }
            Ok(test) => {
                let reason = test
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::warn!(printer_id, reason = %reason, "printer test reported failure");
                self.notify(
                    NotificationLevel::Warning,
                    format!("Printer test failed: {reason}"),
                );
                ActionOutcome::Warned(reason)
            }
            // The follow-up poll reports the expired session.
            Err(e) if e.is_auth() => ActionOutcome::Unauthenticated,
            Err(e) => {
                tracing::warn!(printer_id, error = %e, "printer test request failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("Printer test failed: {}", failure_message(&e)),
                );
                ActionOutcome::Failed(e)
            }
        };

        self.poll().await;
        outcome
    }

    async fn apply(&self, seq: u64, view: KitchenView) -> PollOutcome {
        let KitchenView {
            snapshot,
            printer_health,
            print_stats,
            notifications,
        } = view;

        let mut state = self.state.write().await;
        if self.cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        if seq <= state.applied_seq {
            tracing::debug!(seq, applied = state.applied_seq, "discarding stale kitchen view");
            return PollOutcome::Stale;
        }
        state.applied_seq = seq;

        let previous_pending = state.snapshot.pending.len();
        let (new_ids, new_kots): (Vec<String>, Vec<String>) = state
            .seen
            .unseen(&snapshot.pending)
            .into_iter()
            .map(|t| (t.id.clone(), t.kot_number.clone()))
            .unzip();
        let alert = snapshot.pending.len() > previous_pending && !new_ids.is_empty();

        state.counts = snapshot.counts();
        state.snapshot = snapshot;
        if let Some(health) = printer_health {
            state.printer_health = Some(health);
        }
        if let Some(stats) = print_stats {
            state.print_stats = Some(stats);
        }
        let now = Utc::now();
        state.last_updated = Some(now);
        state.last_error = None;

        if alert {
            state.seen.mark(new_ids.iter().cloned());
        }
        let failed_prints = self.print_warning_due(&mut state);
        let counts = state.counts;
        drop(state);

        tracing::info!(
            seq,
            total = counts.total,
            pending = counts.pending,
            preparing = counts.preparing,
            ready = counts.ready,
            "kitchen view applied"
        );
        self.emit(EngineEvent::SnapshotApplied {
            counts,
            applied_at: now,
        });

        if alert {
            self.sound_alert(&new_ids, new_kots);
        }
        if let Some(failed) = failed_prints {
            self.notify(
                NotificationLevel::Warning,
                format!("{failed} KOT(s) failed to print. Check the kitchen printer."),
            );
        }
        for notice in notifications {
            let level = if notice.is_warning() {
                NotificationLevel::Warning
            } else {
                NotificationLevel::Info
            };
            self.notify(level, notice.message);
        }

        PollOutcome::Applied {
            new_tickets: if alert { new_ids } else { Vec::new() },
        }
    }

    async fn record_failure(&self, seq: u64, error: ApiError) -> PollOutcome {
        let message = failure_message(&error);
        {
            let mut state = self.state.write().await;
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }
            if seq <= state.applied_seq {
                tracing::debug!(seq, error = %error, "ignoring failure of stale kitchen view request");
                return PollOutcome::Stale;
            }
            state.last_error = Some(message.clone());
        }

        tracing::warn!(seq, error = %error, "kitchen view fetch failed, keeping last snapshot");
        self.notify(NotificationLevel::Error, message);
        PollOutcome::Failed(error)
    }

    /// Failed-print count to warn about on this poll, if any.
    fn print_warning_due(&self, state: &mut DashboardState) -> Option<u32> {
        let failed = state.print_stats.map_or(0, |s| s.failed);
        if failed == 0 || !self.settings.print_warnings {
            state.warned_failed = None;
            return None;
        }
        if self.settings.dedupe_print_warnings && state.warned_failed == Some(failed) {
            return None;
        }
        state.warned_failed = Some(failed);
        Some(failed)
    }

    fn sound_alert(&self, ticket_ids: &[String], kot_numbers: Vec<String>) {
        match self.alert.play() {
            Ok(()) => tracing::info!(count = ticket_ids.len(), "new order alert played"),
            Err(e) => tracing::warn!(error = %e, "new order alert could not be played"),
        }
        self.emit(EngineEvent::NewOrders {
            ticket_ids: ticket_ids.to_vec(),
            kot_numbers,
        });
    }

    fn session_expired(&self) {
        tracing::warn!("kitchen session expired, login required");
        self.emit(EngineEvent::SessionExpired);
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        self.emit(EngineEvent::Notification { level, message });
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}

/// Text shown to staff for a failed call.
fn failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { message, .. } | ApiError::Rejected(message) => message.clone(),
        ApiError::Transport(_) | ApiError::Timeout { .. } | ApiError::Client(_) => {
            "Could not reach the server. Check your connection.".to_string()
        }
        ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        ApiError::NotAuthenticated | ApiError::Unauthorized => {
            "Session expired. Please log in again.".to_string()
        }
    }
}

/// Holds the `refreshing` count up for as long as a manual refresh is alive,
/// including when its future is dropped mid-poll.
struct RefreshGuard<'a>(&'a AtomicUsize);

impl<'a> RefreshGuard<'a> {
    fn new(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
