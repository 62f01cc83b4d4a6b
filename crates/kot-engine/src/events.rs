//! Events broadcast by the engine to whatever renders the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use kot_protocol::TicketCounts;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Engine output for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A kitchen view replaced the displayed snapshot.
    SnapshotApplied {
        counts: TicketCounts,
        applied_at: DateTime<Utc>,
    },

    /// Pending tickets arrived that had not been alerted for before.
    NewOrders {
        ticket_ids: Vec<String>,
        kot_numbers: Vec<String>,
    },

    /// Toast or banner text.
    Notification {
        level: NotificationLevel,
        message: String,
    },

    /// The session token is missing or was rejected; log in again.
    SessionExpired,
}

/// Log engine events until the engine is dropped.
pub async fn log_events(mut rx: broadcast::Receiver<EngineEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => log_event(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::SnapshotApplied { counts, .. } => {
            tracing::debug!(total = counts.total, pending = counts.pending, "dashboard updated");
        }
        EngineEvent::NewOrders { kot_numbers, .. } => {
            tracing::info!(kots = ?kot_numbers, "new kitchen orders");
        }
        EngineEvent::Notification { level, message } => match level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(level = ?level, "{message}")
            }
            NotificationLevel::Warning => tracing::warn!("{message}"),
            NotificationLevel::Error => tracing::error!("{message}"),
        },
        EngineEvent::SessionExpired => {
            tracing::error!("session expired; provide a fresh token to resume polling");
        }
    }
}
