use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Kitchen order ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl TicketStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Pending,
        TicketStatus::Preparing,
        TicketStatus::Ready,
        TicketStatus::Served,
        TicketStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Preparing => "preparing",
            TicketStatus::Ready => "ready",
            TicketStatus::Served => "served",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// Status changes the kitchen screen offers from this status.
    ///
    /// Advisory only: the server is the authority, and any status may be
    /// requested for any ticket.
    pub fn allowed_actions(self) -> &'static [TicketStatus] {
        match self {
            TicketStatus::Pending => &[TicketStatus::Preparing, TicketStatus::Cancelled],
            TicketStatus::Preparing => &[TicketStatus::Ready, TicketStatus::Cancelled],
            TicketStatus::Ready => &[
                TicketStatus::Served,
                TicketStatus::Preparing,
                TicketStatus::Cancelled,
            ],
            TicketStatus::Served => &[TicketStatus::Ready],
            TicketStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Cancelled)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five ticket statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ticket status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TicketStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Outcome of sending a ticket to the kitchen printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintStatus {
    Printed,
    PrintFailed,
    NoPrinter,
    NotSent,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single line on a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, alias = "note", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// When the ticket entered each status it has passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl StatusTimestamps {
    pub fn entered(&self, status: TicketStatus) -> Option<DateTime<Utc>> {
        match status {
            TicketStatus::Pending => self.pending_at,
            TicketStatus::Preparing => self.preparing_at,
            TicketStatus::Ready => self.ready_at,
            TicketStatus::Served => self.served_at,
            TicketStatus::Cancelled => self.cancelled_at,
        }
    }
}

/// Kitchen order ticket as returned by the kitchen view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Server-assigned, stable identifier.
    #[serde(alias = "_id")]
    pub id: String,
    pub status: TicketStatus,
    /// Display label, e.g. "KOT-0042".
    #[serde(default)]
    pub kot_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub items: Vec<TicketItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Guest reference (booking or guest id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
    #[serde(default)]
    pub timestamps: StatusTimestamps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub print_status: PrintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_message: Option<String>,
    #[serde(default)]
    pub print_warning: bool,
    #[serde(default)]
    pub print_attempts: u32,
}

impl Ticket {
    /// How long the ticket has been in its current status.
    ///
    /// Falls back to `created_at` when the server did not stamp the current
    /// status. Clock skew never yields a negative duration.
    pub fn time_in_status(&self, now: DateTime<Utc>) -> Option<Duration> {
        let since = self
            .timestamps
            .entered(self.status)
            .or(self.created_at)?;
        Some((now - since).max(Duration::zero()))
    }

    /// Whether an active ticket has waited longer than `threshold`.
    pub fn is_overdue(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        matches!(
            self.status,
            TicketStatus::Pending | TicketStatus::Preparing
        ) && self
            .time_in_status(now)
            .is_some_and(|elapsed| elapsed > threshold)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "665f1c2e9b1e",
            "status": "preparing",
            "kotNumber": "KOT-0042",
            "roomNumber": "204",
            "items": [
                {"name": "Masala Dosa", "quantity": 2, "note": "no onion"},
                {"name": "Filter Coffee"}
            ],
            "timestamps": {
                "pendingAt": "2026-10-16T08:00:00Z",
                "preparingAt": "2026-10-16T08:05:00Z"
            },
            "printStatus": "print_failed",
            "printMessage": "printer offline",
            "printWarning": true,
            "printAttempts": 3,
            "hotel": "ignored"
        })
    }

    #[test]
    fn deserialize_server_ticket() {
        let ticket: Ticket = serde_json::from_value(ticket_json()).unwrap();
        assert_eq!(ticket.id, "665f1c2e9b1e");
        assert_eq!(ticket.status, TicketStatus::Preparing);
        assert_eq!(ticket.kot_number, "KOT-0042");
        assert_eq!(ticket.room_number.as_deref(), Some("204"));
        assert_eq!(ticket.items[0].notes.as_deref(), Some("no onion"));
        assert_eq!(ticket.items[1].quantity, 1);
        assert_eq!(ticket.print_status, PrintStatus::PrintFailed);
        assert!(ticket.print_warning);
        assert_eq!(ticket.print_attempts, 3);
        assert_eq!(ticket.item_count(), 3);
    }

    #[test]
    fn unknown_print_status_maps_to_unknown() {
        let status: PrintStatus = serde_json::from_str(r#""queued_somewhere""#).unwrap();
        assert_eq!(status, PrintStatus::Unknown);
    }

    #[test]
    fn status_serialization() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
        assert_eq!("Ready".parse::<TicketStatus>().unwrap(), TicketStatus::Ready);
        assert!("cooking".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn allowed_actions_include_corrections() {
        assert!(
            TicketStatus::Ready
                .allowed_actions()
                .contains(&TicketStatus::Preparing)
        );
        assert_eq!(
            TicketStatus::Served.allowed_actions(),
            &[TicketStatus::Ready]
        );
        assert!(TicketStatus::Cancelled.allowed_actions().is_empty());
        assert!(TicketStatus::Cancelled.is_terminal());
        assert!(!TicketStatus::Served.is_terminal());
    }

    #[test]
    fn time_in_current_status() {
        let ticket: Ticket = serde_json::from_value(ticket_json()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 17, 0).unwrap();
        assert_eq!(ticket.time_in_status(now), Some(Duration::minutes(12)));
        assert!(ticket.is_overdue(now, Duration::minutes(10)));
        assert!(!ticket.is_overdue(now, Duration::minutes(15)));
    }

    #[test]
    fn time_in_status_falls_back_to_created_at() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": "t-1",
            "status": "pending",
            "createdAt": "2026-10-16T09:00:00Z"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 1, 30).unwrap();
        assert_eq!(ticket.time_in_status(now), Some(Duration::seconds(90)));

        let earlier = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        assert_eq!(ticket.time_in_status(earlier), Some(Duration::zero()));
    }
}
