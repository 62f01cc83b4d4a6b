//! Response envelopes for the kitchen endpoints.
//!
//! Every endpoint wraps its payload as `{ success, data, message? }`. The
//! kitchen view additionally carries printer health, print statistics and
//! kitchen notifications at the top level.

use serde::{Deserialize, Serialize};

use crate::printer::{PrintStats, PrinterHealth};
use crate::snapshot::KitchenSnapshot;
use crate::ticket::TicketStatus;

fn default_success() -> bool {
    true
}

/// Generic `{ success, data, message }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Kitchen view response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenViewResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<KitchenSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_health: Option<PrinterHealth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_stats: Option<PrintStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<KitchenNotification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Server-pushed kitchen notice, e.g. a print failure on a specific ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenNotification {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kot_id: Option<String>,
}

impl KitchenNotification {
    /// Whether the server flagged this notice as a problem.
    pub fn is_warning(&self) -> bool {
        let kind = self.kind.to_ascii_lowercase();
        kind.contains("error") || kind.contains("fail") || kind.contains("warn")
    }
}

/// A successful kitchen-view fetch, unwrapped from its envelope.
///
/// `printer_health` and `print_stats` are `None` when the server omitted
/// them; callers keep their previous values in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitchenView {
    pub snapshot: KitchenSnapshot,
    pub printer_health: Option<PrinterHealth>,
    pub print_stats: Option<PrintStats>,
    pub notifications: Vec<KitchenNotification>,
}

/// `PUT /kot/status/{id}` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: TicketStatus,
}

/// Fields of the updated ticket echoed back by a status change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}
