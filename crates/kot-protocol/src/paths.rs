//! Endpoint paths, relative to the API base URL.
//!
//! ```text
//! GET  /kot/kitchen-view?showPrintErrors=true
//! PUT  /kot/status/{ticket_id}
//! POST /kot/printers/{printer_id}/test
//! ```
//!
//! Paths are returned as unencoded segments. Ids are single segments, so the
//! HTTP client percent-encodes any `/` or `?` they contain.

const PREFIX: &str = "kot";

/// Query sent with every kitchen-view request.
pub const KITCHEN_VIEW_QUERY: (&str, &str) = ("showPrintErrors", "true");

pub fn kitchen_view() -> [&'static str; 2] {
    [PREFIX, "kitchen-view"]
}

pub fn ticket_status(ticket_id: &str) -> [&str; 3] {
    [PREFIX, "status", ticket_id]
}

pub fn printer_test(printer_id: &str) -> [&str; 4] {
    [PREFIX, "printers", printer_id, "test"]
}
