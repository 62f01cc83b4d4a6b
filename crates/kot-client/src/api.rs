//! The kitchen API seam.

use async_trait::async_trait;

use kot_protocol::{KitchenView, PrinterTestResult, TicketStatus, TicketUpdate};

use crate::error::ApiResult;

/// The three kitchen calls the reconciliation engine depends on.
///
/// Implementations own token handling: a missing token yields
/// `ApiError::NotAuthenticated` without touching the network, and a 401
/// clears the stored token before returning `ApiError::Unauthorized`.
#[async_trait]
pub trait KitchenApi: Send + Sync {
    /// `GET /kot/kitchen-view?showPrintErrors=true`
    async fn kitchen_view(&self) -> ApiResult<KitchenView>;

    /// `PUT /kot/status/{ticket_id}`
    async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> ApiResult<TicketUpdate>;

    /// `POST /kot/printers/{printer_id}/test`
    async fn test_printer(&self, printer_id: &str) -> ApiResult<PrinterTestResult>;
}
