//! Mock kitchen API for testing without a server.
//!
//! Responses are scripted per endpoint and returned in FIFO order; every
//! call is recorded for assertions. Token semantics match the HTTP client:
//! no token means `NotAuthenticated`, a scripted `Unauthorized` clears it.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use kot_protocol::{KitchenView, PrinterTestResult, TicketStatus, TicketUpdate};

use crate::api::KitchenApi;
use crate::auth::{MemoryTokenStore, TokenStore};
use crate::error::{ApiError, ApiResult};

/// A recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    KitchenView,
    UpdateStatus {
        ticket_id: String,
        status: TicketStatus,
    },
    TestPrinter {
        printer_id: String,
    },
}

struct Scripted<T> {
    delay: Duration,
    result: ApiResult<T>,
}

/// Mock implementation of the `KitchenApi` trait.
pub struct MockKitchenApi {
    tokens: MemoryTokenStore,
    kitchen_views: Mutex<VecDeque<Scripted<KitchenView>>>,
    status_updates: Mutex<VecDeque<ApiResult<TicketUpdate>>>,
    printer_tests: Mutex<VecDeque<ApiResult<PrinterTestResult>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockKitchenApi {
    /// Create a logged-in mock with nothing scripted.
    pub fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new("test-token"))
    }

    pub fn with_tokens(tokens: MemoryTokenStore) -> Self {
        Self {
            tokens,
            kitchen_views: Mutex::new(VecDeque::new()),
            status_updates: Mutex::new(VecDeque::new()),
            printer_tests: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> &MemoryTokenStore {
        &self.tokens
    }

    /// Queue a kitchen-view result.
    pub fn queue_kitchen_view(&self, result: ApiResult<KitchenView>) {
        self.queue_kitchen_view_delayed(result, Duration::ZERO);
    }

    /// Queue a kitchen-view result that resolves after `delay`.
    pub fn queue_kitchen_view_delayed(&self, result: ApiResult<KitchenView>, delay: Duration) {
        self.kitchen_views
            .lock()
            .unwrap()
            .push_back(Scripted { delay, result });
    }

    pub fn queue_status_update(&self, result: ApiResult<TicketUpdate>) {
        self.status_updates.lock().unwrap().push_back(result);
    }

    pub fn queue_printer_test(&self, result: ApiResult<PrinterTestResult>) {
        self.printer_tests.lock().unwrap().push_back(result);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of kitchen-view fetches made so far.
    pub fn kitchen_view_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == ApiCall::KitchenView)
            .count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_token(&self) -> ApiResult<()> {
        self.tokens
            .token()
            .map(|_| ())
            .ok_or(ApiError::NotAuthenticated)
    }

    fn settle<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if matches!(result, Err(ApiError::Unauthorized)) {
            self.tokens.clear();
        }
        result
    }
}

impl Default for MockKitchenApi {
    fn default() -> Self {
        Self::new()
    }
}

fn unscripted<T>(what: &str) -> ApiResult<T> {
    Err(ApiError::Transport(format!("no scripted {what} response")))
}

#[async_trait]
impl KitchenApi for MockKitchenApi {
    async fn kitchen_view(&self) -> ApiResult<KitchenView> {
        self.check_token()?;
        self.record(ApiCall::KitchenView);
        let next = self.kitchen_views.lock().unwrap().pop_front();
        match next {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                self.settle(scripted.result)
            }
            None => unscripted("kitchen view"),
        }
    }

    async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> ApiResult<TicketUpdate> {
        self.check_token()?;
        self.record(ApiCall::UpdateStatus {
            ticket_id: ticket_id.to_string(),
            status,
        });
        let next = self.status_updates.lock().unwrap().pop_front();
        next.map_or_else(|| unscripted("status update"), |r| self.settle(r))
    }

    async fn test_printer(&self, printer_id: &str) -> ApiResult<PrinterTestResult> {
        self.check_token()?;
        self.record(ApiCall::TestPrinter {
            printer_id: printer_id.to_string(),
        });
        let next = self.printer_tests.lock().unwrap().pop_front();
        next.map_or_else(|| unscripted("printer test"), |r| self.settle(r))
    }
}
