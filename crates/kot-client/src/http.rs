//! `reqwest`-backed kitchen API client.
//!
//! Attaches `Authorization: Bearer <token>` from the token store to every
//! request and maps responses onto `ApiError`:
//! - 401 clears the token and yields `Unauthorized`
//! - other non-2xx yields `Status` with the body's `message`, if any
//! - `success: false` on a 2xx yields `Rejected`
//!
//! Ids are appended as single percent-encoded path segments.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use kot_protocol::{
    ApiEnvelope, ErrorBody, KitchenView, KitchenViewResponse, PrinterTestResult,
    StatusUpdateRequest, TicketStatus, TicketUpdate, paths,
};

use crate::api::KitchenApi;
use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Kitchen API client over HTTP.
pub struct HttpKitchenApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    tokens: Arc<dyn TokenStore>,
}

impl HttpKitchenApi {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::Client(format!("invalid base URL {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Client(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            timeout,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn bearer(&self) -> ApiResult<String> {
        self.tokens.token().ok_or(ApiError::NotAuthenticated)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("kitchen API returned 401, clearing session token");
            self.tokens.clear();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), message = %message, "kitchen API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

fn rejected(message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected(
        message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    )
}

#[async_trait]
impl KitchenApi for HttpKitchenApi {
    async fn kitchen_view(&self) -> ApiResult<KitchenView> {
        let token = self.bearer()?;
        let mut url = self.url(&paths::kitchen_view());
        let (key, value) = paths::KITCHEN_VIEW_QUERY;
        url.query_pairs_mut().append_pair(key, value);
        let request = self.client.get(url).bearer_auth(token);
        let body: KitchenViewResponse = self.send(request).await?;

        if !body.success {
            return Err(rejected(body.message, "Failed to load kitchen orders"));
        }
        let snapshot = body
            .data
            .ok_or_else(|| ApiError::Decode("kitchen view has no data".into()))?;

        Ok(KitchenView {
            snapshot,
            printer_health: body.printer_health,
            print_stats: body.print_stats,
            notifications: body.notifications,
        })
    }

    async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> ApiResult<TicketUpdate> {
        let token = self.bearer()?;
        let request = self
            .client
            .put(self.url(&paths::ticket_status(ticket_id)))
            .bearer_auth(token)
            .json(&StatusUpdateRequest { status });
        let body: ApiEnvelope<TicketUpdate> = self.send(request).await?;

        if !body.success {
            return Err(rejected(body.message, "Failed to update KOT status"));
        }
        Ok(body.data.unwrap_or_default())
    }

    async fn test_printer(&self, printer_id: &str) -> ApiResult<PrinterTestResult> {
        let token = self.bearer()?;
        let request = self
            .client
            .post(self.url(&paths::printer_test(printer_id)))
            .bearer_auth(token);
        let body: ApiEnvelope<PrinterTestResult> = self.send(request).await?;

        if !body.success {
            return Err(rejected(body.message, "Printer test failed"));
        }
        body.data
            .ok_or_else(|| ApiError::Decode("printer test response has no data".into()))
    }
}
