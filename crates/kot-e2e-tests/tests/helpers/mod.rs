//! Shared test harness for E2E tests.
//!
//! Runs the real engine over the real HTTP client against a wiremock
//! kitchen server, so every test crosses the protocol, client and engine
//! crates.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kot_client::{ClientConfig, HttpKitchenApi, MemoryTokenStore};
use kot_engine::{
    EngineEvent, EngineSettings, NotificationLevel, RecordingAlert, ReconciliationEngine,
};

pub const KITCHEN_VIEW: &str = "/api/kot/kitchen-view";

/// Engine + HTTP client + mock kitchen server.
pub struct TestHarness {
    pub server: MockServer,
    /// Session token shared with the HTTP client.
    pub tokens: Arc<MemoryTokenStore>,
    pub engine: Arc<ReconciliationEngine>,
    /// Counts new-order alert playbacks.
    pub alert: Arc<RecordingAlert>,
    pub event_rx: broadcast::Receiver<EngineEvent>,
}

impl TestHarness {
    /// Logged-in harness with default settings.
    pub async fn new() -> Self {
        Self::with_settings(EngineSettings::default()).await
    }

    pub async fn with_settings(settings: EngineSettings) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(MemoryTokenStore::new("e2e-token"));
        let config = ClientConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_secs: 2,
            token_path: None,
        };
        let api = HttpKitchenApi::new(&config, tokens.clone()).unwrap();
        let alert = Arc::new(RecordingAlert::new());
        let engine = Arc::new(ReconciliationEngine::new(
            Arc::new(api),
            Box::new(alert.clone()),
            settings,
        ));
        let event_rx = engine.subscribe();

        Self {
            server,
            tokens,
            engine,
            alert,
            event_rx,
        }
    }

    /// Replace every mounted route with a kitchen view answering `body`.
    pub async fn serve_kitchen(&self, body: Value) {
        self.server.reset().await;
        self.mount_kitchen(ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Replace every mounted route with a kitchen view answering `status`.
    pub async fn serve_kitchen_error(&self, status: u16, body: Value) {
        self.server.reset().await;
        self.mount_kitchen(ResponseTemplate::new(status).set_body_json(body))
            .await;
    }

    pub async fn mount_kitchen(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(KITCHEN_VIEW))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Answer the next kitchen-view request slowly with `first`, and every
    /// later one immediately with `rest`.
    pub async fn serve_kitchen_slow_then_fast(&self, first: Value, delay: Duration, rest: Value) {
        self.server.reset().await;
        Mock::given(method("GET"))
            .and(path(KITCHEN_VIEW))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(first)
                    .set_delay(delay),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(KITCHEN_VIEW))
            .respond_with(ResponseTemplate::new(200).set_body_json(rest))
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has received for `route`.
    pub async fn requests_to(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }

    pub async fn kitchen_requests(&self) -> usize {
        self.requests_to(KITCHEN_VIEW).await
    }

    /// Drain all pending engine events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Drain events and return the notification texts at `level`.
    pub fn notifications(&mut self, level: NotificationLevel) -> Vec<String> {
        self.drain_events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::Notification { level: l, message } if l == level => Some(message),
                _ => None,
            })
            .collect()
    }
}

/// A ticket as the server serializes it.
pub fn ticket(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "status": status,
        "kotNumber": format!("KOT-{id}"),
        "roomNumber": "101",
        "items": [{"name": "Masala Chai", "quantity": 2}],
        "printStatus": "printed"
    })
}

/// Categorized kitchen-view data for `(id, status)` pairs.
pub fn kitchen_data(tickets: &[(&str, &str)]) -> Value {
    let mut data = json!({
        "pending": [], "preparing": [], "ready": [], "served": [], "cancelled": [], "all": []
    });
    for (id, status) in tickets {
        let t = ticket(id, status);
        data[*status].as_array_mut().unwrap().push(t.clone());
        data["all"].as_array_mut().unwrap().push(t);
    }
    data
}

/// Full successful kitchen-view body without printer fields.
pub fn kitchen_body(tickets: &[(&str, &str)]) -> Value {
    json!({"success": true, "data": kitchen_data(tickets)})
}
