//! HTTP client for the kitchen order ticket (KOT) API.
//!
//! - `KitchenApi` trait for the three kitchen calls (mockable in tests)
//! - `HttpKitchenApi` backed by `reqwest` with bearer auth and a bounded timeout
//! - `TokenStore` for the ambient session token (memory or file backed)
//! - `MockKitchenApi` with scripted responses for engine tests

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;

// Re-exports for convenience.
pub use api::KitchenApi;
pub use auth::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use http::HttpKitchenApi;
pub use mock::{ApiCall, MockKitchenApi};
