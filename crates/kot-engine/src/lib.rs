//! Kitchen order ticket (KOT) dashboard engine.
//!
//! Polls the kitchen view, reconciles each snapshot into dashboard state,
//! sounds an alert once per newly arrived pending ticket, and exposes the
//! staff actions (status change, printer test, manual refresh).

pub mod alert;
pub mod config;
pub mod console;
pub mod engine;
pub mod events;
pub mod scheduler;
pub mod seen;

pub use alert::{AlertError, AlertSink, RecordingAlert, SilentAlert, TerminalBell};
pub use config::MonitorConfig;
pub use engine::{ActionOutcome, DashboardView, EngineSettings, PollOutcome, ReconciliationEngine};
pub use events::{EngineEvent, NotificationLevel};
pub use seen::SeenAlertSet;
