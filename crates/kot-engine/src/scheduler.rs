//! Auto-refresh scheduler.
//!
//! Polls immediately whenever auto-refresh is (re-)enabled, then at a fixed
//! interval. Each tick spawns its poll, so a slow response never delays the
//! next tick; the engine's sequence guard sorts out overlapping responses.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::ReconciliationEngine;

/// Run the auto-refresh loop until `cancel` fires.
///
/// `auto_refresh` carries the on/off toggle. Every change restarts the
/// schedule from the instant of the toggle. Disabling stops future ticks
/// but leaves in-flight polls alone. If the toggle's sender is dropped the
/// last value stays in force.
pub async fn run(
    engine: Arc<ReconciliationEngine>,
    interval: Duration,
    mut auto_refresh: watch::Receiver<bool>,
    cancel: CancellationToken,
) {
    let mut watching = true;

    loop {
        let enabled = *auto_refresh.borrow_and_update();

        if !enabled {
            tracing::info!("auto-refresh paused");
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = auto_refresh.changed(), if watching => {
                    watching = changed.is_ok();
                }
            }
            continue;
        }

        tracing::info!(interval_ms = interval.as_millis() as u64, "auto-refresh running");
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("scheduler stopped");
                    return;
                }
                changed = auto_refresh.changed(), if watching => {
                    if changed.is_err() {
                        watching = false;
                        continue;
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let engine = engine.clone();
                    tokio::spawn(async move {
                        engine.poll().await;
                    });
                }
            }
        }
    }

    tracing::debug!("scheduler stopped");
}
