//! Tick driver background task

use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that ticks the timer once per cadence while it is running.
///
/// The interval only exists between a false→true edge of the running flag
/// and the next true→false edge, so a paused or reset timer gets no ticks.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task (cadence {:?})", state.cadence);

    let mut running_rx = state.subscribe_running();

    loop {
        // Wait for the timer to start
        while !*running_rx.borrow_and_update() {
            if running_rx.changed().await.is_err() {
                debug!("Running channel closed, tick driver exiting");
                return;
            }
        }

        debug!("Timer running, starting tick interval");
        let mut interval = interval_at(Instant::now() + state.cadence, state.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to tick timer: {}", e);
                    }
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running channel closed, tick driver exiting");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Timer stopped, dropping tick interval");
                        break;
                    }
                }
            }
        }
    }
}
