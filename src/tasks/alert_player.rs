//! Alert player background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use crate::{services::AlertSink, state::AlertSignal};

/// Background task that forwards alert signals to the sink until the channel closes
pub async fn alert_player_task<S: AlertSink>(mut alerts: broadcast::Receiver<AlertSignal>, mut sink: S) {
    info!("Starting alert player task");

    loop {
        match alerts.recv().await {
            Ok(AlertSignal::Play) => {
                if let Err(e) = sink.play() {
                    error!("Failed to play alert: {}", e);
                }
            }
            Ok(AlertSignal::Stop) => {
                if let Err(e) = sink.stop() {
                    error!("Failed to stop alert: {}", e);
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Alert player lagged, {} signals dropped", missed);
            }
            Err(RecvError::Closed) => {
                info!("Alert channel closed, alert player exiting");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl AlertSink for RecordingSink {
        fn play(&mut self) -> Result<(), String> {
            self.calls.lock().unwrap().push("play");
            Ok(())
        }

        fn stop(&mut self) -> Result<(), String> {
            self.calls.lock().unwrap().push("stop");
            Ok(())
        }
    }

    struct FailingSink;

    impl AlertSink for FailingSink {
        fn play(&mut self) -> Result<(), String> {
            Err("no audio device".to_string())
        }

        fn stop(&mut self) -> Result<(), String> {
            Err("no audio device".to_string())
        }
    }

    #[tokio::test]
    async fn test_forwards_signals_in_order() {
        let (tx, rx) = broadcast::channel(16);
        let sink = RecordingSink::default();
        let calls = Arc::clone(&sink.calls);

        let task = tokio::spawn(alert_player_task(rx, sink));
        tx.send(AlertSignal::Play).unwrap();
        tx.send(AlertSignal::Stop).unwrap();
        tx.send(AlertSignal::Play).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["play", "stop", "play"]);
    }

    #[tokio::test]
    async fn test_sink_errors_do_not_end_task() {
        let (tx, rx) = broadcast::channel(16);
        let task = tokio::spawn(alert_player_task(rx, FailingSink));

        tx.send(AlertSignal::Play).unwrap();
        tx.send(AlertSignal::Stop).unwrap();
        drop(tx);

        // Task only finishes once the channel closes.
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_timer_reset_reaches_sink() {
        let state = crate::state::AppState::new(0, "127.0.0.1".to_string(), std::time::Duration::from_secs(1));
        let sink = RecordingSink::default();
        let calls = Arc::clone(&sink.calls);
        let rx = state.subscribe_alerts();

        let task = tokio::spawn(alert_player_task(rx, sink));
        state.reset_all().unwrap();
        drop(state);
        task.await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["stop"]);
    }
}
