//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{Adjustment, AlertSignal, LengthKind, TimerSnapshot, TimerState};

/// Outcome of a command: whether it changed anything, and the timer afterwards
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub applied: bool,
    pub snapshot: TimerSnapshot,
}

/// Main application state that owns the timer and its notification channels
#[derive(Debug)]
pub struct AppState {
    /// The single timer instance; every command and tick serializes on this lock
    pub timer_state: Arc<Mutex<TimerState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Tick driver cadence
    pub cadence: Duration,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Alert signals for the player
    pub alert_tx: broadcast::Sender<AlertSignal>,
    /// Snapshot after every command and tick
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Running flag, only written on edges
    pub running_tx: watch::Sender<bool>,
    /// Keep the receivers alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
    pub _running_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create a new AppState with a timer at its startup defaults
    pub fn new(port: u16, host: String, cadence: Duration) -> Self {
        let timer = TimerState::new();
        let (alert_tx, _) = broadcast::channel(16);
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.snapshot());
        let (running_tx, running_rx) = watch::channel(timer.is_running());

        Self {
            timer_state: Arc::new(Mutex::new(timer)),
            start_time: Instant::now(),
            port,
            host,
            cadence,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            alert_tx,
            timer_update_tx,
            running_tx,
            _timer_update_rx: timer_update_rx,
            _running_rx: running_rx,
        }
    }

    /// Apply `updater` under the timer lock and publish what changed.
    ///
    /// Signals are sent before the lock is released so that concurrent
    /// commands publish in the same order they mutated the timer.
    fn update_timer<F>(&self, updater: F) -> Result<(TimerSnapshot, Option<AlertSignal>), String>
    where
        F: FnOnce(&mut TimerState) -> Option<AlertSignal>,
    {
        let mut timer = self.timer_state.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let signal = updater(&mut *timer);
        let snapshot = timer.snapshot();

        if let Some(signal) = signal {
            if let Err(e) = self.alert_tx.send(signal) {
                warn!("No alert player listening for {:?}: {}", signal, e);
            }
        }

        let running = snapshot.running;
        self.running_tx.send_if_modified(|current| {
            if *current != running {
                *current = running;
                true
            } else {
                false
            }
        });

        // watch::Sender::send_replace never fails, even without receivers
        self.timer_update_tx.send_replace(snapshot.clone());
        drop(timer);

        Ok((snapshot, signal))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Step the session or break length by one minute
    pub fn adjust_length(&self, kind: LengthKind, adjustment: Adjustment) -> Result<CommandOutcome, String> {
        let action = match adjustment {
            Adjustment::Increment => format!("{}-increment", kind.as_str()),
            Adjustment::Decrement => format!("{}-decrement", kind.as_str()),
        };

        let mut applied = false;
        let (snapshot, _) = self.update_timer(|timer| {
            applied = timer.adjust_duration(kind, adjustment);
            None
        })?;
        self.record_action(&action);

        if applied {
            info!("{}: session={}min break={}min", action, snapshot.session_length, snapshot.break_length);
        } else {
            debug!("{} ignored (running={}, session={}min, break={}min)",
                   action, snapshot.running, snapshot.session_length, snapshot.break_length);
        }

        Ok(CommandOutcome { applied, snapshot })
    }

    pub fn increment_session(&self) -> Result<CommandOutcome, String> {
        self.adjust_length(LengthKind::Session, Adjustment::Increment)
    }

    pub fn decrement_session(&self) -> Result<CommandOutcome, String> {
        self.adjust_length(LengthKind::Session, Adjustment::Decrement)
    }

    pub fn increment_break(&self) -> Result<CommandOutcome, String> {
        self.adjust_length(LengthKind::Break, Adjustment::Increment)
    }

    pub fn decrement_break(&self) -> Result<CommandOutcome, String> {
        self.adjust_length(LengthKind::Break, Adjustment::Decrement)
    }

    /// Start or pause the countdown
    pub fn start_pause(&self) -> Result<CommandOutcome, String> {
        let (snapshot, _) = self.update_timer(|timer| {
            timer.toggle_run();
            None
        })?;
        self.record_action(if snapshot.running { "start" } else { "pause" });

        info!("Timer {} at {} ({})",
              if snapshot.running { "started" } else { "paused" },
              snapshot.time_left, snapshot.label);

        Ok(CommandOutcome { applied: true, snapshot })
    }

    /// Restore the startup defaults and stop any alert in flight
    pub fn reset_all(&self) -> Result<CommandOutcome, String> {
        let (snapshot, _) = self.update_timer(|timer| Some(timer.reset()))?;
        self.record_action("reset");

        info!("Timer reset to defaults");
        Ok(CommandOutcome { applied: true, snapshot })
    }

    /// Advance the countdown by one step. Called by the tick driver.
    pub fn tick(&self) -> Result<TimerSnapshot, String> {
        let mut ignored = false;
        let (snapshot, signal) = self.update_timer(|timer| {
            ignored = !timer.is_running();
            timer.tick()
        })?;

        if ignored {
            warn!("Tick received while paused, ignoring");
        } else if signal.is_some() {
            info!("Countdown reached zero, switching to {} ({})", snapshot.label, snapshot.time_left);
        } else {
            tracing::trace!("Tick: {} {}", snapshot.label, snapshot.time_left);
        }

        Ok(snapshot)
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer_state.lock()
            .map(|timer| timer.snapshot())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Subscribe to alert signals
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertSignal> {
        self.alert_tx.subscribe()
    }

    /// Subscribe to snapshots published after every command and tick
    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Subscribe to running edges
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use tokio::sync::broadcast::error::TryRecvError;

    fn test_state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), Duration::from_secs(1))
    }

    #[test]
    fn test_new_state_has_defaults() {
        let state = test_state();
        let snapshot = state.get_snapshot().unwrap();
        assert_eq!(snapshot.time_left, "25:00");
        assert_eq!(snapshot.phase, Phase::Session);
        assert!(!snapshot.running);
        assert_eq!(state.get_last_action(), (None, None));
    }

    #[test]
    fn test_commands_publish_snapshots() {
        let state = test_state();
        let mut rx = state.subscribe_snapshots();

        let outcome = state.increment_session().unwrap();
        assert!(outcome.applied);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().time_left, "26:00");

        state.increment_break().unwrap();
        assert_eq!(rx.borrow_and_update().break_length, 6);
    }

    #[test]
    fn test_adjust_rejected_while_running() {
        let state = test_state();
        state.start_pause().unwrap();

        let outcome = state.decrement_session().unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.snapshot.session_length, 25);
        assert_eq!(outcome.snapshot.remaining_seconds, 1500);

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("session-decrement"));
        assert!(time.is_some());
    }

    #[test]
    fn test_running_channel_only_moves_on_edges() {
        let state = test_state();
        let mut rx = state.subscribe_running();

        state.increment_break().unwrap();
        assert!(!rx.has_changed().unwrap());

        state.start_pause().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        state.tick().unwrap();
        assert!(!rx.has_changed().unwrap());

        state.reset_all().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn test_tick_while_paused_is_ignored() {
        let state = test_state();
        let snapshot = state.tick().unwrap();
        assert_eq!(snapshot.remaining_seconds, 1500);
    }

    #[test]
    fn test_zero_crossing_emits_one_alert() {
        let state = test_state();
        let mut alerts = state.subscribe_alerts();

        for _ in 0..24 {
            state.decrement_session().unwrap();
        }
        state.start_pause().unwrap();

        for _ in 0..60 {
            state.tick().unwrap();
        }
        assert_eq!(alerts.try_recv(), Err(TryRecvError::Empty));

        let snapshot = state.tick().unwrap();
        assert_eq!(snapshot.phase, Phase::Break);
        assert_eq!(snapshot.time_left, "05:00");
        assert!(snapshot.running);
        assert_eq!(alerts.try_recv(), Ok(AlertSignal::Play));
        assert_eq!(alerts.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_reset_emits_stop() {
        let state = test_state();
        let mut alerts = state.subscribe_alerts();

        state.increment_session().unwrap();
        state.start_pause().unwrap();
        state.tick().unwrap();

        let outcome = state.reset_all().unwrap();
        assert_eq!(outcome.snapshot, TimerState::new().snapshot());
        assert_eq!(alerts.try_recv(), Ok(AlertSignal::Stop));
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
