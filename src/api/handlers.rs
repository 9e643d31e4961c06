//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::watch;
use tracing::{error, info};

use crate::state::{AppState, CommandOutcome, LengthKind, TimerSnapshot};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Turn the outcome of a length adjustment into a response
fn adjustment_response(kind: LengthKind, result: Result<CommandOutcome, String>) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = result.map_err(|e| {
        error!("Failed to adjust {} length: {}", kind.as_str(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let minutes = match kind {
        LengthKind::Session => outcome.snapshot.session_length,
        LengthKind::Break => outcome.snapshot.break_length,
    };
    let label = match kind {
        LengthKind::Session => "Session",
        LengthKind::Break => "Break",
    };

    let message = if outcome.applied {
        format!("{} length set to {} minutes", label, minutes)
    } else if outcome.snapshot.running {
        format!("Timer is running, {} length unchanged", kind.as_str())
    } else {
        format!("{} length already at {} minutes", label, minutes)
    };

    Ok(Json(ApiResponse::from_outcome(outcome, message)))
}

/// Handle POST /session/increment
pub async fn session_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    adjustment_response(LengthKind::Session, state.increment_session())
}

/// Handle POST /session/decrement
pub async fn session_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    adjustment_response(LengthKind::Session, state.decrement_session())
}

/// Handle POST /break/increment
pub async fn break_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    adjustment_response(LengthKind::Break, state.increment_break())
}

/// Handle POST /break/decrement
pub async fn break_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    adjustment_response(LengthKind::Break, state.decrement_break())
}

/// Handle POST /start-pause - Start or pause the countdown
pub async fn start_pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start_pause() {
        Ok(outcome) => {
            let message = if outcome.snapshot.running {
                format!("{} started at {}", outcome.snapshot.label, outcome.snapshot.time_left)
            } else {
                format!("{} paused at {}", outcome.snapshot.label, outcome.snapshot.time_left)
            };
            Ok(Json(ApiResponse::from_outcome(outcome, message)))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Restore defaults and stop the alert
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset_all() {
        Ok(outcome) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::from_outcome(outcome, "Timer reset to defaults".to_string())))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        cadence_ms: state.cadence.as_millis() as u64,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream a snapshot after every command and tick
pub async fn events_handler(State(state): State<Arc<AppState>>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(snapshot_stream(state.subscribe_snapshots())).keep_alive(KeepAlive::default())
}

/// Current snapshot first, then one event per published change.
/// Ends when the sender is dropped.
pub fn snapshot_stream(rx: watch::Receiver<TimerSnapshot>) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = match Event::default().event("timer").json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                error!("Failed to encode timer snapshot: {}", e);
                Event::default().event("timer").data(snapshot.time_left.clone())
            }
        };
        Some((Ok(event), (rx, false)))
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
