//! Tomato Clock - A state-managed HTTP server for a work/break interval clock
//! 
//! This library provides the session/break countdown state machine, the
//! background tasks that tick it and play its alerts, and the HTTP API a
//! front end uses to drive and render it.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
