//! State management module
//! 
//! This module contains the timer state machine and the shared application
//! state that serializes commands against it.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, CommandOutcome};
pub use timer_state::{
    format_time, Adjustment, AlertSignal, LengthKind, Phase, TimerSnapshot, TimerState,
};
