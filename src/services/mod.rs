//! External service management module
//! 
//! This module contains the collaborators the timer drives, such as the
//! alert sound player.

pub mod alert;

// Re-export main types
pub use alert::{alert_sink_from, AlertSink, CommandAlertPlayer, SilentAlertPlayer};
