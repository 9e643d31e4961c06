//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod alert_player;
pub mod tick_driver;

// Re-export main functions
pub use alert_player::alert_player_task;
pub use tick_driver::tick_driver_task;
