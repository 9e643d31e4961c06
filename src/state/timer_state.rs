//! Timer state machine for the work/break interval clock
//!
//! `TimerState` is pure: it has no clock and no I/O. The tick driver calls
//! [`TimerState::tick`] once per cadence, and the alert signals it returns
//! are forwarded to whatever plays the sound.

use serde::{Deserialize, Serialize};

/// Shortest allowed session or break length, in minutes
pub const MIN_LENGTH_MINUTES: u32 = 1;
/// Longest allowed session or break length, in minutes
pub const MAX_LENGTH_MINUTES: u32 = 60;
/// Session length at startup and after reset
pub const DEFAULT_SESSION_MINUTES: u32 = 25;
/// Break length at startup and after reset
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Which countdown is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Session,
    Break,
}

impl Phase {
    /// Human readable label shown above the countdown
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Session => "Session",
            Phase::Break => "Break",
        }
    }

    /// The phase that follows this one at a zero-crossing
    pub fn next(&self) -> Self {
        match self {
            Phase::Session => Phase::Break,
            Phase::Break => Phase::Session,
        }
    }
}

/// Which configured length an adjustment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    Session,
    Break,
}

impl LengthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthKind::Session => "session",
            LengthKind::Break => "break",
        }
    }
}

/// One-minute step applied to a configured length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increment,
    Decrement,
}

impl Adjustment {
    fn apply(&self, minutes: u32) -> Option<u32> {
        match self {
            Adjustment::Increment if minutes < MAX_LENGTH_MINUTES => Some(minutes + 1),
            Adjustment::Decrement if minutes > MIN_LENGTH_MINUTES => Some(minutes - 1),
            _ => None,
        }
    }
}

/// Side effect requested from the alert player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSignal {
    /// A countdown crossed zero
    Play,
    /// Halt and rewind whatever is playing
    Stop,
}

/// Complete timer state. Mutated only through the methods below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    session_length: u32,
    break_length: u32,
    remaining_seconds: u32,
    phase: Phase,
    running: bool,
}

impl TimerState {
    /// Create a timer with the startup defaults (25/5, idle session)
    pub fn new() -> Self {
        Self {
            session_length: DEFAULT_SESSION_MINUTES,
            break_length: DEFAULT_BREAK_MINUTES,
            remaining_seconds: DEFAULT_SESSION_MINUTES * 60,
            phase: Phase::Session,
            running: false,
        }
    }

    pub fn session_length(&self) -> u32 {
        self.session_length
    }

    pub fn break_length(&self) -> u32 {
        self.break_length
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Configured length of `phase`, in seconds
    pub fn length_seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Session => self.session_length * 60,
            Phase::Break => self.break_length * 60,
        }
    }

    /// Step a configured length by one minute.
    ///
    /// Ignored while running and at the [1, 60] bounds. Returns whether
    /// anything changed. A session change always reloads the countdown
    /// from the new session length, even when idle in the break phase.
    pub fn adjust_duration(&mut self, kind: LengthKind, adjustment: Adjustment) -> bool {
        if self.running {
            return false;
        }

        match kind {
            LengthKind::Session => match adjustment.apply(self.session_length) {
                Some(minutes) => {
                    self.session_length = minutes;
                    self.remaining_seconds = minutes * 60;
                    true
                }
                None => false,
            },
            LengthKind::Break => match adjustment.apply(self.break_length) {
                Some(minutes) => {
                    self.break_length = minutes;
                    true
                }
                None => false,
            },
        }
    }

    /// Flip between running and paused. Returns the new running flag.
    pub fn toggle_run(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Advance the countdown by one second.
    ///
    /// At zero the phase flips, the countdown reloads from the new phase's
    /// length and `Some(AlertSignal::Play)` is returned. Ticks while paused
    /// are ignored.
    pub fn tick(&mut self) -> Option<AlertSignal> {
        if !self.running {
            return None;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            return None;
        }

        self.phase = self.phase.next();
        self.remaining_seconds = self.length_seconds(self.phase);
        Some(AlertSignal::Play)
    }

    /// Restore the startup defaults. Always returns `AlertSignal::Stop`.
    pub fn reset(&mut self) -> AlertSignal {
        *self = Self::new();
        AlertSignal::Stop
    }

    /// Externally observable view of the timer
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            label: self.phase.label().to_string(),
            time_left: format_time(self.remaining_seconds),
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            session_length: self.session_length,
            break_length: self.break_length,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only copy of the timer handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub label: String,
    /// Countdown as `MM:SS`
    pub time_left: String,
    pub remaining_seconds: u32,
    pub running: bool,
    pub session_length: u32,
    pub break_length: u32,
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
