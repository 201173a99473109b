use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::progress;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Focus
    }
}

impl Mode {
    pub fn title(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    InvalidDuration,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidDuration => {
                write!(f, "session duration must be greater than zero")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// What a single one-second advance did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing happened; the session is not running.
    Inactive,
    /// One second elapsed, time remains.
    Ticked,
    /// The countdown hit zero on this tick.
    Completed(Mode),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub mode: Mode,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub progress_percent: u8,
    pub ring_stroke_offset: f64,
    pub is_low_time: bool,
    pub is_running: bool,
    pub remaining_clock: String,
    pub started_at: Option<DateTime<Utc>>,
}

/// The single active countdown. Holds no clock and performs no I/O: the
/// caller owns scheduling and drives time forward one `tick()` at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    mode: Mode,
    total_seconds: u32,
    remaining_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    /// Retained across completions so `restart` can rebuild the same
    /// session length without re-prompting.
    last_duration_minutes: Option<f64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Begin a fresh session, unconditionally replacing whatever was in
    /// progress. Fractional minutes are allowed (0.1 is the six-second
    /// debug preset) but must round to at least one whole second.
    pub fn start(
        &mut self,
        mode: Mode,
        duration_minutes: f64,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
            return Err(SessionError::InvalidDuration);
        }
        let total_seconds = (duration_minutes * 60.0).round() as u32;
        if total_seconds == 0 {
            return Err(SessionError::InvalidDuration);
        }

        self.phase = SessionPhase::Running;
        self.mode = mode;
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.started_at = Some(started_at);
        self.last_duration_minutes = Some(duration_minutes);
        Ok(())
    }

    /// Returns whether the phase changed. Pausing anything other than a
    /// running session is a no-op.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        true
    }

    /// Returns whether the phase changed. Resuming anything other than a
    /// paused session is a no-op.
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        true
    }

    /// Re-run the last selected mode and duration. A no-op returning false
    /// when no session has ever been started.
    pub fn restart(&mut self, started_at: DateTime<Utc>) -> bool {
        let Some(minutes) = self.last_duration_minutes else {
            return false;
        };
        self.start(self.mode, minutes, started_at).is_ok()
    }

    /// Advance the countdown by exactly one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Inactive;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = SessionPhase::Completed;
            return TickOutcome::Completed(self.mode);
        }
        TickOutcome::Ticked
    }

    pub fn progress_percent(&self) -> u8 {
        if self.total_seconds == 0 {
            return 0;
        }
        ((self.remaining_seconds as f64 / self.total_seconds as f64) * 100.0).round() as u8
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let progress_percent = self.progress_percent();
        SessionSnapshot {
            phase: self.phase,
            mode: self.mode,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            progress_percent,
            ring_stroke_offset: progress::ring_stroke_offset(progress_percent),
            is_low_time: progress::is_low_time(progress_percent),
            is_running: self.is_running(),
            remaining_clock: progress::format_clock(self.remaining_seconds),
            started_at: self.started_at,
        }
    }
}
