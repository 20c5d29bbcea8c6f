//! Pomodoro engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no timer of its own:
//! the caller delivers one `tick()` per second while the engine is active
//! (see [`super::Ticker`]).
//!
//! ## Phase Transitions
//!
//! ```text
//! Idle --start--> Work --(runs out)--> ShortBreak | LongBreak --(runs out)--> Work
//!  ^                                                                        |
//!  +------------------------------ reset -----------------------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(&settings);
//! engine.start();
//! // Once per second while engine.is_active():
//! engine.tick(); // Returns Some(Event::PhaseChanged) when a phase runs out
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::events::Event;
use crate::storage::Settings;

/// Phase lengths in seconds, derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    pub cycles_before_long_break: u32,
}

impl TimerDurations {
    /// Length of `phase`. Idle reports the work length, which is what a
    /// start would count down from.
    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle | Phase::Work => self.work_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

impl From<&Settings> for TimerDurations {
    fn from(settings: &Settings) -> Self {
        Self {
            work_secs: settings.work_minutes.saturating_mul(60),
            short_break_secs: settings.short_break_minutes.saturating_mul(60),
            long_break_secs: settings.long_break_minutes.saturating_mul(60),
            // Settings are validated upstream; max(1) keeps the modulo defined.
            cycles_before_long_break: settings.cycles_before_long_break.max(1),
        }
    }
}

/// Read-only view of the engine for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub time_left_seconds: u32,
    pub total_seconds: u32,
    pub is_active: bool,
    pub cycle_count: u32,
}

/// Core Pomodoro state machine.
#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    durations: TimerDurations,
    /// Durations received while active, adopted at the next phase boundary.
    pending: Option<TimerDurations>,
    phase: Phase,
    time_left_secs: u32,
    is_active: bool,
    /// Completed work phases since the last reset.
    cycle_count: u32,
}

impl PomodoroEngine {
    /// Create an idle, inactive engine with a full work phase ready.
    pub fn new(settings: &Settings) -> Self {
        Self::with_durations(TimerDurations::from(settings))
    }

    pub fn with_durations(durations: TimerDurations) -> Self {
        Self {
            durations,
            pending: None,
            phase: Phase::Idle,
            time_left_secs: durations.work_secs,
            is_active: false,
            cycle_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn phase_duration_secs(&self, phase: Phase) -> u32 {
        self.durations.phase_secs(phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_duration_secs(self.phase);
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / total as f64)
    }

    pub fn phase_label(&self) -> String {
        self.phase.label(self.cycle_count)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            time_left_seconds: self.time_left_secs,
            total_seconds: self.phase_duration_secs(self.phase),
            is_active: self.is_active,
            cycle_count: self.cycle_count,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from idle, or resume a paused phase.
    ///
    /// From idle this enters `Work` with a full work countdown and activates
    /// in the same call. Otherwise phase and remaining time are untouched.
    pub fn start(&mut self) -> Option<Event> {
        if self.phase == Phase::Idle {
            self.phase = Phase::Work;
            self.time_left_secs = self.durations.work_secs;
            self.is_active = true;
            return Some(Event::PhaseChanged {
                from: Phase::Idle,
                to: Phase::Work,
                cycle_count: self.cycle_count,
                duration_secs: self.time_left_secs,
                completed: false,
                at: Utc::now(),
            });
        }
        if self.is_active {
            return None;
        }
        self.is_active = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop ticking. Phase and remaining time are kept.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.is_active = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Back to idle with a full work countdown and no completed cycles.
    pub fn reset(&mut self) -> Option<Event> {
        if let Some(pending) = self.pending.take() {
            self.durations = pending;
        }
        self.phase = Phase::Idle;
        self.time_left_secs = self.durations.work_secs;
        self.cycle_count = 0;
        self.is_active = false;
        Some(Event::TimerReset {
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `Some(Event::PhaseChanged)` when the
    /// current phase runs out; the next phase starts in the same tick.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        if self.time_left_secs > 1 {
            self.time_left_secs -= 1;
            return None;
        }
        Some(self.complete_phase())
    }

    /// React to changed settings.
    ///
    /// While inactive the engine returns to idle with the new work length and
    /// zero cycles. While active the running phase is left alone and the new
    /// durations take effect at the next phase boundary.
    pub fn apply_settings(&mut self, settings: &Settings) -> Option<Event> {
        let durations = TimerDurations::from(settings);
        if self.is_active {
            self.pending = (durations != self.durations).then_some(durations);
            return None;
        }
        self.durations = durations;
        self.pending = None;
        self.phase = Phase::Idle;
        self.time_left_secs = durations.work_secs;
        self.cycle_count = 0;
        Some(Event::SettingsApplied {
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        if let Some(pending) = self.pending.take() {
            self.durations = pending;
        }
        let from = self.phase;
        let to = match from {
            Phase::Work => {
                self.cycle_count += 1;
                if self.cycle_count % self.durations.cycles_before_long_break == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak | Phase::Idle => Phase::Work,
        };
        self.phase = to;
        self.time_left_secs = self.durations.phase_secs(to);
        tracing::debug!(%from, %to, cycle_count = self.cycle_count, "phase completed");
        Event::PhaseChanged {
            from,
            to,
            cycle_count: self.cycle_count,
            duration_secs: self.time_left_secs,
            completed: true,
            at: Utc::now(),
        }
    }
}
