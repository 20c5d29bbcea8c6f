use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every engine state change produces an Event.
/// The screensaver renders from them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The phase changed. `completed` is true when the previous phase ran
    /// out, false when the change came from a control call.
    PhaseChanged {
        from: Phase,
        to: Phase,
        cycle_count: u32,
        duration_secs: u32,
        completed: bool,
        at: DateTime<Utc>,
    },
    /// New durations were adopted while the timer was inactive.
    SettingsApplied {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The new phase, if this event is a phase change.
    pub fn phase_change(&self) -> Option<Phase> {
        match self {
            Event::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// True for a phase that ran out on its own.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::PhaseChanged { completed: true, .. })
    }
}
