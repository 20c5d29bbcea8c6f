mod engine;
mod phase;
mod ticker;

pub use engine::{PomodoroEngine, TimerDurations, TimerSnapshot};
pub use phase::Phase;
pub use ticker::{TickHandle, Ticker, TICK_PERIOD};
