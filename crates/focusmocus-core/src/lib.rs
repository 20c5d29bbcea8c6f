//! # FocusMocus Core Library
//!
//! This library provides the business logic behind the FocusMocus screensaver:
//! a clock, rotating motivational quotes and an optional Pomodoro timer. The
//! `focusmocus` CLI is a thin terminal layer over the same library.
//!
//! ## Architecture
//!
//! - **Pomodoro Engine**: A tick-driven phase state machine; the caller
//!   delivers one `tick()` per second while it is active
//! - **Tick source**: A cancellable periodic tokio task, armed only while
//!   the engine runs
//! - **Storage**: SQLite key-value store holding the JSON settings record
//! - **Session**: Single-task event loop binding engine, ticks, commands and
//!   settings changes
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: Core timer state machine
//! - [`SettingsStore`]: Settings read/merge/persist with default fallback
//! - [`FocusSession`]: The screensaver's timer loop
//! - [`Database`]: Key-value persistence

pub mod chime;
pub mod clock;
pub mod error;
pub mod events;
pub mod quotes;
pub mod session;
pub mod storage;
pub mod timer;

pub use chime::{Chime, CountingChime, SilentChime, TerminalBell};
pub use error::{ConfigError, StorageError, ValidationError};
pub use events::Event;
pub use quotes::QuoteRotator;
pub use session::{Command, FocusSession};
pub use storage::{Database, KvStore, MemoryStore, Settings, SettingsPatch, SettingsStore};
pub use timer::{Phase, PomodoroEngine, TickHandle, Ticker, TimerDurations, TimerSnapshot};
