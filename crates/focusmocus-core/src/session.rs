//! The screensaver's timer loop.
//!
//! A [`FocusSession`] owns the [`PomodoroEngine`] and is the only place it is
//! mutated. Ticks, user commands and settings changes are handled one at a
//! time on a single task, so every handler (including the chime on phase
//! completion) runs to completion before the next input is looked at.
//!
//! The tick source is armed only while the engine is active and released on
//! pause, reset, settings-driven reset and when the loop exits.

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::chime::Chime;
use crate::events::Event;
use crate::storage::Settings;
use crate::timer::{PomodoroEngine, TickHandle, Ticker, TimerSnapshot, TICK_PERIOD};

/// User actions forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    /// Start when inactive, pause when active.
    Toggle,
    Quit,
}

pub struct FocusSession<C> {
    engine: PomodoroEngine,
    settings: Settings,
    settings_rx: watch::Receiver<Settings>,
    chime: C,
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Sender<TimerSnapshot>,
    ticker: Option<TickHandle>,
}

impl<C: Chime> FocusSession<C> {
    /// Build a session from the current settings. Events are pushed to
    /// `events`; a closed receiver is not an error.
    pub fn new(
        mut settings_rx: watch::Receiver<Settings>,
        chime: C,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let settings = settings_rx.borrow_and_update().clone();
        let engine = PomodoroEngine::new(&settings);
        let (snapshots, _rx) = watch::channel(engine.snapshot());
        Self {
            engine,
            settings,
            settings_rx,
            chime,
            events,
            snapshots,
            ticker: None,
        }
    }

    pub fn engine(&self) -> &PomodoroEngine {
        &self.engine
    }

    /// Latest engine state, refreshed after every handled input.
    pub fn snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.subscribe()
    }

    /// Run until [`Command::Quit`] or until every command sender is gone.
    /// Returns the engine in its final state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> PomodoroEngine {
        let mut settings_open = true;
        self.auto_start();
        self.sync();

        loop {
            tokio::select! {
                Some(_) = next_tick(&mut self.ticker) => self.on_tick(),
                cmd = commands.recv() => match cmd {
                    Some(Command::Quit) | None => break,
                    Some(cmd) => self.handle(cmd),
                },
                changed = self.settings_rx.changed(), if settings_open => match changed {
                    Ok(()) => {
                        let settings = self.settings_rx.borrow_and_update().clone();
                        self.on_settings(settings);
                    }
                    Err(_) => {
                        tracing::debug!("settings store dropped, keeping current settings");
                        settings_open = false;
                    }
                },
            }
            self.sync();
        }

        self.ticker = None;
        self.engine
    }

    /// Apply one user command.
    pub fn handle(&mut self, command: Command) {
        if !self.settings.pomodoro_enabled {
            tracing::debug!(?command, "pomodoro disabled, ignoring command");
            return;
        }
        let event = match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Reset => self.engine.reset(),
            Command::Toggle if self.engine.is_active() => self.engine.pause(),
            Command::Toggle => self.engine.start(),
            Command::Quit => None,
        };
        self.emit(event);
        self.sync();
        self.auto_start();
    }

    fn on_tick(&mut self) {
        let event = self.engine.tick();
        self.emit(event);
    }

    fn on_settings(&mut self, settings: Settings) {
        if !settings.pomodoro_enabled {
            // A disabled timer is torn down, as if never started.
            self.engine.pause();
        }
        let event = self.engine.apply_settings(&settings);
        self.settings = settings;
        self.emit(event);
        self.sync();
        self.auto_start();
    }

    /// Idle + auto-start enabled means the timer starts immediately.
    fn auto_start(&mut self) {
        if self.settings.pomodoro_enabled
            && self.settings.auto_start_pomodoro
            && self.engine.phase() == crate::timer::Phase::Idle
        {
            let event = self.engine.start();
            self.emit(event);
        }
    }

    fn emit(&mut self, event: Option<Event>) {
        let Some(event) = event else {
            return;
        };
        if event.is_completion() {
            self.chime.chime();
        }
        if let Some(to) = event.phase_change() {
            tracing::info!(phase = %to, cycles = self.engine.cycle_count(), "phase changed");
        }
        let _ = self.events.send(event);
    }

    /// Arm the ticker iff the engine is active and publish a snapshot.
    fn sync(&mut self) {
        match (self.engine.is_active(), self.ticker.is_some()) {
            (true, false) => self.ticker = Some(Ticker::arm(TICK_PERIOD)),
            (false, true) => {
                if let Some(handle) = self.ticker.take() {
                    handle.cancel();
                }
            }
            _ => {}
        }
        self.snapshots.send_replace(self.engine.snapshot());
    }
}

async fn next_tick(ticker: &mut Option<TickHandle>) -> Option<Instant> {
    match ticker {
        Some(handle) => handle.next().await,
        None => std::future::pending().await,
    }
}
