//! Audible cue played when a phase runs out.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fire-and-forget notification sound.
pub trait Chime: Send + Sync {
    fn chime(&self);
}

/// Rings the terminal bell (BEL) on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn chime(&self) {
        let mut out = std::io::stdout();
        // A terminal that cannot beep is not worth an error.
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

/// No sound at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn chime(&self) {}
}

/// Counts how often it was rung. Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct CountingChime {
    rings: AtomicUsize,
}

impl CountingChime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rings(&self) -> usize {
        self.rings.load(Ordering::SeqCst)
    }
}

impl Chime for CountingChime {
    fn chime(&self) {
        self.rings.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: Chime + ?Sized> Chime for std::sync::Arc<T> {
    fn chime(&self) {
        (**self).chime()
    }
}
