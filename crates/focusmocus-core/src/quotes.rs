//! Motivational quotes shown under the clock.
//!
//! The screensaver swaps the quote every [`ROTATION_PERIOD`], never showing
//! the same one twice in a row. The last index is remembered in the
//! key-value store so a new run picks up where the previous one stopped.

use std::time::Duration;

use rand::Rng;

use crate::storage::KvStore;

/// Key of the remembered quote index.
pub const LAST_QUOTE_KEY: &str = "lastQuoteIndex";

/// How long a quote stays on screen.
pub const ROTATION_PERIOD: Duration = Duration::from_secs(10);

pub const QUOTES: &[&str] = &[
    "The secret of getting ahead is getting started.",
    "Focus on being productive instead of busy.",
    "It always seems impossible until it's done.",
    "Small steps every day add up to big results.",
    "Done is better than perfect.",
    "Well begun is half done.",
    "You don't have to see the whole staircase, just take the first step.",
    "Action is the foundational key to all success.",
    "Concentrate all your thoughts upon the work at hand.",
    "Rest when you're weary. Refresh and renew yourself.",
    "The way to get started is to quit talking and begin doing.",
    "Great things are done by a series of small things brought together.",
];

/// Picks which quote is on screen.
#[derive(Debug, Clone)]
pub struct QuoteRotator {
    index: usize,
}

impl QuoteRotator {
    /// Resume from the remembered index, or start at a random quote.
    pub fn restore<S: KvStore>(store: &S) -> Self {
        let remembered = match store.kv_get(LAST_QUOTE_KEY) {
            Ok(raw) => raw.and_then(|s| s.trim().parse::<usize>().ok()),
            Err(e) => {
                tracing::warn!("Error reading last quote index: {e}");
                None
            }
        };
        let index = remembered
            .filter(|&i| i < QUOTES.len())
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..QUOTES.len()));
        Self { index }
    }

    pub fn starting_at(index: usize) -> Self {
        Self {
            index: index % QUOTES.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static str {
        QUOTES[self.index]
    }

    /// Switch to a different random quote.
    pub fn advance(&mut self) -> &'static str {
        self.advance_with(&mut rand::thread_rng())
    }

    pub fn advance_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static str {
        if QUOTES.len() > 1 {
            // Draw from the other len-1 slots so the current one is excluded.
            let offset = rng.gen_range(1..QUOTES.len());
            self.index = (self.index + offset) % QUOTES.len();
        }
        self.current()
    }

    /// Persist the current index. Failures are logged only.
    pub fn remember<S: KvStore>(&self, store: &S) {
        if let Err(e) = store.kv_set(LAST_QUOTE_KEY, &self.index.to_string()) {
            tracing::warn!("Error saving last quote index: {e}");
        }
    }
}
