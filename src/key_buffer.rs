//! Type-ahead key buffer for non-searchable selects
//!
//! Printable keys accumulate until the user pauses for the idle window. Each
//! keystroke bumps a generation number; the runtime schedules a flush tagged
//! with that generation, and only the flush carrying the latest generation
//! yields the buffered term. Earlier timers are simply ignored.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct KeyBuffer {
    pressed: String,
    generation: u64,
    window_ms: u64,
}

impl KeyBuffer {
    /// Buffer flushing after `window_ms` of keyboard idle time
    pub fn new(window_ms: u64) -> Self {
        Self {
            pressed: String::new(),
            generation: 0,
            window_ms,
        }
    }

    /// Idle window after the last keystroke before flushing
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Buffered (lowercased) keys
    pub fn pending(&self) -> &str {
        &self.pressed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Append a keystroke and restart the idle window
    ///
    /// Returns the generation the caller should schedule a flush for.
    pub fn push(&mut self, ch: char) -> u64 {
        self.pressed.extend(ch.to_lowercase());
        self.generation += 1;
        self.generation
    }

    /// Take the buffered term if `generation` is the latest keystroke
    pub fn flush(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        if self.pressed.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pressed))
    }

    /// Drop buffered keys and invalidate any scheduled flush
    pub fn cancel(&mut self) {
        self.pressed.clear();
        self.generation += 1;
    }
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_KEY_DEBOUNCE_MS)
    }
}
