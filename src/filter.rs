//! Moving-average filter over a fixed circular buffer.
//!
//! The buffer always holds [`FILTER_CAPACITY`] slots, zero-initialised.
//! Each push writes one slot and returns the mean of the first `window`
//! slots, written or not, so the first `window - 1` outputs after boot are
//! biased toward zero.
//!
//! Shrinking the window neither clears nor compacts the buffer.  Slots that
//! were written under a larger window stay where they are and are averaged
//! in again if the window grows back before they are overwritten.

use crate::config::{DEFAULT_WINDOW, FILTER_CAPACITY};

pub struct MovingAverage {
    buf: [f32; FILTER_CAPACITY],
    cursor: usize,
    window: usize,
}

impl MovingAverage {
    pub fn new(window: u8) -> Self {
        Self {
            buf: [0.0; FILTER_CAPACITY],
            cursor: 0,
            window: clamp_window(window),
        }
    }

    /// Change the window; takes effect on the next [`push`](Self::push).
    pub fn set_window(&mut self, window: u8) {
        self.window = clamp_window(window);
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Next slot to be written.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Store `value` and return the mean over the current window.
    pub fn push(&mut self, value: f32) -> f32 {
        // A cursor left past a shrunken window restarts at the front.
        if self.cursor >= self.window {
            self.cursor = 0;
        }
        self.buf[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.window;
        self.mean()
    }

    /// Mean of the first `window` slots.
    pub fn mean(&self) -> f32 {
        let sum: f32 = self.buf[..self.window].iter().sum();
        sum / self.window as f32
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

fn clamp_window(window: u8) -> usize {
    usize::from(window).clamp(1, FILTER_CAPACITY)
}
