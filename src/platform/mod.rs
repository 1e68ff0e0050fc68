//! Platform abstraction layer
//!
//! Handles the frontend-facing pieces:
//! - Time (monotonic milliseconds, frame pacing)
//! - Input events
//! - The terminal frontend (native only)

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Logical keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Start a new run from the game over screen
    Restart,
    /// Back to the title screen from game over
    Menu,
    /// Any other key (still dismisses the title screen)
    Other,
}

/// Discrete input delivered once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(Key),
    /// Window close / Esc / Ctrl-C
    Quit,
}

/// Monotonic millisecond clock, read once per frame
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Blocking frame-rate limiter; the only place the game loop sleeps
#[derive(Debug)]
pub struct FrameLimiter {
    frame: Duration,
    frame_start: Instant,
    last_frame: Duration,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            frame_start: Instant::now(),
            last_frame: Duration::ZERO,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Sleep out the rest of the current frame, then start the next one
    pub fn wait(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        self.last_frame = self.frame_start.elapsed();
        self.frame_start = Instant::now();
    }

    /// Length of the previous frame, sleep included
    pub fn last_frame(&self) -> Duration {
        self.last_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 116);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn test_limiter_paces_frames() {
        let mut limiter = FrameLimiter::new(200);
        limiter.wait();
        limiter.wait();
        assert!(limiter.last_frame() >= limiter.frame_duration());
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
