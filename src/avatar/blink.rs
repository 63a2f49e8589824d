//! Blink scheduling: a two-state timer advanced once per frame.
//!
//! The eyes stay open until `elapsed_frames` reaches a randomly drawn
//! threshold, render closed for a fixed 6-frame window, then the timer
//! resets and draws the next threshold. The random source is seeded at
//! construction so tests can pin the schedule.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frames the eyelids stay closed once a blink starts.
pub const BLINK_FRAMES: u32 = 6;

#[derive(Debug)]
pub struct BlinkTimer {
    elapsed_frames: u32,
    next_blink_at: u32,
    blinking: bool,
    delay_min: u32,
    delay_max: u32,
    rng: StdRng,
}

impl BlinkTimer {
    /// `delay_min..delay_max` is the uniform range the next-blink threshold
    /// is drawn from, in frames. A degenerate range is widened to one frame
    /// rather than rejected.
    pub fn new(delay_min: u32, delay_max: u32, seed: Option<u64>) -> Self {
        let delay_max = delay_max.max(delay_min + 1);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let next_blink_at = rng.gen_range(delay_min..delay_max);
        Self {
            elapsed_frames: 0,
            next_blink_at,
            blinking: false,
            delay_min,
            delay_max,
            rng,
        }
    }

    /// Advance one frame. `blinking` holds exactly while `elapsed_frames`
    /// lies in `[next_blink_at, next_blink_at + BLINK_FRAMES)`; crossing the
    /// window's end resets the timer and reseeds the threshold.
    pub fn advance(&mut self) {
        self.elapsed_frames += 1;
        if self.elapsed_frames >= self.next_blink_at + BLINK_FRAMES {
            self.blinking = false;
            self.elapsed_frames = 0;
            self.next_blink_at = self.rng.gen_range(self.delay_min..self.delay_max);
        } else {
            self.blinking = self.elapsed_frames >= self.next_blink_at;
        }
    }

    pub fn blinking(&self) -> bool {
        self.blinking
    }

    pub fn elapsed_frames(&self) -> u32 {
        self.elapsed_frames
    }

    pub fn next_blink_at(&self) -> u32 {
        self.next_blink_at
    }
}
