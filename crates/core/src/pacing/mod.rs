//! Pacing clock: turns the user-facing speed level into a per-frame delay
//! and owns the one suspension primitive used by running sorts.

use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 85;

const DELAY_EXPONENT: f64 = 1.4;
const SWEEP_DELAY_LARGE: Duration = Duration::from_millis(2);
const SWEEP_DELAY_SMALL: Duration = Duration::from_millis(10);
const SWEEP_LARGE_THRESHOLD: usize = 200;

/// Maps a speed level to the pause inserted after each frame.
///
/// The curve is `floor((101 - speed)^1.4)` milliseconds, which gives fine
/// control at the slow end. The top speed is treated as instant.
pub fn delay_for(speed: u8) -> Duration {
    let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    if speed == MAX_SPEED {
        return Duration::ZERO;
    }

    let millis = f64::from(101 - speed).powf(DELAY_EXPONENT).floor();
    Duration::from_millis(millis as u64)
}

/// Fixed per-index delay of the confirmation sweep, independent of speed.
pub fn sweep_delay(len: usize) -> Duration {
    if len > SWEEP_LARGE_THRESHOLD {
        SWEEP_DELAY_LARGE
    } else {
        SWEEP_DELAY_SMALL
    }
}

/// Shared handle to the session speed. Clones observe the same value, so a
/// change made while a run is in flight applies from its next frame.
#[derive(Debug, Clone)]
pub struct SpeedSetting {
    level: Arc<AtomicU8>,
}

impl SpeedSetting {
    pub fn new(speed: u8) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(speed.clamp(MIN_SPEED, MAX_SPEED))),
        }
    }

    pub fn get(&self) -> u8 {
        self.level.load(Ordering::Relaxed)
    }

    /// Stores a new level, clamped to `[MIN_SPEED, MAX_SPEED]`.
    pub fn set(&self, speed: u8) {
        self.level
            .store(speed.clamp(MIN_SPEED, MAX_SPEED), Ordering::Relaxed);
    }

    /// Short human readable bucket for the current level.
    pub fn label(&self) -> &'static str {
        match self.get() {
            91.. => "Inst",
            51..=90 => "Fast",
            _ => "Slow",
        }
    }
}

impl Default for SpeedSetting {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

/// Stateless apart from the speed handle it reads on every call.
#[derive(Debug, Clone, Default)]
pub struct PacingClock {
    speed: SpeedSetting,
}

impl PacingClock {
    pub fn new(speed: SpeedSetting) -> Self {
        Self { speed }
    }

    pub fn speed(&self) -> &SpeedSetting {
        &self.speed
    }

    /// Delay for the speed level as it is right now.
    pub fn delay(&self) -> Duration {
        delay_for(self.speed.get())
    }

    /// Blocks the calling run for `delay`. The wait is never cut short;
    /// cancellation is noticed at the next frame boundary instead.
    pub fn suspend(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
