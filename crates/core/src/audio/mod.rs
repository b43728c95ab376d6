use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};
use std::time::Duration;

const BASE_FREQUENCY_HZ: f32 = 200.0;
const FREQUENCY_SPAN_HZ: f32 = 600.0;
const TONE_LENGTH: Duration = Duration::from_millis(50);

/// Transient triangle tone derived from a normalised value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl Tone {
    /// Maps `ratio` (clamped to `[0, 1]`) onto the 200-800 Hz band.
    pub fn for_ratio(ratio: f32) -> Self {
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            frequency_hz: BASE_FREQUENCY_HZ + ratio * FREQUENCY_SPAN_HZ,
            duration: TONE_LENGTH,
        }
    }
}

/// Audio feedback collaborator. Fire and forget: `play` must return
/// promptly and must never fail.
pub trait AudioSink: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn play(&self, ratio: f32);
}

/// Sink that is always off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl AudioSink for Muted {
    fn is_enabled(&self) -> bool {
        false
    }

    fn play(&self, _ratio: f32) {}
}

/// Sink that turns each cue into a [`Tone`], logs it and keeps a tally.
#[derive(Debug, Default)]
pub struct ToneLog {
    enabled: AtomicBool,
    played: AtomicU64,
    last: Mutex<Option<Tone>>,
}

impl ToneLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            ..Default::default()
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Flips the sound switch and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn played(&self) -> u64 {
        self.played.load(Ordering::Relaxed)
    }

    pub fn last_tone(&self) -> Option<Tone> {
        match self.last.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl AudioSink for ToneLog {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn play(&self, ratio: f32) {
        if !self.is_enabled() {
            return;
        }
        let tone = Tone::for_ratio(ratio);
        tracing::trace!(frequency_hz = tone.frequency_hz, "tone");
        self.played.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(tone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_frequency_spans_band() {
        assert_eq!(Tone::for_ratio(0.0).frequency_hz, 200.0);
        assert_eq!(Tone::for_ratio(1.0).frequency_hz, 800.0);
        assert_eq!(Tone::for_ratio(0.5).frequency_hz, 500.0);
        assert_eq!(Tone::for_ratio(7.0).frequency_hz, 800.0);
        assert_eq!(Tone::for_ratio(f32::NAN).frequency_hz, 200.0);
    }

    #[test]
    fn disabled_log_ignores_cues() {
        let sink = ToneLog::new(false);
        sink.play(0.3);
        assert_eq!(sink.played(), 0);
        assert!(sink.last_tone().is_none());

        assert!(sink.toggle());
        sink.play(0.5);
        assert_eq!(sink.played(), 1);
        assert_eq!(sink.last_tone().unwrap().frequency_hz, 500.0);
        assert!(!sink.toggle());
    }

    #[test]
    fn muted_sink_is_always_off() {
        assert!(!Muted.is_enabled());
        Muted.play(1.0);
    }
}
