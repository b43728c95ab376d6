//! Frame emitter: the single place where a run's intermediate state is
//! published and where cancellation is observed.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use rand::{rngs::StdRng, Rng};

use crate::{
    AudioSink, Highlight, HighlightState, PacingClock, Renderer, Result, SortVizError, Statistics,
    StatsDisplay,
};

/// Frames paced slower than this always get an audio cue.
const AUDIO_ALWAYS_ABOVE: Duration = Duration::from_millis(5);
/// Chance of an audio cue for faster frames.
const AUDIO_SAMPLE_PROBABILITY: f64 = 0.2;

/// Cancellation signal shared by every run started in one session.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Safe to call any number of times.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Per-lane collaborators handed to a run.
pub struct LaneOutputs {
    pub renderer: Box<dyn Renderer>,
    pub stats: Arc<dyn StatsDisplay>,
}

impl LaneOutputs {
    pub fn new(renderer: impl Renderer + 'static, stats: Arc<dyn StatsDisplay>) -> Self {
        Self {
            renderer: Box::new(renderer),
            stats,
        }
    }
}

impl std::fmt::Debug for LaneOutputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaneOutputs").finish()
    }
}

pub struct FrameEmitter {
    cancel: CancelToken,
    pacing: PacingClock,
    audio: Arc<dyn AudioSink>,
    renderer: Box<dyn Renderer>,
    stats: Arc<dyn StatsDisplay>,
    highlights: HighlightState,
    value_ceiling: i64,
    audio_rng: StdRng,
}

impl FrameEmitter {
    /// Builds an emitter for a run over `sequence`. The largest source value
    /// is remembered for normalising audio cues.
    pub fn new(
        cancel: CancelToken,
        pacing: PacingClock,
        audio: Arc<dyn AudioSink>,
        outputs: LaneOutputs,
        sequence: &[i64],
        audio_rng: StdRng,
    ) -> Self {
        Self {
            cancel,
            pacing,
            audio,
            renderer: outputs.renderer,
            stats: outputs.stats,
            highlights: HighlightState::new(sequence.len()),
            value_ceiling: sequence.iter().copied().max().unwrap_or(0),
            audio_rng,
        }
    }

    pub fn highlights(&self) -> &HighlightState {
        &self.highlights
    }

    pub fn pacing(&self) -> &PacingClock {
        &self.pacing
    }

    pub fn stats_display(&self) -> Arc<dyn StatsDisplay> {
        self.stats.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Publishes one frame.
    ///
    /// Fails with [`SortVizError::Cancelled`] before touching any
    /// collaborator when the session has been stopped.
    pub fn emit(
        &mut self,
        sequence: &[i64],
        stats: &Statistics,
        indices: &[usize],
        kind: Highlight,
    ) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(SortVizError::Cancelled);
        }

        self.stats.show_counts(stats.comparisons(), stats.accesses());
        self.highlights.apply(indices, kind);
        self.renderer.render(sequence, self.highlights.as_slice())?;

        let delay = self.pacing.delay();
        if let Some(&first) = indices.first() {
            self.cue(sequence, first, delay);
        }
        self.pacing.suspend(delay);
        Ok(())
    }

    /// Clears transient highlights and redraws without a cancellation check.
    pub fn redraw(&mut self, sequence: &[i64]) -> Result<()> {
        self.highlights.apply(&[], Highlight::Idle);
        self.renderer.render(sequence, self.highlights.as_slice())
    }

    /// Marks `index` as settled and redraws.
    pub fn settle(&mut self, sequence: &[i64], index: usize) -> Result<()> {
        self.highlights.settle(index);
        self.renderer.render(sequence, self.highlights.as_slice())
    }

    /// Sends a cue straight to the audio collaborator if it is enabled.
    pub fn chime(&self, ratio: f32) {
        if self.audio.is_enabled() {
            self.audio.play(ratio);
        }
    }

    fn cue(&mut self, sequence: &[i64], index: usize, delay: Duration) {
        if !self.audio.is_enabled() {
            return;
        }
        if delay <= AUDIO_ALWAYS_ABOVE && !self.audio_rng.random_bool(AUDIO_SAMPLE_PROBABILITY) {
            return;
        }
        let Some(&value) = sequence.get(index) else {
            return;
        };
        let ratio = if self.value_ceiling > 0 {
            (value as f64 / self.value_ceiling as f64).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        self.audio.play(ratio);
    }
}

impl std::fmt::Debug for FrameEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameEmitter")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("highlights", &self.highlights)
            .finish()
    }
}
