//! Instrumented operations. Algorithms read values freely but every
//! mutation goes through [`SortOps::swap`] or [`SortOps::write`], so the
//! frame history is a complete record of the run.

use rand::{rngs::StdRng, Rng};

use crate::{FrameEmitter, Highlight, Result, Statistics};

fn identity(value: i64) -> i64 {
    value
}

pub struct SortOps<'r> {
    sequence: &'r mut [i64],
    stats: &'r mut Statistics,
    emitter: &'r mut FrameEmitter,
    rng: &'r mut StdRng,
    key: fn(i64) -> i64,
}

impl<'r> SortOps<'r> {
    pub fn new(
        sequence: &'r mut [i64],
        stats: &'r mut Statistics,
        emitter: &'r mut FrameEmitter,
        rng: &'r mut StdRng,
    ) -> Self {
        Self {
            sequence,
            stats,
            emitter,
            rng,
            key: identity,
        }
    }

    /// Orders comparisons by `key(value)` instead of the raw value, so tests
    /// can tag equal keys and check stability. Distribution sorts ignore it.
    #[cfg(test)]
    pub(crate) fn keyed_by(mut self, key: fn(i64) -> i64) -> Self {
        self.key = key;
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Uninstrumented read.
    pub fn get(&self, index: usize) -> i64 {
        self.sequence[index]
    }

    pub fn values(&self) -> &[i64] {
        &self.sequence[..]
    }

    pub fn stats(&self) -> &Statistics {
        &*self.stats
    }

    /// Pure ordering test on two already read values.
    pub fn is_greater(&self, left: i64, right: i64) -> bool {
        (self.key)(left) > (self.key)(right)
    }

    /// Counts a comparison, shows `i` and `j` as compared and reports whether
    /// the element at `i` is greater than the one at `j`.
    pub fn compare(&mut self, i: usize, j: usize) -> Result<bool> {
        self.stats.record_comparison();
        self.emit(&[i, j], Highlight::Comparing)?;
        Ok(self.is_greater(self.sequence[i], self.sequence[j]))
    }

    /// Counts a comparison and emits its frame when the algorithm makes the
    /// decision inline.
    pub fn probe(&mut self, indices: &[usize]) -> Result<()> {
        self.stats.record_comparison();
        self.emit(indices, Highlight::Comparing)
    }

    /// Counts a read of `index` and shows it, without comparing anything.
    pub fn inspect(&mut self, index: usize) -> Result<()> {
        self.stats.record_accesses(1);
        self.emit(&[index], Highlight::Comparing)
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.stats.record_accesses(2);
        self.sequence.swap(i, j);
        self.emit(&[i, j], Highlight::Swapping)
    }

    pub fn write(&mut self, index: usize, value: i64) -> Result<()> {
        self.stats.record_accesses(1);
        self.sequence[index] = value;
        self.emit(&[index], Highlight::Swapping)
    }

    /// Counts a read that has no frame of its own.
    pub fn count_access(&mut self) {
        self.stats.record_accesses(1);
    }

    /// Uniform index in `0..=upper`.
    pub fn random_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..=upper)
    }

    fn emit(&mut self, indices: &[usize], kind: Highlight) -> Result<()> {
        self.emitter
            .emit(&self.sequence[..], &*self.stats, indices, kind)
    }
}

#[cfg(test)]
pub(crate) mod harness {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        AlgorithmKind, CancelToken, FrameEmitter, FrameRecorder, LaneOutputs, Muted, PacingClock,
        Result, SpeedSetting, Statistics, StatsBoard,
    };

    use super::SortOps;

    /// Silent, unpaced run context for exercising algorithms directly.
    pub struct Harness {
        pub values: Vec<i64>,
        pub stats: Statistics,
        pub emitter: FrameEmitter,
        pub rng: StdRng,
        pub frames: FrameRecorder,
        pub cancel: CancelToken,
    }

    impl Harness {
        pub fn new(values: &[i64]) -> Self {
            Self::with_renderer(values, FrameRecorder::default())
        }

        pub fn with_renderer(values: &[i64], frames: FrameRecorder) -> Self {
            let cancel = CancelToken::new();
            let emitter = FrameEmitter::new(
                cancel.clone(),
                PacingClock::new(SpeedSetting::new(100)),
                Arc::new(Muted),
                LaneOutputs::new(frames.clone(), Arc::new(StatsBoard::new())),
                values,
                StdRng::seed_from_u64(1),
            );
            Self {
                values: values.to_vec(),
                stats: Statistics::start(),
                emitter,
                rng: StdRng::seed_from_u64(42),
                frames,
                cancel,
            }
        }

        pub fn ops(&mut self) -> SortOps<'_> {
            SortOps::new(
                &mut self.values,
                &mut self.stats,
                &mut self.emitter,
                &mut self.rng,
            )
        }

        pub fn run(&mut self, kind: AlgorithmKind) -> Result<()> {
            kind.run(&mut self.ops())
        }

        pub fn run_keyed(&mut self, kind: AlgorithmKind, key: fn(i64) -> i64) -> Result<()> {
            kind.run(&mut self.ops().keyed_by(key))
        }

        pub fn swap_frames(&self) -> usize {
            self.frames
                .count_with(crate::Highlight::Swapping)
                .expect("recorder lock")
        }
    }
}
