//! Run supervisor: drives one algorithm over one sequence to a terminal
//! state and performs the confirmation sweep afterwards.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{
    pacing, AlgorithmKind, ElapsedTicker, FrameEmitter, Result, SortOps, SortVizError, Statistics,
    StatsSnapshot,
};

/// Which side of the session a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    A,
    B,
}

impl Lane {
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Pending,
    Running,
    /// The algorithm returned normally.
    Settled,
    /// The cancellation signal was observed at a frame boundary.
    Aborted,
    /// The algorithm or a collaborator failed.
    Faulted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Aborted | Self::Faulted)
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub lane: Lane,
    pub algorithm: AlgorithmKind,
    pub state: RunState,
    pub stats: StatsSnapshot,
    pub sequence: Vec<i64>,
    /// Whether the confirmation sweep reached the last index.
    pub swept: bool,
    pub fault: Option<String>,
}

impl RunReport {
    /// Report for a run whose thread died before it could report itself.
    pub fn lost(lane: Lane, algorithm: AlgorithmKind, fault: impl Into<String>) -> Self {
        Self {
            lane,
            algorithm,
            state: RunState::Faulted,
            stats: StatsSnapshot::default(),
            sequence: Vec::new(),
            swept: false,
            fault: Some(fault.into()),
        }
    }
}

/// Owns everything one run touches: the sequence, its emitter (and with it
/// the highlight state), the statistics and the shuffle RNG.
#[derive(Debug)]
pub struct RunSupervisor {
    lane: Lane,
    algorithm: AlgorithmKind,
    sequence: Vec<i64>,
    emitter: FrameEmitter,
    rng: StdRng,
    state: RunState,
}

impl RunSupervisor {
    pub fn new(
        lane: Lane,
        algorithm: AlgorithmKind,
        sequence: Vec<i64>,
        emitter: FrameEmitter,
        rng: StdRng,
    ) -> Self {
        Self {
            lane,
            algorithm,
            sequence,
            emitter,
            rng,
            state: RunState::Pending,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs to a terminal state. Never panics and never returns an error:
    /// every failure is folded into the report.
    pub fn run(mut self) -> RunReport {
        self.state = RunState::Running;
        let mut stats = Statistics::start();
        tracing::debug!(
            lane = %self.lane,
            algorithm = %self.algorithm,
            len = self.sequence.len(),
            "run started"
        );

        let (state, fault) = match self.drive(&mut stats) {
            Ok(()) => (RunState::Settled, None),
            Err(SortVizError::Cancelled) => (RunState::Aborted, None),
            Err(err) => (RunState::Faulted, Some(err.to_string())),
        };
        self.state = state;

        let mut swept = false;
        let mut fault = fault;
        if state == RunState::Settled {
            match self.sweep() {
                Ok(done) => swept = done,
                Err(err) => {
                    self.state = RunState::Faulted;
                    fault = Some(err.to_string());
                }
            }
        }

        let snapshot = stats.snapshot();
        match &fault {
            Some(fault) => {
                tracing::warn!(lane = %self.lane, algorithm = %self.algorithm, %fault, "run faulted")
            }
            None => tracing::info!(
                lane = %self.lane,
                algorithm = %self.algorithm,
                state = ?self.state,
                comparisons = snapshot.comparisons,
                accesses = snapshot.accesses,
                elapsed_seconds = snapshot.elapsed_seconds,
                "run finished"
            ),
        }

        RunReport {
            lane: self.lane,
            algorithm: self.algorithm,
            state: self.state,
            stats: snapshot,
            sequence: self.sequence,
            swept,
            fault,
        }
    }

    /// Executes the algorithm while the elapsed ticker runs. The ticker is
    /// released on every exit path, panics included.
    fn drive(&mut self, stats: &mut Statistics) -> Result<()> {
        let ticker = ElapsedTicker::spawn(stats.started(), self.emitter.stats_display(), self.lane)?;
        let algorithm = self.algorithm;

        let outcome = {
            let mut ops = SortOps::new(&mut self.sequence, stats, &mut self.emitter, &mut self.rng);
            panic::catch_unwind(AssertUnwindSafe(|| algorithm.run(&mut ops)))
        };
        ticker.stop();

        outcome.unwrap_or_else(|payload| Err(SortVizError::msg(panic_message(payload.as_ref()))))
    }

    /// Marks every index settled from left to right. Returns `false` if the
    /// session was stopped before the sweep reached the end.
    fn sweep(&mut self) -> Result<bool> {
        let len = self.sequence.len();
        let delay = pacing::sweep_delay(len);
        self.emitter.redraw(&self.sequence)?;

        for index in 0..len {
            if self.emitter.is_cancelled() {
                return Ok(false);
            }
            self.emitter.settle(&self.sequence, index)?;
            if index % 4 == 0 {
                self.emitter.chime(index as f32 / len as f32);
            }
            self.emitter.pacing().suspend(delay);
        }
        Ok(true)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("run panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("run panicked: {message}")
    } else {
        "run panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use super::*;
    use crate::{
        CancelToken, FrameRecorder, Highlight, LaneOutputs, Muted, PacingClock, Renderer,
        SpeedSetting, StatsBoard,
    };

    fn supervisor(
        algorithm: AlgorithmKind,
        values: &[i64],
        cancel: CancelToken,
        renderer: impl Renderer + 'static,
    ) -> RunSupervisor {
        let emitter = FrameEmitter::new(
            cancel,
            PacingClock::new(SpeedSetting::new(100)),
            Arc::new(Muted),
            LaneOutputs::new(renderer, Arc::new(StatsBoard::new())),
            values,
            StdRng::seed_from_u64(3),
        );
        RunSupervisor::new(
            Lane::A,
            algorithm,
            values.to_vec(),
            emitter,
            StdRng::seed_from_u64(4),
        )
    }

    /// Cancels the session once it has drawn `after` frames.
    struct CancelAfter {
        frames: usize,
        after: usize,
        cancel: CancelToken,
        recorder: FrameRecorder,
    }

    impl Renderer for CancelAfter {
        fn render(&mut self, sequence: &[i64], highlights: &[Highlight]) -> Result<()> {
            self.recorder.render(sequence, highlights)?;
            self.frames += 1;
            if self.frames == self.after {
                self.cancel.cancel();
            }
            Ok(())
        }
    }

    struct Broken;

    impl Renderer for Broken {
        fn render(&mut self, _sequence: &[i64], _highlights: &[Highlight]) -> Result<()> {
            Err(SortVizError::msg("display went away"))
        }
    }

    #[test]
    fn settled_run_sweeps_every_index() {
        let recorder = FrameRecorder::default();
        let run = supervisor(
            AlgorithmKind::Heap,
            &[4, 1, 3, 2],
            CancelToken::new(),
            recorder.clone(),
        );
        assert_eq!(run.state(), RunState::Pending);

        let report = run.run();
        assert_eq!(report.state, RunState::Settled);
        assert!(report.swept);
        assert_eq!(report.sequence, vec![1, 2, 3, 4]);

        let last = recorder.last().unwrap().unwrap();
        assert_eq!(last.highlights, vec![Highlight::Settled; 4]);
    }

    #[test]
    fn cancellation_aborts_at_the_next_frame() {
        let cancel = CancelToken::new();
        let recorder = FrameRecorder::default();
        let renderer = CancelAfter {
            frames: 0,
            after: 5,
            cancel: cancel.clone(),
            recorder: recorder.clone(),
        };
        let values: Vec<i64> = (0..30).rev().collect();
        let report = supervisor(AlgorithmKind::Bubble, &values, cancel, renderer).run();

        assert_eq!(report.state, RunState::Aborted);
        assert!(!report.swept);
        assert_eq!(recorder.len().unwrap(), 5);

        // Only the operation that observed the stop may have landed after
        // the last published frame, and bubble sort alternates compare/swap.
        let last = recorder.last().unwrap().unwrap();
        let mut permuted = report.sequence.clone();
        permuted.sort();
        assert_eq!(permuted, (0..30).collect::<Vec<_>>());
        let differing = last
            .sequence
            .iter()
            .zip(&report.sequence)
            .filter(|(a, b)| a != b)
            .count();
        assert!(differing == 0 || differing == 2);
    }

    #[test]
    fn renderer_failure_faults_the_run() {
        let report =
            supervisor(AlgorithmKind::Quick, &[3, 2, 1], CancelToken::new(), Broken).run();
        assert_eq!(report.state, RunState::Faulted);
        assert!(report.fault.unwrap().contains("display went away"));
    }

    #[test]
    fn trivial_run_settles_without_work() {
        let report = supervisor(
            AlgorithmKind::Merge,
            &[7],
            CancelToken::new(),
            FrameRecorder::default(),
        )
        .run();
        assert_eq!(report.state, RunState::Settled);
        assert_eq!(report.stats.comparisons, 0);
        assert_eq!(report.stats.accesses, 0);
        assert_eq!(report.sequence, vec![7]);
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "run panicked: boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "run panicked: bang");
        let payload: Box<dyn Any + Send> = Box::new(5_u8);
        assert_eq!(panic_message(payload.as_ref()), "run panicked");
    }

    #[test]
    fn states_know_when_they_are_final() {
        assert!(!RunState::Pending.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Aborted.is_terminal());
        assert!(RunState::Faulted.is_terminal());
    }
}
