//! Session controller: owns the source values and the shared cancellation
//! signal, and runs one or two supervisors side by side.

use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    config, AlgorithmKind, AppConfig, AudioSink, CancelToken, FrameEmitter, Lane, LaneOutputs,
    Muted, PacingClock, Result, RunReport, RunSupervisor, SortVizError, SpeedSetting,
};

/// Recursive algorithms on degenerate input go deep; give run threads room.
const RUN_STACK_SIZE: usize = 16 * 1024 * 1024;
const AUDIO_SEED_OFFSET: u64 = 0x5eed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Complete,
    Aborted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => f.write_str("Complete"),
            Self::Aborted => f.write_str("Aborted"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub runs: Vec<RunReport>,
}

impl SessionReport {
    pub fn run(&self, lane: Lane) -> Option<&RunReport> {
        self.runs.iter().find(|run| run.lane == lane)
    }
}

/// Asked before starting a run whose runtime is unbounded.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Session context: source values, lane algorithms, speed and the shared
/// cancellation signal.
pub struct Session {
    values: Vec<i64>,
    mode: Mode,
    algorithms: [AlgorithmKind; 2],
    speed: SpeedSetting,
    cancel: CancelToken,
    audio: Arc<dyn AudioSink>,
    seed: Option<u64>,
    running: AtomicBool,
}

impl Session {
    pub fn new(values: Vec<i64>) -> Self {
        let defaults = AppConfig::default();
        Self {
            values,
            mode: defaults.mode,
            algorithms: [defaults.primary, defaults.secondary],
            speed: SpeedSetting::new(defaults.speed),
            cancel: CancelToken::new(),
            audio: Arc::new(Muted),
            seed: None,
            running: AtomicBool::new(false),
        }
    }

    /// Builds a session from configuration, resolving the array source.
    pub fn from_config(config: &AppConfig, audio: Arc<dyn AudioSink>) -> Result<Self> {
        let mut rng = seeded(config.seed);
        let values = config.source.resolve(&mut rng)?;
        Ok(Self::new(values)
            .with_mode(config.mode)
            .with_algorithm(Lane::A, config.primary)
            .with_algorithm(Lane::B, config.secondary)
            .with_speed(config.speed)
            .with_seed(config.seed)
            .with_audio(audio))
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_algorithm(mut self, lane: Lane, algorithm: AlgorithmKind) -> Self {
        self.algorithms[lane.index()] = algorithm;
        self
    }

    pub fn with_speed(self, speed: u8) -> Self {
        self.speed.set(speed);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_audio(mut self, audio: Arc<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn algorithm(&self, lane: Lane) -> AlgorithmKind {
        self.algorithms[lane.index()]
    }

    pub fn set_algorithm(&mut self, lane: Lane, algorithm: AlgorithmKind) {
        self.algorithms[lane.index()] = algorithm;
    }

    /// Shared speed handle; changes apply to running sorts at their next frame.
    pub fn speed(&self) -> &SpeedSetting {
        &self.speed
    }

    /// Clone of the cancellation signal, for stopping from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Lanes that take part in a start, in order.
    pub fn lanes(&self) -> Vec<(Lane, AlgorithmKind)> {
        let mut lanes = vec![(Lane::A, self.algorithm(Lane::A))];
        if self.mode == Mode::Compare {
            lanes.push((Lane::B, self.algorithm(Lane::B)));
        }
        lanes
    }

    /// Replaces the source with `size` random values.
    pub fn randomize(&mut self, size: usize) {
        let mut rng = seeded(self.seed);
        self.values = config::random_values(size, &mut rng);
    }

    /// Replaces the source with manually entered values. A rejected load
    /// leaves the current values untouched.
    pub fn load_manual(&mut self, input: &str) -> Result<usize> {
        match config::parse_manual(input) {
            Ok(values) => {
                self.values = values;
                Ok(self.values.len())
            }
            Err(err) => {
                tracing::warn!(%err, "manual data rejected");
                Err(err)
            }
        }
    }

    /// Requests every active run to stop at its next frame. Idempotent and
    /// harmless when nothing is running.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!(running = self.is_running(), "stop requested");
        }
        self.cancel.cancel();
    }

    /// Runs the configured lanes concurrently over independent copies of the
    /// source values and blocks until every run is terminal.
    ///
    /// `outputs` supplies the renderer and stats display of each lane.
    /// A stop requested while confirmation is pending starts nothing and
    /// reports [`SessionStatus::Aborted`] with no runs. Returns [`SortVizError::Unconfirmed`] without starting anything when
    /// an unbounded run is declined.
    pub fn start<F>(&self, confirm: &dyn Confirm, mut outputs: F) -> Result<SessionReport>
    where
        F: FnMut(Lane) -> LaneOutputs,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SortVizError::Busy);
        }
        let _running = RunningGuard(&self.running);
        self.cancel.reset();

        let lanes = self.lanes();
        let len = self.values.len();
        for &(_, algorithm) in &lanes {
            algorithm.validate(&self.values)?;
            if algorithm.requires_confirmation(len) {
                let prompt =
                    format!("{} on {len} elements might run forever. Continue?", algorithm.label());
                if !confirm.confirm(&prompt) {
                    tracing::info!(%algorithm, len, "unbounded run declined");
                    return Err(SortVizError::Unconfirmed { algorithm, len });
                }
            }
        }

        if self.cancel.is_cancelled() {
            tracing::info!("stopped before any lane started");
            return Ok(SessionReport {
                status: SessionStatus::Aborted,
                runs: Vec::new(),
            });
        }

        tracing::info!(
            mode = ?self.mode,
            lanes = ?lanes,
            len,
            speed = self.speed.get(),
            "session started"
        );

        let supervisors: Vec<RunSupervisor> = lanes
            .iter()
            .map(|&(lane, algorithm)| self.supervisor(lane, algorithm, outputs(lane)))
            .collect();

        let runs = thread::scope(|scope| -> Result<Vec<RunReport>> {
            let mut handles = Vec::with_capacity(supervisors.len());
            for supervisor in supervisors {
                let (lane, algorithm) = (supervisor.lane(), supervisor.algorithm());
                let handle = thread::Builder::new()
                    .name(format!("sort-run-{lane}"))
                    .stack_size(RUN_STACK_SIZE)
                    .spawn_scoped(scope, move || supervisor.run())?;
                handles.push((lane, algorithm, handle));
            }

            Ok(handles
                .into_iter()
                .map(|(lane, algorithm, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| RunReport::lost(lane, algorithm, "run thread panicked"))
                })
                .collect())
        })?;

        let status = if self.cancel.is_cancelled() {
            SessionStatus::Aborted
        } else {
            SessionStatus::Complete
        };
        tracing::info!(%status, "session finished");

        Ok(SessionReport { status, runs })
    }

    fn supervisor(&self, lane: Lane, algorithm: AlgorithmKind, outputs: LaneOutputs) -> RunSupervisor {
        let sequence = self.values.clone();
        let audio_rng = seeded(self.seed.map(|seed| seed ^ AUDIO_SEED_OFFSET));
        let emitter = FrameEmitter::new(
            self.cancel.clone(),
            PacingClock::new(self.speed.clone()),
            self.audio.clone(),
            outputs,
            &sequence,
            audio_rng,
        );
        RunSupervisor::new(lane, algorithm, sequence, emitter, seeded(self.seed))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("len", &self.values.len())
            .field("mode", &self.mode)
            .field("algorithms", &self.algorithms)
            .field("speed", &self.speed.get())
            .field("running", &self.is_running())
            .finish()
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
