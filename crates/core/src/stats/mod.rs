use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Sender};
use serde::{Deserialize, Serialize};

use crate::{Lane, Result};

/// Per-run counters. Fields are private so they can only grow.
#[derive(Debug, Clone)]
pub struct Statistics {
    comparisons: u64,
    accesses: u64,
    started: Instant,
}

impl Statistics {
    /// Starts a fresh record with the clock running from now.
    pub fn start() -> Self {
        Self {
            comparisons: 0,
            accesses: 0,
            started: Instant::now(),
        }
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn record_comparison(&mut self) {
        self.comparisons += 1;
    }

    pub fn record_accesses(&mut self, count: u64) {
        self.accesses += count;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            comparisons: self.comparisons,
            accesses: self.accesses,
            elapsed_seconds: self.elapsed().as_secs_f64(),
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::start()
    }
}

/// Point-in-time copy of a run's statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub comparisons: u64,
    pub accesses: u64,
    pub elapsed_seconds: f64,
}

/// Collaborator that shows statistics. Counts arrive once per frame, the
/// elapsed time on the ticker cadence from a helper thread.
pub trait StatsDisplay: Send + Sync {
    fn show_counts(&self, comparisons: u64, accesses: u64);
    fn show_elapsed(&self, seconds: f64);
}

/// Publishes statistics as tracing events.
#[derive(Debug, Clone, Copy)]
pub struct LogStatsDisplay {
    lane: Lane,
}

impl LogStatsDisplay {
    pub fn new(lane: Lane) -> Self {
        Self { lane }
    }
}

impl StatsDisplay for LogStatsDisplay {
    fn show_counts(&self, comparisons: u64, accesses: u64) {
        tracing::trace!(lane = %self.lane, comparisons, accesses, "stats");
    }

    fn show_elapsed(&self, seconds: f64) {
        tracing::debug!(lane = %self.lane, elapsed_seconds = seconds, "tick");
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct BoardState {
    comparisons: u64,
    accesses: u64,
    elapsed_seconds: f64,
    count_updates: u64,
    elapsed_updates: u64,
}

/// Keeps the latest published values so a caller can poll them.
#[derive(Debug, Default)]
pub struct StatsBoard {
    state: Mutex<BoardState>,
}

impl StatsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest `(comparisons, accesses)` pair.
    pub fn counts(&self) -> (u64, u64) {
        let state = self.read();
        (state.comparisons, state.accesses)
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.read().elapsed_seconds
    }

    /// Number of frame updates received.
    pub fn count_updates(&self) -> u64 {
        self.read().count_updates
    }

    /// Number of elapsed-time ticks received.
    pub fn elapsed_updates(&self) -> u64 {
        self.read().elapsed_updates
    }

    fn read(&self) -> BoardState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut BoardState)) {
        // Displays must never fail the run, so a poisoned board keeps going.
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        apply(&mut guard);
    }
}

impl StatsDisplay for StatsBoard {
    fn show_counts(&self, comparisons: u64, accesses: u64) {
        self.update(|state| {
            state.comparisons = comparisons;
            state.accesses = accesses;
            state.count_updates += 1;
        });
    }

    fn show_elapsed(&self, seconds: f64) {
        self.update(|state| {
            state.elapsed_seconds = seconds;
            state.elapsed_updates += 1;
        });
    }
}

/// Periodic elapsed-time publisher for one run.
///
/// Runs on its own thread so the cadence is independent of frame pacing.
/// Dropping the ticker (or calling [`ElapsedTicker::stop`]) closes the stop
/// channel and joins the thread.
#[derive(Debug)]
pub struct ElapsedTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTicker {
    pub const INTERVAL: Duration = Duration::from_millis(50);

    pub fn spawn(started: Instant, display: Arc<dyn StatsDisplay>, lane: Lane) -> Result<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(0);
        let ticks = channel::tick(Self::INTERVAL);

        let handle = thread::Builder::new()
            .name(format!("elapsed-{lane}"))
            .spawn(move || {
                loop {
                    crossbeam::select! {
                        recv(ticks) -> _ => display.show_elapsed(started.elapsed().as_secs_f64()),
                        recv(stop_rx) -> _ => break,
                    }
                }
                display.show_elapsed(started.elapsed().as_secs_f64());
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_only_grow() {
        let mut stats = Statistics::start();
        stats.record_comparison();
        stats.record_accesses(2);
        stats.record_accesses(1);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.comparisons, 1);
        assert_eq!(snapshot.accesses, 3);
        assert!(snapshot.elapsed_seconds >= 0.0);
    }

    #[test]
    fn board_keeps_latest_values() {
        let board = StatsBoard::new();
        board.show_counts(3, 4);
        board.show_counts(5, 8);
        board.show_elapsed(0.25);

        assert_eq!(board.counts(), (5, 8));
        assert_eq!(board.count_updates(), 2);
        assert_eq!(board.elapsed_updates(), 1);
        assert!((board.elapsed_seconds() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn ticker_publishes_until_stopped() {
        let board = Arc::new(StatsBoard::new());
        let ticker = ElapsedTicker::spawn(Instant::now(), board.clone(), Lane::A).unwrap();

        thread::sleep(Duration::from_millis(180));
        ticker.stop();

        let after_stop = board.elapsed_updates();
        assert!(after_stop >= 2, "expected several ticks, got {after_stop}");

        thread::sleep(Duration::from_millis(120));
        assert_eq!(board.elapsed_updates(), after_stop);
    }

    #[test]
    fn dropping_ticker_releases_thread() {
        let board = Arc::new(StatsBoard::new());
        {
            let _ticker = ElapsedTicker::spawn(Instant::now(), board.clone(), Lane::B).unwrap();
        }
        let settled = board.elapsed_updates();
        thread::sleep(Duration::from_millis(120));
        assert_eq!(board.elapsed_updates(), settled);
    }
}
