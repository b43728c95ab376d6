//! Core library for the Sort Visualiser application.
//!
//! Sorting algorithms run as step-scheduled tasks: every compare, swap and
//! write goes through an instrumented operation set that publishes a frame,
//! waits for the pacing delay and checks the shared cancellation signal.
//! Each module owns one layer of that pipeline, from the pacing clock up to
//! the session controller that runs one or two sorts side by side.

pub mod algorithms;
pub mod audio;
pub mod config;
pub mod error;
pub mod frame;
pub mod ops;
pub mod pacing;
pub mod record;
pub mod render;
pub mod run;
pub mod session;
pub mod stats;

pub use algorithms::{AlgorithmKind, BOGO_SAFE_LEN};
pub use audio::{AudioSink, Muted, Tone, ToneLog};
pub use config::{AppConfig, ArraySource};
pub use error::{Result, SortVizError};
pub use frame::{CancelToken, FrameEmitter, LaneOutputs};
pub use ops::SortOps;
pub use pacing::{PacingClock, SpeedSetting};
pub use record::{FrameRecorder, RecordedFrame, RecordingSettings};
pub use render::{BarRenderer, Highlight, HighlightState, LogRenderer, Renderer};
pub use run::{Lane, RunReport, RunState, RunSupervisor};
pub use session::{Confirm, Mode, Session, SessionReport, SessionStatus};
pub use stats::{ElapsedTicker, LogStatsDisplay, Statistics, StatsBoard, StatsDisplay, StatsSnapshot};
