use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use crossbeam::channel;
use sort_visualiser_core::{
    AlgorithmKind, AppConfig, ArraySource, AudioSink, BarRenderer, Confirm, Lane, LaneOutputs,
    LogRenderer, LogStatsDisplay, Mode, Muted, RunReport, Session, SessionReport, ToneLog,
};
use tracing_subscriber::EnvFilter;

fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_session(args),
        Commands::List => {
            list_algorithms();
            Ok(())
        }
    }
}

fn run_session(args: RunArgs) -> sort_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    let audio: Arc<dyn AudioSink> = if config.sound {
        Arc::new(ToneLog::new(true))
    } else {
        Arc::new(Muted)
    };
    let session = Session::from_config(&config, audio)?;
    tracing::info!(
        len = session.values().len(),
        speed = session.speed().get(),
        pace = session.speed().label(),
        "data loaded"
    );

    let assume_yes = args.yes;
    let confirm = move |prompt: &str| assume_yes || prompt_yes_no(prompt);
    let bars = args.bars;
    let deadline = args
        .stop_after
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis);

    let report = start_with_deadline(&session, &confirm, deadline, |lane| {
        lane_outputs(lane, bars)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Starts the session and, when `deadline` is set, stops it once the
/// deadline passes. Returns as soon as the session finishes.
fn start_with_deadline<F>(
    session: &Session,
    confirm: &dyn Confirm,
    deadline: Option<Duration>,
    outputs: F,
) -> sort_visualiser_core::Result<SessionReport>
where
    F: FnMut(Lane) -> LaneOutputs,
{
    let Some(deadline) = deadline else {
        return session.start(confirm, outputs);
    };

    let (done_tx, done_rx) = channel::bounded::<()>(0);
    thread::scope(|scope| {
        scope.spawn(move || {
            crossbeam::select! {
                recv(channel::after(deadline)) -> _ => {
                    tracing::info!(?deadline, "stop deadline reached");
                    session.stop();
                }
                recv(done_rx) -> _ => {}
            }
        });

        let report = session.start(confirm, outputs);
        drop(done_tx);
        report
    })
}

fn lane_outputs(lane: Lane, bars: bool) -> LaneOutputs {
    let stats = Arc::new(LogStatsDisplay::new(lane));
    if bars {
        LaneOutputs::new(BarRenderer::new(io::stdout(), lane).with_color(true), stats)
    } else {
        LaneOutputs::new(LogRenderer::new(lane), stats)
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "YES")
}

fn print_report(report: &SessionReport) {
    for run in &report.runs {
        print_run(run);
    }
    println!("status: {}", report.status);
}

fn print_run(run: &RunReport) {
    println!(
        "[{}] {:<22} {:<8} comparisons={:<8} accesses={:<8} time={:.2}s",
        run.lane,
        run.algorithm.label(),
        format!("{:?}", run.state),
        run.stats.comparisons,
        run.stats.accesses,
        run.stats.elapsed_seconds,
    );
    if let Some(fault) = &run.fault {
        println!("    fault: {fault}");
    }
}

fn list_algorithms() {
    for algorithm in AlgorithmKind::ALL {
        println!("{:<10} {}", algorithm.name(), algorithm.label());
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort one data set, optionally racing a second algorithm against it.
    Run(RunArgs),
    /// Print the available algorithms.
    List,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Algorithm for lane A.
    #[arg(short, long)]
    algorithm: Option<AlgorithmKind>,
    /// Algorithm for lane B; enables compare mode.
    #[arg(short = 'b', long)]
    versus: Option<AlgorithmKind>,
    /// Number of random values to generate.
    #[arg(short = 'n', long, conflicts_with = "values")]
    size: Option<usize>,
    /// Comma separated integers to sort instead of random data.
    #[arg(long)]
    values: Option<String>,
    /// Speed from 1 (slowest) to 100 (instant).
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    speed: Option<u8>,
    /// Emit audio cues.
    #[arg(long)]
    sound: bool,
    /// Seed for reproducible data and shuffles.
    #[arg(long)]
    seed: Option<u64>,
    /// Confirm unbounded runs without prompting.
    #[arg(short, long)]
    yes: bool,
    /// Request a stop after this many milliseconds.
    #[arg(long)]
    stop_after: Option<u64>,
    /// Draw every frame as a row of bars on stdout.
    #[arg(long)]
    bars: bool,
    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn resolve_config(&self) -> sort_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };

        if let Some(algorithm) = self.algorithm {
            config.primary = algorithm;
        }
        if let Some(algorithm) = self.versus {
            config.secondary = algorithm;
            config.mode = Mode::Compare;
        }
        if let Some(size) = self.size {
            config.source = ArraySource::Random { size };
        }
        if let Some(values) = &self.values {
            config.source = ArraySource::Manual {
                values: values.clone(),
            };
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.sound {
            config.sound = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}
