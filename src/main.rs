//! `trackimg`: track one object through a directory of numbered frames.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{error, info, Level};

use lars_track::options::{CliError, Invocation, Options, Verbosity};
use lars_track::sequence::FrameSequence;
use lars_track::{LoggingReporter, SimpleRng, TrackerConfig, TrackingController};

/// Exit code for failures after the input was opened
const TRACKING_FAILED: u8 = 7;

fn main() -> ExitCode {
    let options = match Options::parse_from(std::env::args_os()) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help(text)) => {
            println!("{}", text);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("trackimg: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_logging(options.verbosity);

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<CliError>()
                .map_or(TRACKING_FAILED, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbosity: Verbosity) {
    let level = match verbosity {
        Verbosity::Quiet => Level::WARN,
        Verbosity::Verbose => Level::INFO,
        Verbosity::Debug => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(options: &Options) -> Result<()> {
    #[cfg(feature = "rayon")]
    rayon::ThreadPoolBuilder::new()
        .num_threads(options.processors)
        .build_global()
        .context("cannot size the worker pool")?;
    #[cfg(not(feature = "rayon"))]
    if options.processors > 1 {
        tracing::warn!("built without rayon; ignoring -n {}", options.processors);
    }

    let config = match &options.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    let seed = options.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(1)
    });

    info!("Options:");
    info!("  + Video dataset        : {}", options.directory.display());
    info!("  + Number of processors : {}", options.processors);
    info!("  + Frames               : {}", options.frames);
    info!("  + Initial box          : {:?}", options.initial_box);
    info!("  + Seed                 : {}", seed);

    let sequence = FrameSequence::new(&options.directory);
    let first = sequence
        .load(1)
        .map_err(|e| CliError::CannotOpenInput(e.to_string()))?;

    let mut rng = SimpleRng::new(seed);
    let mut tracker = TrackingController::initialize(&first, options.initial_box, config, &mut rng)
        .context("cannot initialize the tracker on frame 1")?;

    let mut reporter = LoggingReporter::new();
    let started = Instant::now();
    for index in 2..=options.frames {
        let frame = sequence
            .load(index)
            .map_err(|e| CliError::CannotOpenInput(e.to_string()))?;

        let tick = Instant::now();
        tracker
            .step_with_reporter(&frame, &mut rng, &mut reporter)
            .with_context(|| format!("tracking failed on frame {}", index))?;

        let elapsed = tick.elapsed().as_secs_f64();
        let average = (index - 1) as f64 / started.elapsed().as_secs_f64();
        info!(
            "frame {}: {:.1} ms, average {:.2} fps",
            index,
            elapsed * 1000.0,
            average
        );
    }

    for record in tracker.results() {
        println!(
            "{} {} {} {} {}",
            record.frame, record.bbox.position.x, record.bbox.position.y, record.bbox.size.x, record.bbox.size.y
        );
    }

    if let Some(path) = &options.output {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), tracker.results())
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("results written to {}", path.display());
    }

    Ok(())
}
