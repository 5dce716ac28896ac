//! Command-line options of the `trackimg` binary
//!
//! Parsing is done by `clap`; values with their own exit code (`-n`, `-v`,
//! the mandatory `-d`) are validated here so every failure maps to a
//! [`CliError`].

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::frame::BoundingBox;

/// Frames tracked when `-f` is not given
pub const DEFAULT_FRAME_COUNT: usize = 70;

/// Initial box when `-b` is not given
pub const DEFAULT_BOX: [f64; 4] = [153.0, 4.0, 41.0, 30.0];

#[derive(Parser, Debug)]
#[command(name = "trackimg")]
#[command(about = "Track one object through a numbered image sequence")]
struct Args {
    /// Directory holding 1.jpg, 2.jpg, ...
    #[arg(short = 'd', value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 'n', value_name = "N")]
    processors: Option<String>,

    /// Verbosity level (1 or 2); bare -v means 1
    #[arg(short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "1")]
    verbose: Option<String>,

    /// Initial bounding box as x,y,width,height
    #[arg(short = 'b', value_name = "X,Y,W,H")]
    bbox: Option<String>,

    /// Number of frames in the sequence
    #[arg(short = 'f', value_name = "FRAMES")]
    frames: Option<usize>,

    /// Random seed (defaults to the current time)
    #[arg(short = 's', value_name = "SEED")]
    seed: Option<u64>,

    /// Tracker configuration as JSON
    #[arg(short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the result log as JSON
    #[arg(short = 'o', value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

/// Log verbosity selected with `-v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Verbose,
    Debug,
}

/// Validated options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub directory: PathBuf,
    pub processors: usize,
    pub verbosity: Verbosity,
    pub initial_box: BoundingBox,
    pub frames: usize,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Result of parsing the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Options),
    /// `-h` was given; the rendered help text
    Help(String),
}

/// Fatal command-line and input errors, each with its own exit code
#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    BadArguments(String),
    BadProcessorCount(String),
    BadVerboseValue(String),
    MissingMandatoryArgument(String),
    CannotOpenInput(String),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::BadArguments(_) => 1,
            CliError::BadProcessorCount(_) => 2,
            CliError::BadVerboseValue(_) => 4,
            CliError::MissingMandatoryArgument(_) => 5,
            CliError::CannotOpenInput(_) => 6,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::BadArguments(msg) => write!(f, "Bad arguments: {}", msg),
            CliError::BadProcessorCount(v) => {
                write!(f, "Bad number of processors '{}': expected a positive integer", v)
            }
            CliError::BadVerboseValue(v) => write!(f, "Bad verbose level '{}': expected 1 or 2", v),
            CliError::MissingMandatoryArgument(name) => {
                write!(f, "Missing mandatory argument {}", name)
            }
            CliError::CannotOpenInput(msg) => write!(f, "Cannot open input: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl Options {
    /// Parse `args` (program name first)
    pub fn parse_from<I, T>(args: I) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = match Args::try_parse_from(args) {
            Ok(a) => a,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                return Ok(Invocation::Help(e.render().to_string()));
            }
            Err(e) => return Err(CliError::BadArguments(e.to_string().trim().to_string())),
        };

        let directory = args
            .directory
            .ok_or_else(|| CliError::MissingMandatoryArgument("-d <directory>".to_string()))?;

        let processors = match args.processors {
            None => 1,
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(CliError::BadProcessorCount(v)),
            },
        };

        let verbosity = match args.verbose.as_deref() {
            None => Verbosity::Quiet,
            Some("1") => Verbosity::Verbose,
            Some("2") => Verbosity::Debug,
            Some(v) => return Err(CliError::BadVerboseValue(v.to_string())),
        };

        let initial_box = match args.bbox {
            None => BoundingBox::new(DEFAULT_BOX[0], DEFAULT_BOX[1], DEFAULT_BOX[2], DEFAULT_BOX[3]),
            Some(text) => parse_box(&text)?,
        };

        let frames = args.frames.unwrap_or(DEFAULT_FRAME_COUNT);
        if frames == 0 {
            return Err(CliError::BadArguments("-f must be at least 1".to_string()));
        }

        Ok(Invocation::Run(Options {
            directory,
            processors,
            verbosity,
            initial_box,
            frames,
            seed: args.seed,
            config: args.config,
            output: args.output,
        }))
    }
}

fn parse_box(text: &str) -> Result<BoundingBox, CliError> {
    let values: Vec<f64> = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| CliError::BadArguments(format!("-b '{}' is not x,y,w,h", text)))?;
    match values.as_slice() {
        &[x, y, w, h] if x >= 0.0 && y >= 0.0 && w >= 1.0 && h >= 1.0 => Ok(BoundingBox::new(x, y, w, h)),
        _ => Err(CliError::BadArguments(format!("-b '{}' is not x,y,w,h", text))),
    }
}
