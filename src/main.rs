// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use subresync::app_config::{self, Config};
use subresync::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a subtitle file and report its layout and entry count
    Check {
        /// Subtitle file to check
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Re-write a subtitle file with sequential index lines
    Normalize {
        /// Subtitle file to normalize
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (default: <INPUT stem>.resync.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Move a subtitle file onto the timing of another track
    Resync {
        /// Subtitle file whose texts are kept
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Subtitle file whose timing is used
        #[arg(short, long, value_name = "TIMING_SOURCE")]
        timing: PathBuf,

        /// Output file (default: <INPUT stem>.resync.srt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,

        /// Only print matched entries, write nothing
        #[arg(long)]
        matches_only: bool,
    },

    /// Generate shell completions for subresync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subresync - SubRip subtitle re-synchronization
///
/// Parses SubRip subtitles and moves one track onto the timing of another
/// by matching similar texts.
#[derive(Parser, Debug)]
#[command(name = "subresync")]
#[command(version)]
#[command(about = "Re-synchronize SubRip subtitles using another track's timing")]
#[command(long_about = "subresync parses SubRip subtitles and re-times one track using another one.

EXAMPLES:
    subresync check movie.fr.srt                          # Report layout and entry count
    subresync normalize movie.fr.srt -o clean.srt         # Re-write with index lines
    subresync resync movie.fr.srt -t movie.en.srt         # Write movie.fr.resync.srt
    subresync resync movie.fr.srt -t movie.en.srt --matches-only
    subresync completions bash > subresync.bash           # Generate bash completions

CONFIGURATION:
    Matching policy and output naming can be read from a JSON file given with
    --config. If that file doesn't exist, a default one is created.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // The logger accepts everything, the max level does the filtering
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = match &cli.config_path {
        Some(path) => Config::load_or_create(path)?,
        None => Config::default(),
    };

    // Command line wins over the config file
    match cli.log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subresync", &mut std::io::stdout());
            Ok(())
        }
        Commands::Check { input } => {
            let controller = Controller::with_config(config)?;
            let report = controller.check(&input)?;
            let layout = report
                .layout
                .map(|layout| layout.to_string())
                .unwrap_or_else(|| "empty".to_string());
            println!("{}: {} entries ({} layout)", report.path.display(), report.entries, layout);
            Ok(())
        }
        Commands::Normalize {
            input,
            output,
            force_overwrite,
        } => {
            let controller = Controller::with_config(config)?;
            controller.normalize(&input, output, force_overwrite)?;
            Ok(())
        }
        Commands::Resync {
            input,
            timing,
            output,
            force_overwrite,
            matches_only,
        } => {
            let controller = Controller::with_config(config)?;
            let report = controller.resync(&input, &timing, output, force_overwrite, matches_only)?;

            if matches_only {
                for pair in &report.matches {
                    println!("{} -> {}", pair.index + 1, pair.source_index + 1);
                }
            }
            info!("{} entries matched", report.matches.len());
            Ok(())
        }
    }
}
