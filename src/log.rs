//! Logging for the command-line program.
//!
//! Messages are printed to the terminal, with warnings and errors going to stderr. When an
//! output folder is given, they are also written to log files in it.
use anyhow::{Context, Result, bail, ensure};
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// The environment variable which overrides the log level from the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "POTATO_YP_LOG_LEVEL";

/// The log level used when none is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Receives info, debug and trace messages
const LOG_INFO_FILE_NAME: &str = "potato_yp_info.log";

/// Receives warnings and errors
const LOG_ERROR_FILE_NAME: &str = "potato_yp_error.log";

static LOGGER_INIT: AtomicBool = AtomicBool::new(false);

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.load(Ordering::Acquire)
}

/// Initialise the program logger.
///
/// `POTATO_YP_LOG_LEVEL` takes precedence over `log_level`, which normally comes from the
/// settings file. Levels are `off`, `error`, `warn`, `info`, `debug` and `trace`.
///
/// # Arguments
///
/// * `log_level` - The configured log level (an empty string means the default)
/// * `log_dir` - Folder in which to create log files, if any
pub fn init(log_level: &str, log_dir: Option<&Path>) -> Result<()> {
    ensure!(!is_logger_initialised(), "Logger already initialised");

    let level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(from_env) => parse_log_level(&from_env)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) if log_level.is_empty() => parse_log_level(DEFAULT_LOG_LEVEL)?,
        Err(_) => parse_log_level(log_level)?,
    };

    let mut dispatch = Dispatch::new().chain(terminal_dispatch(level));
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(file_dispatch(log_dir, level)?);
    }
    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.store(true, Ordering::Release);

    Ok(())
}

/// Convert a log level string (case insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

fn level_colours() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta)
}

/// Format a log message as `[HH:MM:SS LEVEL target] message`
fn format_line(
    record: &Record,
    message: &Arguments,
    colours: Option<ColoredLevelConfig>,
) -> String {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    match colours {
        Some(colours) => {
            let level = colours.color(record.level());
            format!("[{timestamp} {level} {target}] {message}")
        }
        None => format!("[{timestamp} {} {target}] {message}", record.level()),
    }
}

/// Output to stdout and stderr, coloured if they are terminals
fn terminal_dispatch(level: LevelFilter) -> Dispatch {
    let stdout_colours = std::io::stdout().is_terminal().then(level_colours);
    let stderr_colours = std::io::stderr().is_terminal().then(level_colours);

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > Level::Warn)
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(record, message, stdout_colours)
                    ));
                })
                .level(level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "{}",
                        format_line(record, message, stderr_colours)
                    ));
                })
                .level(level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        )
}

/// Output to plain log files in `log_dir`.
///
/// The info log always records at least `info` messages, even if the terminal is quieter.
fn file_dispatch(log_dir: &Path, level: LevelFilter) -> Result<Dispatch> {
    let create = |file_name: &str| {
        let file_path = log_dir.join(file_name);
        File::create(&file_path)
            .with_context(|| format!("Could not create log file {}", file_path.display()))
    };

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{}", format_line(record, message, None)));
        })
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > Level::Warn)
                .level(level.max(LevelFilter::Info))
                .chain(create(LOG_INFO_FILE_NAME)?),
        )
        .chain(
            Dispatch::new()
                .level(LevelFilter::Warn)
                .chain(create(LOG_ERROR_FILE_NAME)?),
        ))
}
