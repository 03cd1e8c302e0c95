// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use baklavify::app_config::{self, Config};
use baklavify::Substituter;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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
    /// Generate shell completions for baklavify
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Baklavify - casing-preserving word substitution
///
/// Reads plain text and rewrites every whole-word occurrence of the target
/// word (default "balaklava") to the replacement word (default "baklava"),
/// keeping the original casing and plural form.
#[derive(Parser, Debug)]
#[command(name = "baklavify")]
#[command(version)]
#[command(about = "Casing-preserving word substitution")]
#[command(long_about = "Baklavify rewrites whole-word matches of a target word, keeping their casing.

EXAMPLES:
    baklavify notes.txt                      # Rewrite a file to stdout
    cat notes.txt | baklavify                # Rewrite stdin
    baklavify -o out.txt notes.txt           # Write to a file
    baklavify -c conf.json notes.txt         # Use a custom word pair
    baklavify completions bash > baklavify.bash

CONFIGURATION:
    A JSON config may set target_word, replacement_word, plural_suffix,
    exempt_tags and log_level. Missing fields take their defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file; stdin when absent
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, label) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Start at info; the config or CLI may change the level afterwards
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "baklavify", &mut std::io::stdout());
        return Ok(());
    }

    run(cli)
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = match &options.config_path {
        Some(path) if path.exists() => Config::from_file(path)?,
        Some(path) => return Err(anyhow!("Config file not found: {}", path.display())),
        None => Config::default(),
    };

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run(options: CommandLineOptions) -> Result<()> {
    let config = load_config(&options)?;
    log::set_max_level(config.log_level.into());
    debug!("Loaded configuration: {:?}", config);

    let substituter = config.substituter()?;

    let reader: Box<dyn BufRead> = match &options.input_path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let writer: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    let (lines, changed) = rewrite_stream(&substituter, reader, writer)?;
    info!("Processed {} line(s), {} rewritten", lines, changed);
    Ok(())
}

/// Rewrite `reader` into `writer` line by line, keeping line endings.
/// Invalid UTF-8 is replaced with U+FFFD.
/// Returns `(lines, lines_changed)`.
fn rewrite_stream<R: BufRead, W: Write>(
    substituter: &Substituter,
    mut reader: R,
    mut writer: W,
) -> Result<(usize, usize)> {
    let mut buffer = Vec::new();
    let mut lines = 0;
    let mut changed = 0;

    loop {
        buffer.clear();
        if reader
            .read_until(b'\n', &mut buffer)
            .context("Failed to read input")?
            == 0
        {
            break;
        }
        lines += 1;
        let line = String::from_utf8_lossy(&buffer);
        if let Cow::Owned(_) = line {
            warn!("Line {} is not valid UTF-8, invalid bytes replaced", lines);
        }
        let rewritten = substituter.substitute(&line);
        if let Cow::Owned(_) = rewritten {
            changed += 1;
        }
        writer
            .write_all(rewritten.as_bytes())
            .context("Failed to write output")?;
    }

    writer.flush().context("Failed to flush output")?;
    Ok((lines, changed))
}
