// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::app_config::Config;
use app_controller::{ChapterOptions, Controller};

mod alignment;
mod app_config;
mod app_controller;
mod audio_probe;
mod duration_cache;
mod errors;
mod file_utils;
mod providers;
mod subtitle_writer;
mod text_cleaner;
mod timing_resolver;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate subtitle tracks for one chapter or all chapters (default command)
    #[command(alias = "generate")]
    Generate(GenerateArgs),

    /// List available reciters without running the pipeline
    ListReciters {
        /// Configuration file path
        #[arg(long, default_value = "conf.json")]
        config_path: String,
    },

    /// List available translations without running the pipeline
    ListTranslations {
        /// Configuration file path
        #[arg(long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for quran-srt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Chapter (surah) number to process (1-114)
    #[arg(short = 'c', long)]
    chapter: Option<u32>,

    /// Process all chapters in sequence
    #[arg(short, long)]
    all: bool,

    /// Reciter ID from the catalog
    #[arg(short, long)]
    reciter: Option<u32>,

    /// Translator name query (matched against catalog translation names)
    #[arg(short, long)]
    translation: Option<String>,

    /// Do NOT clean translation text (HTML, footnote markers)
    #[arg(long)]
    no_clean: bool,

    /// Do NOT add verse numbering to the text tracks
    #[arg(long)]
    no_numbers: bool,

    /// Download the chapter recording (or per-verse clips when absent)
    #[arg(short, long)]
    download_audio: bool,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// quran-srt - time-synchronized Quran subtitle generator
///
/// Generates a pair of SRT subtitle files (Arabic plus a translation) and a
/// CSV verse table for a chapter, using authoritative verse timestamps when
/// the catalog publishes them and measured clip durations otherwise.
#[derive(Parser, Debug)]
#[command(name = "quran-srt")]
#[command(version = "0.3.0")]
#[command(about = "Quran subtitle and timing generator")]
#[command(long_about = "quran-srt generates time-synchronized SRT subtitles and a CSV verse table
for Quran chapters, per reciter and translation.

EXAMPLES:
    quran-srt -c 67 -r 8 --download-audio       # One chapter with audio
    quran-srt -c 1 -r 7 -t \"T. Usmani\"          # Specific translation
    quran-srt --all -r 7                        # Full sweep over all chapters
    quran-srt list-reciters                     # Show reciter catalog
    quran-srt list-translations                 # Show translation catalog
    quran-srt completions bash > quran-srt.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chapter (surah) number to process (1-114)
    #[arg(short = 'c', long)]
    chapter: Option<u32>,

    /// Process all chapters in sequence
    #[arg(short, long)]
    all: bool,

    /// Reciter ID from the catalog
    #[arg(short, long)]
    reciter: Option<u32>,

    /// Translator name query (matched against catalog translation names)
    #[arg(short, long)]
    translation: Option<String>,

    /// Do NOT clean translation text (HTML, footnote markers)
    #[arg(long)]
    no_clean: bool,

    /// Do NOT add verse numbering to the text tracks
    #[arg(long)]
    no_numbers: bool,

    /// Download the chapter recording (or per-verse clips when absent)
    #[arg(short, long)]
    download_audio: bool,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "quran-srt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::ListReciters { config_path }) => {
            let controller = controller_for_listing(&config_path)?;
            let reciters = controller.list_reciters().await?;
            println!("---- RECITERS ----");
            for r in reciters {
                match r.style {
                    Some(style) if !style.is_empty() => {
                        println!("{:>3} | {} ({})", r.id, r.name, style)
                    }
                    _ => println!("{:>3} | {}", r.id, r.name),
                }
            }
            Ok(())
        }
        Some(Commands::ListTranslations { config_path }) => {
            let controller = controller_for_listing(&config_path)?;
            let translations = controller.list_translations().await?;
            println!("---- TRANSLATIONS (ALL LANGUAGES) ----");
            for t in translations {
                println!("{:>5} | {} | {}", t.id, t.language_name, t.name);
            }
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            run_generate(GenerateArgs {
                chapter: cli.chapter,
                all: cli.all,
                reciter: cli.reciter,
                translation: cli.translation,
                no_clean: cli.no_clean,
                no_numbers: cli.no_numbers,
                download_audio: cli.download_audio,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
            .await
        }
    }
}

/// Build a controller for catalog listing commands, honoring the same
/// configuration file the generate command uses
fn controller_for_listing(config_path: &str) -> Result<Controller> {
    let config = Config::load_or_create(config_path)?;
    config.validate().context("Configuration validation failed")?;
    Controller::with_config(config)
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_level));
    }

    // Load or create configuration
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let reciter = options.reciter.unwrap_or(config.default_reciter);
    let translation = options
        .translation
        .clone()
        .unwrap_or_else(|| config.default_translation.clone());

    let chapter_options = ChapterOptions {
        clean_translation: !options.no_clean,
        add_numbers: !options.no_numbers,
        download_audio: options.download_audio,
    };

    let total_chapters = config.total_chapters;
    let controller = Controller::with_config(config)?;

    if options.all {
        // The sweep isolates and reports per-chapter failures; it never
        // aborts early and the invocation itself succeeds.
        controller
            .process_all(reciter, &translation, &chapter_options)
            .await?;
        Ok(())
    } else {
        let chapter = options
            .chapter
            .ok_or_else(|| anyhow!("--chapter is required unless using --all"))?;

        if chapter == 0 || chapter > total_chapters {
            return Err(anyhow!(
                "chapter must be between 1 and {}, got {}",
                total_chapters,
                chapter
            ));
        }

        controller
            .process_chapter(chapter, reciter, &translation, &chapter_options)
            .await
    }
}
