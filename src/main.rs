// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use cuesync::app_config::{self, Config};
use cuesync::app_controller::{Controller, PageStatus};

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

/// Options shared by every command that loads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct InjectArgs {
    /// HTML page to annotate
    #[arg(value_name = "HTML")]
    html_file: PathBuf,

    /// Subtitle track URL or path (WebVTT)
    #[arg(short, long, value_name = "URL|PATH")]
    subtitles: String,

    /// Id of the element whose text is aligned
    #[arg(long)]
    content_id: Option<String>,

    /// Id of the media player element
    #[arg(long)]
    player_id: Option<String>,

    /// Output file (defaults to `<stem>.synced.html` next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Append a player initialisation script after the content element
    #[arg(long)]
    emit_player_script: bool,
}

#[derive(Args, Debug)]
struct FolderArgs {
    /// Directory searched for pages with a sibling `.vtt` track
    #[arg(value_name = "DIR")]
    input_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Append a player initialisation script after the content element
    #[arg(long)]
    emit_player_script: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wrap transcript text of one page in timing markers
    Inject(InjectArgs),

    /// Process every page in a directory that has a companion subtitle track
    Folder(FolderArgs),

    /// Print the cues of a subtitle track as JSON
    Parse {
        /// Subtitle track URL or path
        #[arg(value_name = "URL|PATH")]
        location: String,
    },

    /// Generate shell completions for cuesync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// cuesync - caption cue alignment for HTML transcripts
#[derive(Parser, Debug)]
#[command(name = "cuesync")]
#[command(version)]
#[command(about = "Align subtitle cues with the text of an HTML page")]
#[command(long_about = "cuesync locates each subtitle cue in the text of a page and wraps it in a
marker element carrying its start time and duration, so a transcript player can
highlight the text in sync with playback.

EXAMPLES:
    cuesync inject post.html -s post.vtt                  # Writes post.synced.html
    cuesync inject post.html -s https://cdn/x.vtt -o out.html
    cuesync inject post.html -s post.vtt --content-id article --player-id audio
    cuesync folder ./site -f                              # Every page with a sibling .vtt
    cuesync parse post.vtt                                # Inspect parsed cues
    cuesync completions bash > cuesync.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
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
        // Level filtering is left to `log::max_level` so it can change after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cuesync", &mut std::io::stdout());
            Ok(())
        }
        Commands::Parse { location } => {
            let controller = Controller::with_config(load_config(&cli.common)?)?;
            let cues = controller.load_cues(&location).await?;
            println!("{}", serde_json::to_string_pretty(&cues)?);
            Ok(())
        }
        Commands::Inject(args) => run_inject(&cli.common, args).await,
        Commands::Folder(args) => run_folder(&cli.common, args).await,
    }
}

/// Load the configuration file, creating a default one when missing
fn load_config(common: &CommonArgs) -> Result<Config> {
    let config_path = Path::new(&common.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", common.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    } else {
        // Just update the max level without reinitializing the logger
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_inject(common: &CommonArgs, options: InjectArgs) -> Result<()> {
    let mut config = load_config(common)?;

    // Override config with CLI options if provided
    if let Some(content_id) = options.content_id {
        config.alignment.content_id = content_id;
    }
    if let Some(player_id) = options.player_id {
        config.alignment.player_id = player_id;
    }
    if options.emit_player_script {
        config.emit_player_script = true;
    }

    let controller = Controller::with_config(config)?;
    let html_file = options.html_file.clone();
    match controller
        .run(options.html_file, &options.subtitles, options.output, options.force_overwrite)
        .await?
    {
        PageStatus::Written(_) | PageStatus::AlreadyExists(_) => {}
        PageStatus::NothingInjected => {
            warn!("Nothing was injected into {}, no output written", html_file.display());
        }
    }
    Ok(())
}

async fn run_folder(common: &CommonArgs, options: FolderArgs) -> Result<()> {
    let mut config = load_config(common)?;
    if options.emit_player_script {
        config.emit_player_script = true;
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run_folder(options.input_dir, options.force_overwrite).await?;

    if summary.errors > 0 {
        error!("{} page(s) failed", summary.errors);
        return Err(anyhow!("Folder processing finished with errors"));
    }
    info!("Done");
    Ok(())
}
