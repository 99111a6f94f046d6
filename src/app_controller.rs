use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};
use crate::alignment::{AlignmentEngine, AlignmentReport};
use crate::app_config::Config;
use crate::cue_parser::{self, Cue};
use crate::document::{Document, NodeId};
use crate::errors::{AppError, DocumentError};
use crate::file_utils::FileManager;
use crate::playback::{LogOnlyDriver, PlaybackDriver, ScriptTagDriver};
use crate::subtitle_source::{DefaultSource, SubtitleSource};

// @module: Application controller for transcript injection

/// Result of one successful injection
#[derive(Debug, Clone)]
pub struct InjectionOutcome {
    // @field: Element whose text was aligned
    pub content: NodeId,
    // @field: Cues parsed from the subtitle track
    pub cues: Vec<Cue>,
    // @field: Alignment diagnostics
    pub report: AlignmentReport,
}

/// What happened to a single page in file or folder mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Written(PathBuf),
    AlreadyExists(PathBuf),
    NothingInjected,
}

/// Counters for a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Where subtitle tracks come from
    source: Arc<dyn SubtitleSource>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let source = Arc::new(DefaultSource::with_config(&config.source));
        Self::with_source(config, source)
    }

    // @method: Create a controller that fetches subtitles through `source`
    pub fn with_source(config: Config, source: Arc<dyn SubtitleSource>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn playback_driver(&self) -> Box<dyn PlaybackDriver> {
        if self.config.emit_player_script {
            Box::new(ScriptTagDriver)
        } else {
            Box::new(LogOnlyDriver)
        }
    }

    /// Fetch a subtitle track, align it with `#content_id` and mark the matches.
    ///
    /// Never fails: every problem is logged and yields `None` when the
    /// document was left untouched.
    pub async fn init_injection(
        &self,
        doc: &mut Document,
        subtitle_url: &str,
        content_id: &str,
        player_id: &str,
    ) -> Option<InjectionOutcome> {
        let body = match self.source.fetch(subtitle_url).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to load subtitles from {}: {}", subtitle_url, e);
                return None;
            }
        };

        let cues = cue_parser::parse_cues(&body);
        debug!("Parsed {} cue(s) from {}", cues.len(), subtitle_url);

        let Some(content) = doc.get_element_by_id(content_id) else {
            warn!("{}, nothing to align", DocumentError::ElementNotFound(content_id.to_string()));
            return None;
        };

        if cues.is_empty() {
            warn!("No cues found in {}, nothing to align", subtitle_url);
            return None;
        }

        let engine = match self.config.alignment.to_options(player_id) {
            Ok(options) => AlignmentEngine::new(options),
            Err(e) => {
                error!("Invalid alignment settings: {:#}", e);
                return None;
            }
        };

        if engine.has_markers(doc, content) {
            warn!("#{} already contains transcript markers, leaving it untouched", content_id);
            return None;
        }

        let report = engine.align(doc, content, &cues);
        report.log();

        self.playback_driver().attach(doc, content, content_id, player_id);

        Some(InjectionOutcome { content, cues, report })
    }

    /// Fetch and parse a subtitle track without touching any document
    pub async fn load_cues(&self, location: &str) -> Result<Vec<Cue>, AppError> {
        let body = self.source.fetch(location).await?;
        Ok(cue_parser::parse_cues(&body))
    }

    /// Inject markers into one page and write the result
    pub async fn run(
        &self,
        html_file: PathBuf,
        subtitles: &str,
        output: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<PageStatus> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&html_file) {
            return Err(AppError::File(format!("Input file does not exist: {}", html_file.display())).into());
        }

        let output_path = output.unwrap_or_else(|| FileManager::generate_output_path(&html_file, None));
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, output already exists (use -f to force overwrite)", output_path.display());
            return Ok(PageStatus::AlreadyExists(output_path));
        }

        let html = FileManager::read_to_string(&html_file)?;
        let mut doc = Document::parse(&html);

        let alignment = &self.config.alignment;
        let outcome = self
            .init_injection(&mut doc, subtitles, &alignment.content_id, &alignment.player_id)
            .await;

        let Some(outcome) = outcome else {
            return Ok(PageStatus::NothingInjected);
        };

        FileManager::write_to_file(&output_path, &doc.to_html())?;
        info!(
            "Success: {} ({} marker(s) in {})",
            output_path.display(),
            outcome.report.markers_inserted,
            Self::format_duration(start_time.elapsed())
        );

        Ok(PageStatus::Written(output_path))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Pages in `input_dir` that have a companion subtitle track
    pub fn find_pages(input_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut pages = Vec::new();
        for ext in ["html", "htm"] {
            for page in FileManager::find_files(input_dir, ext)? {
                if FileManager::is_synced_output(&page) {
                    continue;
                }
                match FileManager::companion_subtitle(&page) {
                    Some(track) => pages.push((page, track)),
                    None => debug!("No subtitle track next to {}", page.display()),
                }
            }
        }
        Ok(pages)
    }

    /// Process every page in a directory that has a sibling `.vtt` track
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {}", input_dir.display())).into());
        }

        let pages = Self::find_pages(&input_dir)?;
        if pages.is_empty() {
            return Err(anyhow!("No pages with a companion subtitle track found in: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(pages.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();
        for (page, track) in &pages {
            let file_name = page
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let location = track.to_string_lossy();
            match self.run(page.clone(), &location, None, force_overwrite).await {
                Ok(PageStatus::Written(_)) => summary.processed += 1,
                Ok(_) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.errors
        );

        Ok(summary)
    }
}
