use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::alignment::{AlignmentOptions, MarkerSpec};
use crate::document::Selector;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Alignment and marker settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Subtitle retrieval settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Append a player initialisation script after the content element
    #[serde(default)]
    pub emit_player_script: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Alignment configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignmentConfig {
    // @field: Id of the element whose text is aligned
    #[serde(default = "default_content_id")]
    pub content_id: String,

    // @field: Id of the media player handed to the playback component
    #[serde(default = "default_player_id")]
    pub player_id: String,

    // @field: Marker element tag
    #[serde(default = "default_marker_tag")]
    pub marker_tag: String,

    // @field: Class identifying transcript units
    #[serde(default = "default_marker_class")]
    pub marker_class: String,

    // @field: Initial playback state class
    #[serde(default = "default_unread_class")]
    pub unread_class: String,

    // @field: Attribute carrying the cue start in ms
    #[serde(default = "default_start_attribute")]
    pub start_attribute: String,

    // @field: Attribute carrying the cue duration in ms
    #[serde(default = "default_duration_attribute")]
    pub duration_attribute: String,

    // @field: Regions never scanned for text (`tag`, `#id`, `.class`)
    #[serde(default = "default_excluded_selectors")]
    pub excluded_selectors: Vec<String>,

    // @field: Metadata prefixes stripped from cues that do not match verbatim
    #[serde(default = "default_fallback_prefixes")]
    pub fallback_prefixes: Vec<String>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            content_id: default_content_id(),
            player_id: default_player_id(),
            marker_tag: default_marker_tag(),
            marker_class: default_marker_class(),
            unread_class: default_unread_class(),
            start_attribute: default_start_attribute(),
            duration_attribute: default_duration_attribute(),
            excluded_selectors: default_excluded_selectors(),
            fallback_prefixes: default_fallback_prefixes(),
        }
    }
}

impl AlignmentConfig {
    /// Parse the configured exclusion selectors
    pub fn selectors(&self) -> Result<Vec<Selector>> {
        self.excluded_selectors
            .iter()
            .map(|s| s.parse::<Selector>())
            .collect()
    }

    /// Build engine options; the player element is always excluded
    pub fn to_options(&self, player_id: &str) -> Result<AlignmentOptions> {
        let mut excluded = self.selectors()?;
        if !player_id.is_empty() {
            excluded.push(Selector::Id(player_id.to_string()));
        }

        Ok(AlignmentOptions {
            marker: MarkerSpec {
                tag: self.marker_tag.clone(),
                class: self.marker_class.clone(),
                unread_class: self.unread_class.clone(),
                start_attribute: self.start_attribute.clone(),
                duration_attribute: self.duration_attribute.clone(),
            },
            excluded,
            fallback_prefixes: self.fallback_prefixes.clone(),
        })
    }
}

/// Subtitle retrieval configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_content_id() -> String {
    "content".to_string()
}

fn default_player_id() -> String {
    "hyperplayer".to_string()
}

fn default_marker_tag() -> String {
    "span".to_string()
}

fn default_marker_class() -> String {
    "hyperaudio-transcript-text".to_string()
}

fn default_unread_class() -> String {
    "unread".to_string()
}

fn default_start_attribute() -> String {
    "data-m".to_string()
}

fn default_duration_attribute() -> String {
    "data-d".to_string()
}

fn default_excluded_selectors() -> Vec<String> {
    [
        "nav", "form", "audio", "video", "script", "style", "noscript", "template",
        ".comment-form", "#comments",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fallback_prefixes() -> Vec<String> {
    vec!["published on".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("cuesync/{}", env!("CARGO_PKG_VERSION"))
}

fn is_attribute_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let alignment = &self.alignment;

        if alignment.content_id.trim().is_empty() {
            return Err(anyhow!("Content element id must not be empty"));
        }

        if !is_attribute_name(&alignment.marker_tag) {
            return Err(anyhow!("Invalid marker tag: '{}'", alignment.marker_tag));
        }

        for attribute in [&alignment.start_attribute, &alignment.duration_attribute] {
            if !is_attribute_name(attribute) {
                return Err(anyhow!("Invalid marker attribute name: '{}'", attribute));
            }
        }

        if alignment.marker_class.split_whitespace().count() != 1 {
            return Err(anyhow!("Marker class must be a single class name"));
        }

        alignment.selectors().context("Invalid exclusion selector")?;

        if self.source.timeout_secs == 0 {
            return Err(anyhow!("Source timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            alignment: AlignmentConfig::default(),
            source: SourceConfig::default(),
            emit_player_script: false,
            log_level: LogLevel::default(),
        }
    }
}
