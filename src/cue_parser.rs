use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// @module: Subtitle cue parsing

// @const: Timing line regex, `HH:MM:SS.mmm --> HH:MM:SS.mmm` with optional hours
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})\s+-->\s+(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})")
        .unwrap()
});

// @struct: Single timed cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End minus start in ms, may be negative
    pub duration_ms: i64,

    // @field: Cue text, lines joined by single spaces
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(start_ms: u64, duration_ms: i64, text: impl Into<String>) -> Self {
        Cue {
            start_ms,
            duration_ms,
            text: text.into(),
        }
    }

    /// End time in milliseconds, clamped at zero
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add_signed(self.duration_ms)
    }

    /// Parse a `HH:MM:SS.mmm` (or `MM:SS.mmm`) timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', '.'][..]).collect();

        let (hours, minutes, seconds, millis) = match parts.as_slice() {
            [h, m, s, ms] => (*h, *m, *s, *ms),
            [m, s, ms] => ("0", *m, *s, *ms),
            _ => return Err(anyhow!("Invalid timestamp format: {}", timestamp)),
        };

        let hours: u64 = hours.parse().context("Failed to parse hours")?;
        let minutes: u64 = minutes.parse().context("Failed to parse minutes")?;
        let seconds: u64 = seconds.parse().context("Failed to parse seconds")?;
        let millis: u64 = millis.parse().context("Failed to parse milliseconds")?;

        if millis_len(timestamp) != 3 {
            return Err(anyhow!("Milliseconds must have three digits: {}", timestamp));
        }

        to_millis(hours, minutes, seconds, millis)
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }

    /// Format a timestamp in milliseconds as `HH:MM:SS.mmm`
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms())
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

fn millis_len(timestamp: &str) -> usize {
    timestamp.trim().rsplit('.').next().map_or(0, str::len)
}

/// `None` when the total does not fit a signed millisecond count
fn to_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
        .filter(|&ms| i64::try_from(ms).is_ok())
}

/// Parse subtitle text into cues, in file order.
///
/// Blocks are separated by blank lines. A block contributes a cue when it
/// contains a timing line followed by at least one non-empty text line;
/// every other block (header, notes, malformed timings) is skipped.
pub fn parse_cues(content: &str) -> Vec<Cue> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cues = Vec::new();
    let mut skipped = 0usize;

    for block in split_blocks(&normalized) {
        match parse_block(&block) {
            Some(cue) => cues.push(cue),
            None => {
                skipped += 1;
                debug!("Skipping block without a usable cue: {:?}", block.first());
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} block(s) while parsing subtitles", skipped);
    }

    if cues.is_empty() && !normalized.trim().is_empty() {
        warn!("No cues found in subtitle content");
    }

    cues
}

fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    // Lines before the timing line are cue identifiers
    let timing_pos = lines.iter().position(|line| TIMING_REGEX.is_match(line.trim()))?;
    let caps = TIMING_REGEX.captures(lines[timing_pos].trim())?;

    let start_ms = timestamp_from_captures(&caps, 1)?;
    let end_ms = timestamp_from_captures(&caps, 5)?;

    let text = lines[timing_pos + 1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return None;
    }

    Some(Cue {
        start_ms,
        duration_ms: end_ms as i64 - start_ms as i64,
        text,
    })
}

fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
    let hours: u64 = match caps.get(start_idx) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u64 = caps.get(start_idx + 1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(start_idx + 2)?.as_str().parse().ok()?;
    let millis: u64 = caps.get(start_idx + 3)?.as_str().parse().ok()?;

    to_millis(hours, minutes, seconds, millis)
}
