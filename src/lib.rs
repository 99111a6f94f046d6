/*!
 * # cuesync - caption cue alignment for HTML transcripts
 *
 * Takes a WebVTT subtitle track and the HTML page holding its transcript,
 * finds each cue's text in the page and wraps it in a marker element carrying
 * the cue's start time and duration, so a playback component can highlight
 * the transcript while the media plays.
 *
 * ## Features
 *
 * - WebVTT cue parsing (`HH:MM:SS.mmm` and `MM:SS.mmm` timings)
 * - Normalized, forward-only text matching with metadata prefix fallback
 * - Matches split at block-level boundaries so markers never cross paragraphs
 * - In-place DOM mutation that keeps nested inline markup intact
 * - Subtitle tracks from local files or HTTP(S)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `cue_parser`: WebVTT cue parsing
 * - `document`: Arena-based HTML document model (tokenizer, tree builder, serializer)
 * - `alignment`: Cue-to-text alignment engine:
 *   - `alignment::char_map`: Visible text snapshot of a subtree
 *   - `alignment::normalize`: Comparable text projection
 *   - `alignment::matcher`: Forward-only cue location
 *   - `alignment::blocks`: Block-boundary splitting
 *   - `alignment::mutation`: Marker insertion
 * - `subtitle_source`: Subtitle retrieval (HTTP or file)
 * - `playback`: Hand-off to the transcript player
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod cue_parser;
pub mod document;
pub mod alignment;
pub mod subtitle_source;
pub mod playback;
pub mod file_utils;
pub mod app_controller;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cue_parser::{Cue, parse_cues};
pub use document::{Document, NodeId, Selector};
pub use alignment::{AlignmentEngine, AlignmentOptions, AlignmentReport, MarkerSpec};
pub use subtitle_source::{DefaultSource, SubtitleLocation, SubtitleSource};
pub use playback::{LogOnlyDriver, PlaybackDriver, ScriptTagDriver};
pub use app_controller::{Controller, InjectionOutcome};
pub use errors::{AppError, DocumentError, FetchError};
