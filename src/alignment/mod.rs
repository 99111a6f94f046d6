/*!
 * Cue-to-document alignment.
 *
 * The engine works in one synchronous pass over a designated subtree:
 * 1. `char_map`: snapshot of the subtree's visible text, char by char
 * 2. `normalize`: comparable projection of that text with a map back to raw positions
 * 3. `matcher`: forward-only search of each cue's normalized text
 * 4. `blocks`: split matches at block-level boundaries
 * 5. `mutation`: wrap each resulting range in a timing marker, last range first
 */

pub mod blocks;
pub mod char_map;
pub mod matcher;
pub mod mutation;
pub mod normalize;

use log::{debug, info, warn};
use serde::Serialize;

pub use blocks::{SafeRange, is_block_element, split_at_block_boundaries};
pub use char_map::{CharEntry, CharacterMap};
pub use matcher::{CueMatch, MatchLocator, MatchOutcome};
pub use mutation::{MarkerSpec, MutationStats, wrap_range, wrap_ranges};
pub use normalize::{NormalizedProjection, normalize_cue_text, normalize_text};

use crate::cue_parser::Cue;
use crate::document::{Document, NodeId, Selector};

/// Settings for one alignment run
#[derive(Debug, Clone, Default)]
pub struct AlignmentOptions {
    /// Marker element shape
    pub marker: MarkerSpec,
    /// Regions whose text is never scanned or wrapped
    pub excluded: Vec<Selector>,
    /// Metadata prefixes stripped when a cue's literal text is not found
    pub fallback_prefixes: Vec<String>,
}

/// Diagnostic summary of an alignment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub total_cues: usize,
    pub matched_cues: usize,
    pub unmatched: Vec<String>,
    pub safe_ranges: usize,
    pub markers_inserted: usize,
    pub ranges_skipped: usize,
}

impl AlignmentReport {
    pub fn is_complete(&self) -> bool {
        self.total_cues > 0 && self.unmatched.is_empty()
    }

    /// Emit the report through the logger
    pub fn log(&self) {
        info!("Injected {} / {} matches.", self.matched_cues, self.total_cues);
        debug!(
            "{} safe range(s), {} marker(s) inserted, {} skipped",
            self.safe_ranges, self.markers_inserted, self.ranges_skipped
        );
        if !self.unmatched.is_empty() {
            warn!("{} cue(s) could not be matched:", self.unmatched.len());
            for text in &self.unmatched {
                warn!("  unmatched: {:?}", text);
            }
        }
    }
}

/// One-shot aligner of cues against a document subtree
#[derive(Debug, Clone, Default)]
pub struct AlignmentEngine {
    options: AlignmentOptions,
}

impl AlignmentEngine {
    pub fn new(options: AlignmentOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AlignmentOptions {
        &self.options
    }

    /// Whether the subtree already carries markers of this engine's shape
    pub fn has_markers(&self, doc: &Document, root: NodeId) -> bool {
        let marker = &self.options.marker;
        doc.descendants(root).into_iter().any(|node| {
            doc.element_name(node) == Some(marker.tag.as_str())
                && doc.attribute(node, &marker.start_attribute).is_some()
                && doc.node(node).is_some_and(|n| n.has_class(&marker.class))
        })
    }

    /// Align `cues` with the text under `root`, inserting markers in place
    pub fn align(&self, doc: &mut Document, root: NodeId, cues: &[Cue]) -> AlignmentReport {
        let mut report = AlignmentReport {
            total_cues: cues.len(),
            ..AlignmentReport::default()
        };
        if cues.is_empty() {
            return report;
        }

        let char_map = CharacterMap::build(doc, root, &self.options.excluded);
        let projection = NormalizedProjection::build(char_map.text());
        debug!(
            "Scanning {} raw chars ({} normalized)",
            char_map.len(),
            projection.len()
        );

        let locator = MatchLocator::new(&self.options.fallback_prefixes);
        let outcome = locator.locate(cues, &projection, char_map.len());
        report.matched_cues = outcome.matches.len();
        report.unmatched = outcome.unmatched;

        let ranges = split_at_block_boundaries(&outcome.matches, &char_map, doc, root);
        report.safe_ranges = ranges.len();

        let stats = wrap_ranges(doc, &char_map, &ranges, &self.options.marker);
        report.markers_inserted = stats.inserted;
        report.ranges_skipped = stats.skipped;

        report
    }
}
