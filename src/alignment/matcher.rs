use log::debug;

use super::normalize::{NormalizedProjection, normalize_cue_text};
use crate::cue_parser::Cue;

/// Raw text range believed to hold a cue, end exclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueMatch<'a> {
    pub cue: &'a Cue,
    pub raw_start: usize,
    pub raw_end: usize,
}

/// Result of locating every cue in order
#[derive(Debug, Default)]
pub struct MatchOutcome<'a> {
    pub matches: Vec<CueMatch<'a>>,
    /// Original text of each cue that could not be located
    pub unmatched: Vec<String>,
}

/// Forward-only locator of normalized cue text in a normalized projection.
///
/// Each search starts where the previous successful match ended, so cues are
/// expected to appear in the document in track order and no text is claimed twice.
#[derive(Debug, Clone)]
pub struct MatchLocator {
    fallback_prefixes: Vec<String>,
}

impl MatchLocator {
    /// `fallback_prefixes` are metadata prefixes (e.g. "published on") stripped
    /// from a cue whose literal text cannot be found
    pub fn new(fallback_prefixes: &[String]) -> Self {
        Self {
            fallback_prefixes: fallback_prefixes
                .iter()
                .map(|p| normalize_cue_text(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn locate<'a>(
        &self,
        cues: &'a [Cue],
        projection: &NormalizedProjection,
        raw_len: usize,
    ) -> MatchOutcome<'a> {
        let mut outcome = MatchOutcome::default();
        let mut last_found_index = 0usize;

        for cue in cues {
            let needle = normalize_cue_text(&cue.text);

            let found = projection
                .find_from(&needle, last_found_index)
                .or_else(|| self.find_with_fallback(&needle, projection, last_found_index));

            match found {
                Some((start, end)) => {
                    let raw = projection.raw_index_of();
                    let raw_start = raw[start];
                    let raw_end = if end < raw.len() { raw[end - 1] + 1 } else { raw_len };
                    outcome.matches.push(CueMatch {
                        cue,
                        raw_start,
                        raw_end,
                    });
                    last_found_index = end;
                }
                None => {
                    debug!("No match for cue at {}ms: {:?}", cue.start_ms, cue.text);
                    outcome.unmatched.push(cue.text.clone());
                }
            }
        }

        outcome
    }

    fn find_with_fallback(
        &self,
        needle: &str,
        projection: &NormalizedProjection,
        from: usize,
    ) -> Option<(usize, usize)> {
        self.fallback_prefixes.iter().find_map(|prefix| {
            let stripped = needle.strip_prefix(prefix.as_str())?.trim();
            let stripped = stripped.strip_suffix('.').unwrap_or(stripped).trim_end();
            if stripped.is_empty() {
                return None;
            }
            debug!("Retrying cue without '{}' prefix: {:?}", prefix, stripped);
            projection.find_from(stripped, from)
        })
    }
}
