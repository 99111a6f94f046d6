use log::{debug, warn};

use super::blocks::SafeRange;
use super::char_map::CharacterMap;
use crate::document::{Document, NodeId};
use crate::errors::DocumentError;

/// Shape of the marker element wrapped around each safe range
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub tag: String,
    pub class: String,
    pub unread_class: String,
    pub start_attribute: String,
    pub duration_attribute: String,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            class: "hyperaudio-transcript-text".to_string(),
            unread_class: "unread".to_string(),
            start_attribute: "data-m".to_string(),
            duration_attribute: "data-d".to_string(),
        }
    }
}

impl MarkerSpec {
    fn class_value(&self) -> String {
        if self.unread_class.is_empty() {
            self.class.clone()
        } else {
            format!("{} {}", self.class, self.unread_class)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub inserted: usize,
    pub skipped: usize,
}

/// Wrap every range in a marker, highest start first.
///
/// Splits keep the leading part of a node under its original id, so positions
/// below the range being processed still resolve through the snapshot.
pub fn wrap_ranges(
    doc: &mut Document,
    char_map: &CharacterMap,
    ranges: &[SafeRange<'_>],
    spec: &MarkerSpec,
) -> MutationStats {
    let mut ordered: Vec<&SafeRange<'_>> = ranges.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut stats = MutationStats::default();
    for range in ordered {
        if range.start >= range.end {
            debug!("Skipping empty range at {}", range.start);
            stats.skipped += 1;
            continue;
        }
        match wrap_range(doc, char_map, range, spec) {
            Ok(_) => stats.inserted += 1,
            Err(e) => {
                warn!(
                    "Could not wrap range {}..{} for cue at {}ms: {}",
                    range.start, range.end, range.cue.start_ms, e
                );
                stats.skipped += 1;
            }
        }
    }
    stats
}

/// Wrap one raw range in a marker element and return the marker
pub fn wrap_range(
    doc: &mut Document,
    char_map: &CharacterMap,
    range: &SafeRange<'_>,
    spec: &MarkerSpec,
) -> Result<NodeId, DocumentError> {
    let first = char_map.entry(range.start)?;
    let last = char_map.entry(range.end - 1)?;
    check_text_position(doc, first.node, first.offset)?;
    check_text_position(doc, last.node, last.offset)?;

    // Cut the end first so that a single-node range keeps valid offsets
    let last_len = text_len(doc, last.node)?;
    if last.offset + 1 < last_len {
        doc.split_text(last.node, last.offset + 1)?;
    }
    let start_node = if first.offset > 0 {
        doc.split_text(first.node, first.offset)?
    } else {
        first.node
    };
    let end_node = if first.node == last.node { start_node } else { last.node };

    let common = common_ancestor(doc, start_node, end_node).ok_or(DocumentError::Detached(start_node.0))?;

    // Lift both edges to children of the common ancestor, splitting inline
    // elements that are only partly covered
    let mut start_top = start_node;
    while let Some(parent) = doc.parent(start_top) {
        if parent == common {
            break;
        }
        let index = doc.index_in_parent(start_top).ok_or(DocumentError::Detached(start_top.0))?;
        start_top = if index > 0 { doc.split_element(parent, index)? } else { parent };
    }

    let mut end_top = end_node;
    while let Some(parent) = doc.parent(end_top) {
        if parent == common {
            break;
        }
        let index = doc.index_in_parent(end_top).ok_or(DocumentError::Detached(end_top.0))?;
        if index + 1 < doc.children(parent).len() {
            doc.split_element(parent, index + 1)?;
        }
        end_top = parent;
    }

    let first_index = doc.index_in_parent(start_top).ok_or(DocumentError::Detached(start_top.0))?;
    let last_index = doc.index_in_parent(end_top).ok_or(DocumentError::Detached(end_top.0))?;
    if first_index > last_index {
        return Err(DocumentError::InvalidPosition {
            position: range.start,
            length: char_map.len(),
        });
    }

    let covered: Vec<NodeId> = doc.children(common)[first_index..=last_index].to_vec();
    let marker = doc.create_element(
        spec.tag.clone(),
        vec![
            (spec.start_attribute.clone(), Some(range.cue.start_ms.to_string())),
            (spec.duration_attribute.clone(), Some(range.cue.duration_ms.to_string())),
            ("class".to_string(), Some(spec.class_value())),
        ],
    );
    for node in covered {
        doc.append_child(marker, node);
    }
    doc.insert_child(common, first_index, marker);

    Ok(marker)
}

fn text_len(doc: &Document, node: NodeId) -> Result<usize, DocumentError> {
    doc.text(node)
        .map(|t| t.chars().count())
        .ok_or(DocumentError::NotText(node.0))
}

fn check_text_position(doc: &Document, node: NodeId, offset: usize) -> Result<(), DocumentError> {
    let length = text_len(doc, node)?;
    if offset >= length {
        return Err(DocumentError::OffsetOutOfBounds {
            node: node.0,
            offset,
            length,
        });
    }
    if !doc.is_attached(node) {
        return Err(DocumentError::Detached(node.0));
    }
    Ok(())
}

fn common_ancestor(doc: &Document, a: NodeId, b: NodeId) -> Option<NodeId> {
    doc.ancestors(a)
        .into_iter()
        .find(|&ancestor| doc.is_inclusive_ancestor(ancestor, b))
}
