use std::collections::HashMap;

use super::char_map::CharacterMap;
use super::matcher::CueMatch;
use crate::cue_parser::Cue;
use crate::document::{Document, NodeId};

/// Sub-range of a match that stays inside one block-level container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeRange<'a> {
    pub cue: &'a Cue,
    pub start: usize,
    pub end: usize,
}

pub fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "dd"
            | "details"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Nearest block-level container of a text node, memoized per node.
/// The alignment root always counts as a block.
struct BlockResolver<'d> {
    doc: &'d Document,
    root: NodeId,
    cache: HashMap<NodeId, NodeId>,
}

impl<'d> BlockResolver<'d> {
    fn new(doc: &'d Document, root: NodeId) -> Self {
        Self {
            doc,
            root,
            cache: HashMap::new(),
        }
    }

    fn block_of(&mut self, node: NodeId) -> NodeId {
        if let Some(&block) = self.cache.get(&node) {
            return block;
        }
        let mut current = self.doc.parent(node);
        let block = loop {
            match current {
                Some(id) if id == self.root => break id,
                Some(id) if self.doc.element_name(id).is_some_and(is_block_element) => break id,
                Some(id) => current = self.doc.parent(id),
                None => break self.root,
            }
        };
        self.cache.insert(node, block);
        block
    }
}

/// Cut every match wherever consecutive characters change block container,
/// or an excluded region or block element sits between them.
///
/// Segments made only of whitespace (the gap between two blocks) are dropped;
/// they carry no cue text and wrapping them would only add empty markers.
pub fn split_at_block_boundaries<'a>(
    matches: &[CueMatch<'a>],
    char_map: &CharacterMap,
    doc: &Document,
    root: NodeId,
) -> Vec<SafeRange<'a>> {
    let mut resolver = BlockResolver::new(doc, root);
    let text = char_map.text();
    let mut ranges = Vec::new();

    for m in matches {
        let end = m.raw_end.min(char_map.len());
        if m.raw_start >= end {
            continue;
        }

        let mut push = |start: usize, stop: usize| {
            if text[start..stop].iter().any(|c| !c.is_whitespace()) {
                ranges.push(SafeRange {
                    cue: m.cue,
                    start,
                    end: stop,
                });
            }
        };

        let mut segment_start = m.raw_start;
        let mut current_block = char_map
            .entry(m.raw_start)
            .map(|e| resolver.block_of(e.node))
            .ok();

        for position in m.raw_start + 1..end {
            let block = char_map.entry(position).map(|e| resolver.block_of(e.node)).ok();
            if block != current_block || char_map.breaks_before(position) {
                push(segment_start, position);
                segment_start = position;
                current_block = block;
            }
        }
        push(segment_start, end);
    }

    ranges
}
