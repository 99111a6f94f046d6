use super::blocks::is_block_element;
use crate::document::{Document, NodeId, Selector, is_non_rendering_element};
use crate::errors::DocumentError;

/// Owner of one raw character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEntry {
    /// Text node holding the character
    pub node: NodeId,
    /// Char offset inside that node's text
    pub offset: usize,
}

/// Flat index from raw text positions to (text node, offset).
///
/// Snapshot of the subtree taken before any mutation. Text nodes appear in
/// document order; excluded regions and non-rendering elements contribute nothing.
/// A position is flagged as a break when an excluded region or a block element
/// edge lies between it and the previous character.
#[derive(Debug, Clone, Default)]
pub struct CharacterMap {
    entries: Vec<CharEntry>,
    text: Vec<char>,
    breaks: Vec<bool>,
}

enum Step {
    Enter(NodeId),
    Leave,
}

impl CharacterMap {
    pub fn build(doc: &Document, root: NodeId, excluded: &[Selector]) -> Self {
        let mut map = CharacterMap::default();
        let mut stack = vec![Step::Enter(root)];
        let mut pending_break = false;

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Enter(node) => node,
                Step::Leave => {
                    pending_break = true;
                    continue;
                }
            };

            if let Some(text) = doc.text(node) {
                for (offset, c) in text.chars().enumerate() {
                    map.entries.push(CharEntry { node, offset });
                    map.text.push(c);
                    map.breaks.push(std::mem::take(&mut pending_break));
                }
                continue;
            }

            if let Some(name) = doc.element_name(node) {
                if node != root {
                    if is_excluded(doc, node, name, excluded) {
                        pending_break = true;
                        continue;
                    }
                    if is_block_element(name) {
                        pending_break = true;
                        stack.push(Step::Leave);
                    }
                }
            }

            stack.extend(doc.children(node).iter().rev().map(|&child| Step::Enter(child)));
        }

        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw concatenated text
    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }

    /// Whether something that must never sit inside a marker precedes `position`
    pub fn breaks_before(&self, position: usize) -> bool {
        self.breaks.get(position).copied().unwrap_or(false)
    }

    pub fn entry(&self, position: usize) -> Result<CharEntry, DocumentError> {
        self.entries
            .get(position)
            .copied()
            .ok_or(DocumentError::InvalidPosition {
                position,
                length: self.entries.len(),
            })
    }
}

fn is_excluded(doc: &Document, node: NodeId, name: &str, excluded: &[Selector]) -> bool {
    if is_non_rendering_element(name) {
        return true;
    }
    doc.node(node)
        .is_some_and(|n| excluded.iter().any(|selector| selector.matches(n)))
}
