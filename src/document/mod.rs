/*!
 * In-memory HTML document model.
 *
 * An HTML page is parsed into an arena of nodes with parent links so the
 * alignment engine can address text by node and offset and then rewrite the
 * tree in place. The arena never frees slots: a detached node keeps its id,
 * which lets callers detect stale references instead of aliasing new nodes.
 */

mod builder;
mod entities;
mod node;
mod selector;
mod serialize;
mod tokenizer;

pub use builder::build_document;
pub use node::{Node, NodeId, NodeKind};
pub use selector::Selector;
pub use tokenizer::{Token, is_raw_text_element, is_void_element, tokenize};

use crate::errors::DocumentError;

/// Mutable HTML document backed by a node arena
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document { doctype: None })],
        }
    }

    /// Parse HTML source into a document
    pub fn parse(html: &str) -> Self {
        build_document(html)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], Node::children)
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(Node::element_name)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(Node::text)
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id).and_then(|node| node.attribute(key))
    }

    pub(crate) fn set_doctype(&mut self, value: String) {
        if let NodeKind::Document { doctype } = &mut self.nodes[0].kind {
            *doctype = Some(value);
        }
    }

    /// Set or replace an attribute on an element. No-op for other node kinds.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if let NodeKind::Element { attributes, .. } = &mut node.kind {
            let value = Some(value.into());
            match attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
                Some(slot) => slot.1 = value,
                None => attributes.push((key.to_string(), value)),
            }
        }
    }

    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Create a detached element
    pub fn create_element(
        &mut self,
        name: impl Into<String>,
        attributes: Vec<(String, Option<String>)>,
    ) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.into(),
            attributes,
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Text(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among the children of `parent`, detaching it first
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Whether the node is reachable from the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Ancestors of `id` from its parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Pre-order descendants of `id`, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&node| self.element_name(node).is_some() && self.attribute(node, "id") == Some(element_id))
    }

    pub fn find_first_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&node| self.element_name(node) == Some(name))
    }

    /// Elements matching `selector` within the subtree of `scope` (inclusive)
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .filter(|&node| self.node(node).is_some_and(|n| selector.matches(n)))
            .collect()
    }

    /// Concatenated text of every text node below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// Split a text node at a char offset.
    ///
    /// The original node keeps the chars before `offset`; a new text node holding
    /// the rest is inserted right after it and returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DocumentError> {
        let parent = self.parent(id).ok_or(DocumentError::Detached(id.0))?;
        let text = self.text(id).ok_or(DocumentError::NotText(id.0))?;
        let length = text.chars().count();
        if offset > length {
            return Err(DocumentError::OffsetOutOfBounds {
                node: id.0,
                offset,
                length,
            });
        }

        let byte = text.char_indices().nth(offset).map_or(text.len(), |(b, _)| b);
        let tail = text[byte..].to_string();
        if let NodeKind::Text(own) = &mut self.nodes[id.0].kind {
            own.truncate(byte);
        }

        let index = self.index_in_parent(id).ok_or(DocumentError::Detached(id.0))?;
        let new_node = self.create_text(tail);
        self.insert_child(parent, index + 1, new_node);
        Ok(new_node)
    }

    /// Split an element before child `index`.
    ///
    /// A shallow clone of the element is inserted right after it and receives the
    /// children from `index` onwards. Returns the clone.
    pub fn split_element(&mut self, id: NodeId, index: usize) -> Result<NodeId, DocumentError> {
        let parent = self.parent(id).ok_or(DocumentError::Detached(id.0))?;
        let kind = match &self.nodes[id.0].kind {
            kind @ NodeKind::Element { .. } => kind.clone(),
            _ => return Err(DocumentError::NotElement(id.0)),
        };

        let position = self.index_in_parent(id).ok_or(DocumentError::Detached(id.0))?;
        let clone = self.create_node(kind);
        self.insert_child(parent, position + 1, clone);

        let at = index.min(self.nodes[id.0].children.len());
        let moved: Vec<NodeId> = self.nodes[id.0].children.split_off(at);
        for child in moved {
            self.nodes[child.0].parent = Some(clone);
            self.nodes[clone.0].children.push(child);
        }
        Ok(clone)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        serialize::serialize_children(self, self.root())
    }

    /// Serialize the children of `id`
    pub fn inner_html(&self, id: NodeId) -> String {
        serialize::serialize_children(self, id)
    }

    /// Serialize `id` and its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::serialize_node(self, id)
    }
}

/// Elements whose text is never rendered as page content
pub fn is_non_rendering_element(name: &str) -> bool {
    matches!(
        name,
        "head" | "style" | "script" | "title" | "meta" | "link" | "template" | "noscript"
    )
}
