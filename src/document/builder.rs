use super::tokenizer::{Token, tokenize};
use super::{Document, NodeId, NodeKind};

/// Elements whose start tag closes an open `<p>`.
fn closes_paragraph(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "fieldset"
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
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "ul"
    )
}

/// Build a document tree from HTML source.
///
/// Tree construction keeps a stack of open elements. End tags pop up to the
/// matching element and are ignored when nothing matches. A small set of implied
/// end tags is honoured (`p` closed by block starts, sibling `li`, `dt`/`dd`).
pub fn build_document(html: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    let mut open_elements: Vec<NodeId> = Vec::new();

    for token in tokenize(html) {
        match token {
            Token::Doctype(s) => {
                doc.set_doctype(s);
            }
            Token::Comment(c) => {
                let parent = open_elements.last().copied().unwrap_or(root);
                let node = doc.create_node(NodeKind::Comment(c));
                doc.append_child(parent, node);
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    let parent = open_elements.last().copied().unwrap_or(root);
                    let node = doc.create_text(txt);
                    doc.append_child(parent, node);
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                close_implied(&doc, &mut open_elements, &name);

                let parent = open_elements.last().copied().unwrap_or(root);
                let node = doc.create_element(name, attributes);
                doc.append_child(parent, node);

                if !self_closing {
                    open_elements.push(node);
                }
            }
            Token::EndTag(name) => {
                let Some(pos) = open_elements
                    .iter()
                    .rposition(|&id| doc.element_name(id) == Some(name.as_str()))
                else {
                    continue;
                };
                open_elements.truncate(pos);
            }
        }
    }

    doc
}

fn close_implied(doc: &Document, open_elements: &mut Vec<NodeId>, name: &str) {
    let current = open_elements.last().and_then(|&id| doc.element_name(id));

    if closes_paragraph(name) && current == Some("p") {
        open_elements.pop();
        return;
    }

    let siblings: &[&str] = match name {
        "li" => &["li"],
        "dt" | "dd" => &["dt", "dd"],
        _ => return,
    };
    let scope_boundary: &[&str] = match name {
        "li" => &["ul", "ol"],
        _ => &["dl"],
    };

    for pos in (0..open_elements.len()).rev() {
        let Some(open_name) = doc.element_name(open_elements[pos]) else {
            continue;
        };
        if siblings.contains(&open_name) {
            open_elements.truncate(pos);
            return;
        }
        if scope_boundary.contains(&open_name) {
            return;
        }
    }
}
