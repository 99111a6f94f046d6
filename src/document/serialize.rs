use super::tokenizer::{is_raw_text_element, is_void_element};
use super::{Document, NodeId, NodeKind};

pub(crate) fn serialize_children(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    if let Some(NodeKind::Document { doctype: Some(doctype) }) = doc.node(id).map(|n| n.kind()) {
        out.push_str("<!");
        out.push_str(doctype);
        out.push('>');
    }
    let raw = doc.element_name(id).is_some_and(is_raw_text_element);
    for &child in doc.children(id) {
        write_node(doc, child, raw, &mut out);
    }
    out
}

pub(crate) fn serialize_node(doc: &Document, id: NodeId) -> String {
    let raw = doc
        .parent(id)
        .and_then(|p| doc.element_name(p))
        .is_some_and(is_raw_text_element);
    let mut out = String::new();
    write_node(doc, id, raw, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, raw_parent: bool, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match node.kind() {
        NodeKind::Document { .. } => out.push_str(&serialize_children(doc, id)),
        NodeKind::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element { name, attributes } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let raw = is_raw_text_element(name);
            for &child in node.children() {
                write_node(doc, child, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
