/*!
 * Hand-off to the playback component.
 *
 * Once markers are in place the page needs a player that reads them and
 * drives highlighting. That component lives outside this crate; a driver only
 * tells it where to look.
 */

use log::info;
use std::fmt::Debug;

use crate::document::{Document, NodeId};

/// Receives the content and player ids after a successful alignment
pub trait PlaybackDriver: Debug + Send + Sync {
    fn attach(&self, doc: &mut Document, content: NodeId, content_id: &str, player_id: &str);
}

/// Leaves the document alone and only logs the hand-off
#[derive(Debug, Clone, Default)]
pub struct LogOnlyDriver;

impl PlaybackDriver for LogOnlyDriver {
    fn attach(&self, _doc: &mut Document, _content: NodeId, content_id: &str, player_id: &str) {
        info!(
            "Transcript #{} ready for player #{}",
            content_id, player_id
        );
    }
}

/// Appends a Hyperaudio Lite initialisation script right after the content element
#[derive(Debug, Clone, Default)]
pub struct ScriptTagDriver;

impl ScriptTagDriver {
    /// Start the player class when loaded, else the legacy `window.hyperaudioLite`
    /// function (which takes the player id first), else report the missing library.
    pub fn init_script(content_id: &str, player_id: &str) -> String {
        let content = js_string(content_id);
        let player = js_string(player_id);
        format!(
            "if (typeof HyperaudioLite !== 'undefined') {{ \
             new HyperaudioLite({content}, {player}, false, true, false, false, true); \
             }} else if (window.hyperaudioLite) {{ \
             window.hyperaudioLite({player}, {content}, {{ scroll: true }}); \
             }} else {{ \
             console.error(\"HyperaudioLite library not found\"); \
             }}"
        )
    }
}

impl PlaybackDriver for ScriptTagDriver {
    fn attach(&self, doc: &mut Document, content: NodeId, content_id: &str, player_id: &str) {
        let target = doc.parent(content).unwrap_or(doc.root());
        let position = doc.index_in_parent(content).map_or(doc.children(target).len(), |i| i + 1);

        let script = doc.create_element("script", Vec::new());
        let body = doc.create_text(Self::init_script(content_id, player_id));
        doc.append_child(script, body);
        doc.insert_child(target, position, script);

        info!("Player script attached for #{} and #{}", content_id, player_id);
    }
}

/// Quote a value as a JS string literal that is also safe inside `<script>`
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '<' => out.push_str("\\u003c"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
