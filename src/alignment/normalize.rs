/*!
 * Text normalization shared by cue text and document text.
 *
 * Both sides are folded to the same canonical form so that a literal substring
 * search can find cue text in rendered markup:
 * - whitespace runs collapse to one space, never leading or doubled
 * - `…` expands to `...`
 * - typographic quotes become `'` / `"`, en/em dashes become `-`
 * - everything else is lower-cased
 */

/// Canonical replacement for a single source char, if it has one
fn fold_punctuation(c: char) -> Option<&'static str> {
    match c {
        '\u{2026}' => Some("..."),
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => Some("'"),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => Some("\""),
        '\u{2013}' | '\u{2014}' => Some("-"),
        _ => None,
    }
}

/// Push normalized chars for `c` into `out`, reporting each produced char to `emit`.
fn normalize_char(c: char, out: &mut String, mut emit: impl FnMut()) {
    if c.is_whitespace() {
        if !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
            emit();
        }
        return;
    }

    if let Some(folded) = fold_punctuation(c) {
        for f in folded.chars() {
            out.push(f);
            emit();
        }
        return;
    }

    for lower in c.to_lowercase() {
        out.push(lower);
        emit();
    }
}

/// Normalize text without trimming (the document-side form)
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        normalize_char(c, &mut out, || {});
    }
    out
}

/// Normalize cue text: the shared rules plus trimming
pub fn normalize_cue_text(raw: &str) -> String {
    normalize_text(raw).trim().to_string()
}

/// Normalized view of document text with a normalized-to-raw index map
#[derive(Debug, Clone, Default)]
pub struct NormalizedProjection {
    text: String,
    raw_index_of: Vec<usize>,
    // byte offset of each normalized char, plus text.len() at the end
    byte_offsets: Vec<usize>,
}

impl NormalizedProjection {
    /// Build the projection of raw document chars
    pub fn build(raw: &[char]) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut raw_index_of = Vec::with_capacity(raw.len());
        let mut byte_offsets = Vec::with_capacity(raw.len() + 1);

        for (raw_index, &c) in raw.iter().enumerate() {
            let mut pending = 0usize;
            let before = text.len();
            normalize_char(c, &mut text, || pending += 1);

            let mut offset = before;
            for produced in text[before..].chars().take(pending) {
                raw_index_of.push(raw_index);
                byte_offsets.push(offset);
                offset += produced.len_utf8();
            }
        }
        byte_offsets.push(text.len());

        Self {
            text,
            raw_index_of,
            byte_offsets,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of normalized chars
    pub fn len(&self) -> usize {
        self.raw_index_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_index_of.is_empty()
    }

    pub fn raw_index_of(&self) -> &[usize] {
        &self.raw_index_of
    }

    /// Find `needle` at or after normalized char `from`.
    /// Returns the normalized char range `[start, end)`.
    pub fn find_from(&self, needle: &str, from: usize) -> Option<(usize, usize)> {
        if needle.is_empty() || from >= self.len() {
            return None;
        }
        let from_byte = self.byte_offsets[from];
        let rel = self.text[from_byte..].find(needle)?;
        let start_byte = from_byte + rel;
        let end_byte = start_byte + needle.len();

        let start = self.byte_offsets.binary_search(&start_byte).ok()?;
        let end = self.byte_offsets.binary_search(&end_byte).ok()?;
        Some((start, end))
    }
}
