/*!
 * Tests for text normalization and the normalized projection
 */

use cuesync::alignment::{NormalizedProjection, normalize_cue_text, normalize_text};

#[test]
fn test_normalizeText_appliedTwice_shouldBeStable() {
    let samples = [
        "  Hello,\t\tWORLD\n",
        "“Quoted” — and ‘single’ … done",
        "already normalized text",
        "ÀÉÎ mixed Case",
        "",
    ];

    for sample in samples {
        let once = normalize_text(sample);
        assert_eq!(normalize_text(&once), once, "not stable for {:?}", sample);
        let cue = normalize_cue_text(sample);
        assert_eq!(normalize_cue_text(&cue), cue);
    }
}

#[test]
fn test_normalizeText_typographicApostrophe_shouldMatchAscii() {
    assert_eq!(normalize_text("don’t stop"), normalize_cue_text("don't stop"));
}

#[test]
fn test_normalizeText_punctuationFolding_shouldMapToAscii() {
    assert_eq!(normalize_text("“a” – b — c…"), "\"a\" - b - c...");
}

#[test]
fn test_normalizeText_whitespace_shouldCollapseWithoutLeadingSpace() {
    assert_eq!(normalize_text("\n\n  a \t b  "), "a b ");
    assert_eq!(normalize_cue_text("\n\n  a \t b  "), "a b");
}

#[test]
fn test_projection_shouldMapBackToRawIndices() {
    let raw: Vec<char> = "A  b…c".chars().collect();
    let projection = NormalizedProjection::build(&raw);

    assert_eq!(projection.text(), "a b...c");
    assert_eq!(projection.raw_index_of(), &[0, 1, 3, 4, 4, 4, 5]);
}

#[test]
fn test_projection_rawIndices_shouldBeNonDecreasing() {
    let raw: Vec<char> = " Ünïcode — “text”  with\u{a0}spaces… ".chars().collect();
    let projection = NormalizedProjection::build(&raw);

    assert_eq!(projection.len(), projection.text().chars().count());
    assert!(projection.raw_index_of().windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_projection_findFrom_shouldReturnCharRange() {
    let raw: Vec<char> = "Ça va? Ça va bien.".chars().collect();
    let projection = NormalizedProjection::build(&raw);

    assert_eq!(projection.find_from("ça va", 0), Some((0, 5)));
    assert_eq!(projection.find_from("ça va", 1), Some((7, 12)));
    assert_eq!(projection.find_from("absent", 0), None);
    assert_eq!(projection.find_from("ça", 100), None);
}
