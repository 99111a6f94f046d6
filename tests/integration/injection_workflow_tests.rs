/*!
 * End-to-end tests for transcript injection
 */

use anyhow::Result;
use std::sync::Arc;
use cuesync::app_config::Config;
use cuesync::app_controller::Controller;
use cuesync::document::Document;
use crate::common;
use crate::common::mock_sources::MockSource;

fn controller_with(source: MockSource, config: Config) -> Result<Controller> {
    Controller::with_source(config, Arc::new(source))
}

#[tokio::test]
async fn test_initInjection_samplePage_shouldMarkEveryCue() -> Result<()> {
    common::init_logging();
    let source = MockSource::serving(common::SAMPLE_VTT);
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);
    let before = doc.text_content(doc.root());

    let outcome = controller
        .init_injection(&mut doc, "episode.vtt", "content", "hyperplayer")
        .await
        .expect("injection should run");

    assert_eq!(outcome.cues.len(), 3);
    assert_eq!(outcome.report.total_cues, 3);
    assert_eq!(outcome.report.matched_cues, 3);
    assert_eq!(outcome.report.markers_inserted, 3);
    assert_eq!(source.tracker.requests(), vec!["episode.vtt".to_string()]);

    let html = doc.to_html();
    assert_eq!(common::count_markers(&html), 3);
    assert!(html.contains("<nav>Welcome back to the show.</nav>"));
    assert!(html.contains(r#"data-m="5500" data-d="1500""#));
    assert_eq!(doc.text_content(doc.root()), before);
    Ok(())
}

#[tokio::test]
async fn test_initInjection_fetchFailure_shouldLeaveDocumentUntouched() -> Result<()> {
    let source = MockSource::failing();
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);
    let before = doc.to_html();

    let outcome = controller
        .init_injection(&mut doc, "https://example.com/x.vtt", "content", "hyperplayer")
        .await;

    assert!(outcome.is_none());
    assert_eq!(doc.to_html(), before);
    assert_eq!(source.tracker.count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_initInjection_missingRoot_shouldDoNothing() -> Result<()> {
    let source = MockSource::serving(common::SAMPLE_VTT);
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);
    let before = doc.to_html();

    let outcome = controller
        .init_injection(&mut doc, "episode.vtt", "no-such-id", "hyperplayer")
        .await;

    assert!(outcome.is_none());
    assert_eq!(doc.to_html(), before);
    Ok(())
}

#[tokio::test]
async fn test_initInjection_noCues_shouldDoNothing() -> Result<()> {
    let source = MockSource::serving("WEBVTT\n\n");
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);
    let before = doc.to_html();

    let outcome = controller
        .init_injection(&mut doc, "empty.vtt", "content", "hyperplayer")
        .await;

    assert!(outcome.is_none());
    assert_eq!(doc.to_html(), before);
    Ok(())
}

#[tokio::test]
async fn test_initInjection_runTwice_shouldNotNestMarkers() -> Result<()> {
    let source = MockSource::serving(common::SAMPLE_VTT);
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);

    let first = controller
        .init_injection(&mut doc, "episode.vtt", "content", "hyperplayer")
        .await;
    let after_first = doc.to_html();
    let second = controller
        .init_injection(&mut doc, "episode.vtt", "content", "hyperplayer")
        .await;

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(doc.to_html(), after_first);
    Ok(())
}

#[tokio::test]
async fn test_initInjection_withPlayerScript_shouldAppendInitialisation() -> Result<()> {
    let source = MockSource::serving(common::SAMPLE_VTT);
    let mut config = Config::default();
    config.emit_player_script = true;
    let controller = controller_with(source.clone(), config)?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);

    controller
        .init_injection(&mut doc, "episode.vtt", "content", "hyperplayer")
        .await
        .expect("injection should run");

    let html = doc.to_html();
    assert!(html.contains("</article><script>if (typeof HyperaudioLite !== 'undefined') {"));
    assert!(html.contains(r#"new HyperaudioLite("content", "hyperplayer", false, true, false, false, true);"#));
    assert!(html.contains(r#"window.hyperaudioLite("hyperplayer", "content", { scroll: true });"#));
    Ok(())
}

#[tokio::test]
async fn test_initInjection_partialTranscript_shouldReportUnmatched() -> Result<()> {
    let track = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nWelcome back to the show.\n\n00:00:01.000 --> 00:00:02.000\nThis sentence was cut from the page.\n";
    let source = MockSource::serving(track);
    let controller = controller_with(source.clone(), Config::default())?;
    let mut doc = Document::parse(common::SAMPLE_PAGE);

    let outcome = controller
        .init_injection(&mut doc, "episode.vtt", "content", "hyperplayer")
        .await
        .expect("injection should run");

    assert_eq!(outcome.report.matched_cues, 1);
    assert_eq!(
        outcome.report.unmatched,
        vec!["This sentence was cut from the page.".to_string()]
    );
    assert_eq!(common::count_markers(&doc.to_html()), 1);
    Ok(())
}
