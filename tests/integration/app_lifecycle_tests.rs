/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use cuesync::app_config::Config;
use cuesync::app_controller::{Controller, FolderSummary, PageStatus};
use cuesync::errors::{AppError, FetchError};
use cuesync::file_utils::FileManager;
use crate::common;
use crate::common::mock_sources::MockSource;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().alignment.content_id, "content");
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.alignment.excluded_selectors = vec!["not a selector".to_string()];

    let error = Controller::with_config(config).unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::Config(_))));
}

#[test]
fn test_run_singlePage_shouldWriteSyncedCopy() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let (page, track) = common::create_sample_pair(temp_dir.path(), "episode")?;
    let controller = Controller::new_for_test()?;

    let status = tokio_test::block_on(controller.run(page.clone(), &track.to_string_lossy(), None, false))?;

    let expected = temp_dir.path().join("episode.synced.html");
    assert_eq!(status, PageStatus::Written(expected.clone()));
    let written = FileManager::read_to_string(&expected)?;
    assert_eq!(common::count_markers(&written), 3);
    assert!(written.starts_with("<!DOCTYPE html>"));
    // The input page is never modified
    assert_eq!(FileManager::read_to_string(&page)?, common::SAMPLE_PAGE);
    Ok(())
}

#[test]
fn test_run_existingOutput_shouldRespectForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (page, _) = common::create_sample_pair(temp_dir.path(), "episode")?;
    let output = common::create_test_file(temp_dir.path(), "custom.html", "old")?;
    let source = MockSource::serving(common::SAMPLE_VTT);
    let controller = Controller::with_source(Config::default(), Arc::new(source.clone()))?;

    let skipped = tokio_test::block_on(controller.run(page.clone(), "remote.vtt", Some(output.clone()), false))?;
    assert_eq!(skipped, PageStatus::AlreadyExists(output.clone()));
    assert_eq!(FileManager::read_to_string(&output)?, "old");
    assert_eq!(source.tracker.count(), 0);

    let forced = tokio_test::block_on(controller.run(page, "remote.vtt", Some(output.clone()), true))?;
    assert_eq!(forced, PageStatus::Written(output.clone()));
    assert_eq!(common::count_markers(&FileManager::read_to_string(&output)?), 3);
    Ok(())
}

#[test]
fn test_run_nothingInjected_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let page = common::create_test_file(temp_dir.path(), "plain.html", "<p>No transcript here</p>")?;
    let source = MockSource::serving(common::SAMPLE_VTT);
    let controller = Controller::with_source(Config::default(), Arc::new(source))?;

    let status = tokio_test::block_on(controller.run(page, "remote.vtt", None, false))?;

    assert_eq!(status, PageStatus::NothingInjected);
    assert!(!temp_dir.path().join("plain.synced.html").exists());
    Ok(())
}

#[test]
fn test_run_missingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = tokio_test::block_on(controller.run(temp_dir.path().join("nope.html"), "x.vtt", None, false));

    let error = result.unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::File(_))));
    Ok(())
}

#[tokio::test]
async fn test_runFolder_mixedPages_shouldProcessOnlyPairs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_sample_pair(temp_dir.path(), "one")?;
    common::create_sample_pair(&temp_dir.path().join("nested"), "two")?;
    common::create_test_file(temp_dir.path(), "orphan.html", common::SAMPLE_PAGE)?;
    let controller = Controller::new_for_test()?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary, FolderSummary { processed: 2, skipped: 0, errors: 0 });
    assert!(temp_dir.path().join("one.synced.html").exists());
    assert!(temp_dir.path().join("nested/two.synced.html").exists());
    assert!(!temp_dir.path().join("orphan.synced.html").exists());

    // A second pass finds the outputs and skips them
    let again = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(again, FolderSummary { processed: 0, skipped: 2, errors: 0 });
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withoutPairs_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "page.html", "<p>x</p>")?;
    let controller = Controller::new_for_test()?;

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    assert!(controller.run_folder(temp_dir.path().join("missing"), false).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_loadCues_localTrack_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (_, track) = common::create_sample_pair(temp_dir.path(), "episode")?;
    let controller = Controller::new_for_test()?;

    let cues = controller.load_cues(&track.to_string_lossy()).await?;

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[1].start_ms, 2000);
    assert_eq!(cues[1].duration_ms, 3500);
    Ok(())
}

#[tokio::test]
async fn test_loadCues_missingTrack_shouldReturnFetchError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller.load_cues(&temp_dir.path().join("missing.vtt").to_string_lossy()).await;

    assert!(matches!(result, Err(AppError::Fetch(FetchError::Io(_)))));
    Ok(())
}

/// Run the CLI's `inject` command inside `dir`
fn run_cli_inject(dir: &Path, page: &str, track: &str) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_cuesync"))
        .current_dir(dir)
        .args(["inject", page, "-s", track, "-c", "conf.json", "-l", "error"])
        .output()?;
    Ok(output)
}

#[test]
fn test_cliInject_missingContentRoot_shouldSucceedWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "plain.html", "<p>No transcript here</p>")?;
    common::create_test_file(temp_dir.path(), "plain.vtt", common::SAMPLE_VTT)?;

    let output = run_cli_inject(temp_dir.path(), "plain.html", "plain.vtt")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(!temp_dir.path().join("plain.synced.html").exists());
    Ok(())
}

#[test]
fn test_cliInject_emptyTrack_shouldSucceedWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "episode.html", common::SAMPLE_PAGE)?;
    common::create_test_file(temp_dir.path(), "episode.vtt", "WEBVTT\n\n")?;

    let output = run_cli_inject(temp_dir.path(), "episode.html", "episode.vtt")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(!temp_dir.path().join("episode.synced.html").exists());
    Ok(())
}

#[test]
fn test_cliInject_samplePage_shouldWriteSyncedCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_sample_pair(temp_dir.path(), "episode")?;

    let output = run_cli_inject(temp_dir.path(), "episode.html", "episode.vtt")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = FileManager::read_to_string(temp_dir.path().join("episode.synced.html"))?;
    assert_eq!(common::count_markers(&written), 3);
    Ok(())
}
