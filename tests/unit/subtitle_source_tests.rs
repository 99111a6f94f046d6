/*!
 * Tests for subtitle retrieval over HTTP and from disk
 */

use anyhow::Result;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use cuesync::app_config::SourceConfig;
use cuesync::errors::FetchError;
use cuesync::subtitle_source::{DefaultSource, SubtitleLocation, SubtitleSource};
use crate::common;

/// Serve exactly one HTTP response on a local port and return its base URL
async fn serve_once(status_line: &'static str, body: &'static str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buffer = [0u8; 2048];
            let _ = socket.read(&mut buffer).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/vtt\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(format!("http://{}", address))
}

#[tokio::test]
async fn test_fetch_httpSuccess_shouldReturnBody() -> Result<()> {
    let base = serve_once("200 OK", common::SAMPLE_VTT).await?;
    let source = DefaultSource::default();

    let body = source.fetch(&format!("{}/episode.vtt", base)).await?;

    assert_eq!(body, common::SAMPLE_VTT);
    Ok(())
}

#[tokio::test]
async fn test_fetch_httpNotFound_shouldReturnStatusError() -> Result<()> {
    let base = serve_once("404 Not Found", "missing").await?;
    let source = DefaultSource::with_config(&SourceConfig::default());

    let result = source.fetch(&format!("{}/missing.vtt", base)).await;

    assert!(matches!(result, Err(FetchError::Status { status_code: 404, .. })));
    Ok(())
}

#[tokio::test]
async fn test_fetch_localPath_shouldReadFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "track.vtt", common::SAMPLE_VTT)?;
    let source = DefaultSource::default();

    let body = source.fetch(&path.to_string_lossy()).await?;

    assert_eq!(body, common::SAMPLE_VTT);
    Ok(())
}

#[tokio::test]
async fn test_fetch_missingLocalFile_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("absent.vtt");

    let result = DefaultSource::default().fetch(&path.to_string_lossy()).await;

    assert!(matches!(result, Err(FetchError::Io(_))));
    Ok(())
}

#[test]
fn test_subtitleLocation_fileUrl_shouldBeLocal() {
    let location = SubtitleLocation::parse("file:///tmp/track.vtt").unwrap();

    assert_eq!(location, SubtitleLocation::Local(PathBuf::from("/tmp/track.vtt")));
}
