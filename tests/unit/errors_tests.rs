/*!
 * Tests for error types and conversions
 */

use cuesync::errors::{AppError, DocumentError, FetchError};

#[test]
fn test_fetchError_status_shouldDisplayStatusAndMessage() {
    let error = FetchError::Status {
        status_code: 404,
        message: "Not Found".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("404"));
    assert!(display.contains("Not Found"));
}

#[test]
fn test_fetchError_invalidLocation_shouldDisplayCorrectly() {
    let error = FetchError::InvalidLocation("ftp://x".to_string());
    assert_eq!(error.to_string(), "Invalid subtitle location: ftp://x");
}

#[test]
fn test_documentError_offsetOutOfBounds_shouldDisplayAllFields() {
    let error = DocumentError::OffsetOutOfBounds {
        node: 7,
        offset: 12,
        length: 5,
    };
    let display = error.to_string();
    assert!(display.contains("12"));
    assert!(display.contains("node 7"));
    assert!(display.contains("5 chars"));
}

#[test]
fn test_appError_fromFetchError_shouldWrap() {
    let error: AppError = FetchError::RequestFailed("timeout".to_string()).into();
    assert!(matches!(error, AppError::Fetch(_)));
    assert!(error.to_string().contains("timeout"));
}

#[test]
fn test_appError_fromDocumentError_shouldWrap() {
    let error: AppError = DocumentError::ElementNotFound("content".to_string()).into();
    assert!(matches!(error, AppError::Document(DocumentError::ElementNotFound(_))));
    assert_eq!(error.to_string(), "Document error: Element not found: #content");
}

#[test]
fn test_appError_fromIoAndAnyhow_shouldConvert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let other = AppError::from(anyhow::anyhow!("boom"));
    assert!(matches!(other, AppError::Unknown(ref m) if m == "boom"));
}
