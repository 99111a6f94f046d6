/*!
 * Error types for the cuesync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while retrieving a subtitle track
#[derive(Error, Debug)]
pub enum FetchError {
    /// The location is neither a usable URL nor a file path
    #[error("Invalid subtitle location: {0}")]
    InvalidLocation(String),

    /// The HTTP request could not be completed
    #[error("Subtitle request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status
    #[error("Subtitle server responded with error: {status_code} - {message}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Reason phrase or body excerpt
        message: String,
    },

    /// Reading a local subtitle file failed
    #[error("Failed to read subtitle file: {0}")]
    Io(String),
}

/// Errors raised while addressing or mutating the document tree
#[derive(Error, Debug, PartialEq)]
pub enum DocumentError {
    /// No element carries the requested id
    #[error("Element not found: #{0}")]
    ElementNotFound(String),

    /// A raw text position does not resolve to a character of the snapshot
    #[error("Position {position} is outside the text map (length {length})")]
    InvalidPosition {
        /// Requested raw position
        position: usize,
        /// Length of the character map
        length: usize,
    },

    /// The addressed node is not a text node anymore
    #[error("Node {0} is not a text node")]
    NotText(usize),

    /// The addressed node is not an element
    #[error("Node {0} is not an element")]
    NotElement(usize),

    /// A character offset falls outside the text node
    #[error("Offset {offset} is out of bounds for text node {node} ({length} chars)")]
    OffsetOutOfBounds {
        /// Text node index
        node: usize,
        /// Requested char offset
        offset: usize,
        /// Length of the node's text in chars
        length: usize,
    },

    /// The node is no longer attached to the tree
    #[error("Node {0} is detached from the document")]
    Detached(usize),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error while fetching subtitles
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error while working on the document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
