/*!
 * Subtitle track retrieval.
 *
 * Subtitles are fetched from an `http(s)://` URL or read from a local path
 * (plain path or `file://` URL). This is the only asynchronous step of an
 * injection; a failure here aborts the run before the document is touched.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::app_config::SourceConfig;
use crate::errors::FetchError;

/// Common trait for anything that can deliver subtitle text
#[async_trait]
pub trait SubtitleSource: Send + Sync + Debug {
    /// Retrieve the raw subtitle text at `location`
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}

/// Where a subtitle track lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SubtitleLocation {
    pub fn parse(location: &str) -> Result<Self, FetchError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(FetchError::InvalidLocation("empty location".to_string()));
        }

        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|_| FetchError::InvalidLocation(location.to_string())),
                // Windows drive letters parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(Self::Local(PathBuf::from(location))),
                scheme => Err(FetchError::InvalidLocation(format!(
                    "unsupported scheme '{}' in {}",
                    scheme, location
                ))),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::Local(PathBuf::from(location))),
            Err(e) => Err(FetchError::InvalidLocation(format!("{}: {}", location, e))),
        }
    }
}

/// Fetches remote tracks over HTTP and reads local ones from disk
#[derive(Debug, Clone)]
pub struct DefaultSource {
    client: Client,
}

impl Default for DefaultSource {
    fn default() -> Self {
        Self::with_config(&SourceConfig::default())
    }
}

impl DefaultSource {
    pub fn with_config(config: &SourceConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .user_agent(config.user_agent.clone())
                .build()
                .unwrap_or_default(),
        }
    }

    async fn fetch_remote(&self, url: Url) -> Result<String, FetchError> {
        debug!("Fetching subtitles from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))
    }

    async fn fetch_local(&self, path: PathBuf) -> Result<String, FetchError> {
        debug!("Reading subtitles from {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl SubtitleSource for DefaultSource {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        match SubtitleLocation::parse(location)? {
            SubtitleLocation::Remote(url) => self.fetch_remote(url).await,
            SubtitleLocation::Local(path) => self.fetch_local(path).await,
        }
    }
}
