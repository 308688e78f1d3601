use crate::profile::Profile;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};

/// Fixed relative path of the profile document
pub const PROFILE_PATH: &str = "profile.json";

/// Why the profile could not be loaded.
///
/// Both kinds collapse into the same terminal failed state on the page; the
/// distinction only shows up in the diagnostic log.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch profile from {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("failed to parse profile document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    fn fetch(location: impl fmt::Display, reason: impl fmt::Display) -> Self {
        LoadError::Fetch {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result of the single profile load
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// The fetch has not settled yet
    #[default]
    Loading,
    /// The profile was fetched and parsed
    Ready(Profile),
    /// Fetch or parse failed; terminal for the session
    Failed,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            LoadState::Ready(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Source of the raw profile document
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Read the document once and return its text
    async fn fetch_document(&self) -> Result<String, LoadError>;

    /// Human readable location for logs
    fn location(&self) -> String;
}

/// Reads the profile document from the local filesystem
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ProfileFetcher for FileFetcher {
    async fn fetch_document(&self) -> Result<String, LoadError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|err| LoadError::fetch(self.path.display(), err))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Issues a single HTTP GET for `{base}/profile.json`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    /// Create a fetcher for a site base URL. A URL that already names a
    /// `.json` document is used as is.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Same as [`HttpFetcher::new`] with a preconfigured client
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        let url = if base_url.ends_with(".json") {
            base_url.to_string()
        } else {
            format!("{}/{}", base_url.trim_end_matches('/'), PROFILE_PATH)
        };

        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProfileFetcher for HttpFetcher {
    async fn fetch_document(&self) -> Result<String, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| LoadError::fetch(&self.url, err))?;

        // Non-2xx responses count as a failed fetch
        let response = response
            .error_for_status()
            .map_err(|err| LoadError::fetch(&self.url, err))?;

        response
            .text()
            .await
            .map_err(|err| LoadError::fetch(&self.url, err))
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Where the profile document comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSource {
    File(PathBuf),
    Url(String),
}

impl ProfileSource {
    /// Interpret a command line or config value: `http://` and `https://`
    /// prefixes select HTTP, anything else is a file path
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ProfileSource::Url(value.to_string())
        } else {
            ProfileSource::File(PathBuf::from(value))
        }
    }

    pub fn fetcher(&self) -> Box<dyn ProfileFetcher> {
        match self {
            ProfileSource::File(path) => Box::new(FileFetcher::new(path)),
            ProfileSource::Url(url) => Box::new(HttpFetcher::new(url)),
        }
    }
}

impl Default for ProfileSource {
    fn default() -> Self {
        ProfileSource::File(PathBuf::from(PROFILE_PATH))
    }
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileSource::File(path) => write!(f, "{}", path.display()),
            ProfileSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fetch and parse the profile document
pub async fn fetch_profile(fetcher: &dyn ProfileFetcher) -> Result<Profile, LoadError> {
    debug!(location = %fetcher.location(), "fetching profile document");
    let content = fetcher.fetch_document().await?;
    Profile::from_json_str(&content)
}

/// Perform the single profile load.
///
/// There is no retry and no timeout: the first outcome is final. Errors are
/// logged and collapsed into [`LoadState::Failed`].
pub async fn load_profile(fetcher: &dyn ProfileFetcher) -> LoadState {
    match fetch_profile(fetcher).await {
        Ok(profile) => {
            info!(location = %fetcher.location(), name = %profile.name, "profile loaded");
            LoadState::Ready(profile)
        }
        Err(err) => {
            error!(location = %fetcher.location(), error = %err, "error loading profile");
            LoadState::Failed
        }
    }
}
