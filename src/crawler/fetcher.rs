//! Fetch primitive
//!
//! This module opens byte streams for URLs:
//! - Building the blocking HTTP client with the configured user agent
//! - GET requests whose body is handed back unread
//! - Local `file://` URLs
//! - Error classification
//!
//! No retries are attempted; a failed open is reported once and the caller
//! moves on.

use crate::config::FetchConfig;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while opening a stream
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Malformed URL '{url}': {source}")]
    MalformedUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Unsupported URL scheme '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error for {url}: {source}")]
    Io { url: String, source: std::io::Error },
}

/// Opens a byte stream for a URL
pub trait Fetch {
    /// Opens `url` for reading
    ///
    /// The stream is closed when the returned reader is dropped.
    fn open_stream(&self, url: &Url) -> Result<Box<dyn Read>, FetchError>;

    /// Parses `url` and opens it
    fn open_str(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::MalformedUrl {
            url: url.to_string(),
            source,
        })?;
        self.open_stream(&parsed)
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn open_stream(&self, url: &Url) -> Result<Box<dyn Read>, FetchError> {
        (**self).open_stream(url)
    }
}

/// Builds a blocking HTTP client from the fetch configuration
///
/// No read deadline is applied unless `read_timeout_secs` is configured.
///
/// # Example
///
/// ```no_run
/// use linkwalk::config::FetchConfig;
/// use linkwalk::crawler::build_http_client;
///
/// let config = FetchConfig {
///     user_agent: "linkwalk/0.1".to_string(),
///     read_timeout_secs: Some(30),
///     connect_timeout_secs: Some(10),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.read_timeout_secs.map(Duration::from_secs))
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetcher for `http`, `https` and `file` URLs
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn open_http(&self, url: &Url) -> Result<Box<dyn Read>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Box::new(response))
    }

    fn open_file(&self, url: &Url) -> Result<Box<dyn Read>, FetchError> {
        let path = url.to_file_path().map_err(|_| FetchError::Io {
            url: url.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local path"),
        })?;

        let file = File::open(&path).map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })?;

        Ok(Box::new(file))
    }
}

impl Fetch for HttpFetcher {
    fn open_stream(&self, url: &Url) -> Result<Box<dyn Read>, FetchError> {
        match url.scheme() {
            "http" | "https" => self.open_http(url),
            "file" => self.open_file(url),
            other => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }
}
