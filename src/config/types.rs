use serde::Deserialize;

/// Main configuration structure
///
/// Every table is optional; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Crawl bound overrides
///
/// Non-positive values are accepted here and ignored when the bounds are
/// applied, leaving the defaults in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of frontier pops
    #[serde(rename = "max-links")]
    pub max_links: Option<i64>,

    /// Maximum depth (priority counter bound)
    #[serde(rename = "max-depth")]
    pub max_depth: Option<i64>,
}

/// Fetch primitive configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Deadline for a whole request including body reads; none by default
    #[serde(rename = "read-timeout-secs")]
    pub read_timeout_secs: Option<u64>,

    /// Deadline for establishing a connection
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            read_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("linkwalk/{}", env!("CARGO_PKG_VERSION"))
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "./linkwalk.db".to_string()
}

/// Search terms handed to the match predicate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub terms: Vec<String>,
}
