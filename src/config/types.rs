use serde::Deserialize;

/// Main configuration structure for Contact-Ripple
///
/// Every section and key is optional; missing values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub server: ServerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of frontier pops per site before giving up
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Timeout applied to each individual GET request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Default number of sites crawled at the same time
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Default execution mode for batches
    pub concurrent: bool,

    /// Link suffixes that are never queued (documents, images, archives)
    #[serde(rename = "skip-extensions")]
    pub skip_extensions: Vec<String>,
}

/// Upper bound on sites crawled at the same time
pub const MAX_WORKERS: usize = 100;

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            request_timeout_secs: 10,
            max_workers: 10,
            concurrent: true,
            skip_extensions: default_skip_extensions(),
        }
    }
}

fn default_skip_extensions() -> Vec<String> {
    [
        ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".zip", ".rar", ".doc", ".docx", ".xls",
        ".xlsx", ".ppt", ".pptx",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler (optional)
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "contact-ripple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version`, or `Name/Version (+ContactURL)` when a contact URL is set.
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}
