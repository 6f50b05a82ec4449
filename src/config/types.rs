use serde::Deserialize;

/// Main configuration structure for Netco-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub download: DownloadConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Source website configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that category keys are appended to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Directory holding one `<category-key>.html` bootstrap page per category
    #[serde(rename = "html-dir")]
    pub html_dir: String,
}

/// Download behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Root directory that category folders are created under
    #[serde(rename = "documents-dir")]
    pub documents_dir: String,

    /// Maximum number of file fetches in flight at once
    #[serde(rename = "max-concurrent-downloads", default = "default_max_concurrent")]
    pub max_concurrent_downloads: u32,

    /// Whole-request timeout for page and file fetches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON snapshot written after each run
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,
}

fn default_max_concurrent() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                base_url: "https://www.netcovn.com.vn".to_string(),
                html_dir: "./respone".to_string(),
            },
            download: DownloadConfig {
                documents_dir: "./static/documents".to_string(),
                max_concurrent_downloads: default_max_concurrent(),
                request_timeout_secs: default_timeout_secs(),
            },
            user_agent: UserAgentConfig {
                crawler_name: "NetcoHarvest".to_string(),
                crawler_version: env!("CARGO_PKG_VERSION").to_string(),
                contact_url: "https://www.netcovn.com.vn".to_string(),
                contact_email: "admin@netcovn.com.vn".to_string(),
            },
            output: OutputConfig {
                snapshot_path: "./static/data.json".to_string(),
            },
        }
    }
}
