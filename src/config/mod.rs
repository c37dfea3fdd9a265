//! Configuration handling for the course finder.
//!
//! Values come from environment variables with defaults that point at the
//! live catalog. The command-line front-end layers its own overrides on top
//! via the `with_*` builders.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable names.
pub const ENV_BASE_URL: &str = "COURSEFINDER_BASE_URL";
pub const ENV_OUTPUT: &str = "COURSEFINDER_OUTPUT";
pub const ENV_USER_AGENT: &str = "COURSEFINDER_USER_AGENT";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "COURSEFINDER_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "COURSEFINDER_REQUEST_TIMEOUT_SECS";
pub const ENV_INTERIM_REPORT: &str = "COURSEFINDER_INTERIM_REPORT";

const DEFAULT_BASE_URL: &str = "https://courseinfo.canterbury.ac.nz/";
const DEFAULT_OUTPUT: &str = "course_info_final.csv";
// The catalog turns away clients that don't look like a browser.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Topics searched when the caller supplies no keywords of its own.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "Cognitive",
    "generative",
    "large language model",
    "Cyber",
    "genAI",
    "llm",
    "deep learning",
    "Artificial Intelligence",
    "artificial intelligence",
    "Neural Network",
    "Deep Learning",
    "AI Ethics",
    "Machine Learning",
    "Computer Vision",
    "Natural Language Processing",
    "Reinforcement Learning",
    "AI Safety",
    "Generative Models",
    "Artificial General Intelligence",
];

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: Url,
    output_path: PathBuf,
    user_agent: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    interim_report: bool,
}

impl Config {
    /// Build a config for the given catalog host with default everything else.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_BASE_URL) {
            config.base_url = parse_base_url(&raw)?;
        }
        if let Ok(raw) = env::var(ENV_OUTPUT) {
            config.output_path = PathBuf::from(raw);
        }
        if let Ok(raw) = env::var(ENV_USER_AGENT) {
            config.user_agent = raw;
        }
        if let Ok(raw) = env::var(ENV_CONNECT_TIMEOUT_SECS) {
            config.connect_timeout = parse_secs(ENV_CONNECT_TIMEOUT_SECS, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout = parse_secs(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_INTERIM_REPORT) {
            config.interim_report = parse_flag(ENV_INTERIM_REPORT, &raw)?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_interim_report(mut self, enabled: bool) -> Self {
        self.interim_report = enabled;
        self
    }

    /// Catalog root; always ends with `/` so relative joins stay under it.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
    /// Where the CSV report is written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    /// Whether the pre-enrichment summary is written before detail pages are fetched.
    pub fn interim_report(&self) -> bool {
        self.interim_report
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // constant input, always parses
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            interim_report: true,
        }
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field: ENV_BASE_URL,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidValue {
            field: ENV_BASE_URL,
            reason: format!("'{raw}' cannot be used as a base url"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_secs(field: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("expected whole seconds, got '{raw}'"),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected a boolean, got '{raw}'"),
        }),
    }
}
