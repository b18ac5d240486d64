//! Middleware configuration
//!
//! Field names follow the camelCase keys of the plugin's JSON configuration,
//! so a config block can be deserialized straight into [`RobotsTxtConfig`].

use crate::error::{Result, RobotsTxtError};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_AI_ROBOTS_TXT_URL: &str =
    "https://raw.githubusercontent.com/ai-robots-txt/ai.robots.txt/refs/heads/main/robots.txt";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;
pub const MAX_RETRIES: u32 = 10;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const MAX_RETRY_BACKOFF_MS: u64 = 60_000;
const DEFAULT_USER_AGENT: &str = concat!("robots-txt-layer/", env!("CARGO_PKG_VERSION"));

/// Configuration for the robots.txt middleware
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RobotsTxtConfig {
    /// Rules appended verbatim after everything else
    pub custom_rules: String,
    /// Drop the backend's own robots.txt body
    pub overwrite: bool,
    /// Fetch an external rule set (URL or local file)
    pub ai_robots_txt: bool,
    /// Keep the backend's Last-Modified header
    pub last_modified: bool,
    pub ai_robots_txt_url: String,
    /// Local file used instead of the URL when set; must be absolute
    pub ai_robots_txt_path: Option<PathBuf>,
    /// Seconds a fetched rule set stays cached
    #[serde(deserialize_with = "lenient_u64")]
    pub cache_ttl: u64,
    #[serde(deserialize_with = "lenient_u32")]
    pub max_retries: u32,
    /// Per-attempt timeout in seconds
    #[serde(deserialize_with = "lenient_u64")]
    pub request_timeout: u64,
    /// Backoff unit between retries; attempt `n` waits `n` units
    #[serde(deserialize_with = "lenient_u64")]
    pub retry_backoff_ms: u64,
    /// Served in place of the external rules when fetching fails
    pub fallback_content: String,
    pub enable_metrics: bool,
}

impl Default for RobotsTxtConfig {
    fn default() -> Self {
        Self {
            custom_rules: String::new(),
            overwrite: false,
            ai_robots_txt: false,
            last_modified: false,
            ai_robots_txt_url: DEFAULT_AI_ROBOTS_TXT_URL.to_string(),
            ai_robots_txt_path: None,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            fallback_content: String::new(),
            enable_metrics: false,
        }
    }
}

/// Where the external rule set comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    /// Cache key for this source
    pub fn identifier(&self) -> String {
        match self {
            ContentSource::File(path) => path.display().to_string(),
            ContentSource::Url(url) => url.clone(),
        }
    }
}

/// Fetch parameters derived once from a validated [`RobotsTxtConfig`]
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub source: ContentSource,
    pub max_retries: u32,
    pub request_timeout: Duration,
    pub retry_backoff: Duration,
    pub cache_ttl: Duration,
    pub fallback_content: String,
    pub user_agent: String,
}

impl RobotsTxtConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let custom_rules = env::var("ROBOTS_CUSTOM_RULES").unwrap_or_default();

        let overwrite = env_bool("ROBOTS_OVERWRITE").unwrap_or(defaults.overwrite);
        let ai_robots_txt = env_bool("ROBOTS_AI_ENABLED").unwrap_or(defaults.ai_robots_txt);
        let last_modified = env_bool("ROBOTS_LAST_MODIFIED").unwrap_or(defaults.last_modified);
        let enable_metrics =
            env_bool("ROBOTS_ENABLE_METRICS").unwrap_or(defaults.enable_metrics);

        let ai_robots_txt_url =
            env::var("ROBOTS_AI_URL").unwrap_or_else(|_| DEFAULT_AI_ROBOTS_TXT_URL.to_string());

        let ai_robots_txt_path = env::var("ROBOTS_AI_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let cache_ttl = env::var("ROBOTS_CACHE_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let max_retries = env::var("ROBOTS_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let request_timeout = env::var("ROBOTS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let retry_backoff_ms = env::var("ROBOTS_RETRY_BACKOFF_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_BACKOFF_MS);

        let fallback_content = env::var("ROBOTS_FALLBACK_CONTENT").unwrap_or_default();

        Self {
            custom_rules,
            overwrite,
            ai_robots_txt,
            last_modified,
            ai_robots_txt_url,
            ai_robots_txt_path,
            cache_ttl,
            max_retries,
            request_timeout,
            retry_backoff_ms,
            fallback_content,
            enable_metrics,
        }
    }

    /// Replace zero or empty tunables with their defaults
    pub fn normalized(mut self) -> Self {
        if self.cache_ttl == 0 {
            self.cache_ttl = DEFAULT_CACHE_TTL_SECS;
        }
        if self.max_retries == 0 {
            self.max_retries = DEFAULT_MAX_RETRIES;
        }
        if self.request_timeout == 0 {
            self.request_timeout = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
        if self.ai_robots_txt_url.trim().is_empty() {
            self.ai_robots_txt_url = DEFAULT_AI_ROBOTS_TXT_URL.to_string();
        }
        self
    }

    /// Reject configurations the middleware cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.custom_rules.is_empty() && !self.ai_robots_txt {
            return Err(RobotsTxtError::Config(
                "set customRules or set aiRobotsTxt to true".to_string(),
            ));
        }

        if let Some(path) = &self.ai_robots_txt_path {
            if !path.is_absolute() {
                return Err(RobotsTxtError::Config(format!(
                    "aiRobotsTxtPath must be an absolute path: {}",
                    path.display()
                )));
            }
            if !path.exists() {
                warn!(path = %path.display(), "aiRobotsTxtPath does not exist");
            }
        } else if self.ai_robots_txt {
            let url = url::Url::parse(&self.ai_robots_txt_url).map_err(|e| {
                RobotsTxtError::Config(format!(
                    "invalid aiRobotsTxtUrl {}: {}",
                    self.ai_robots_txt_url, e
                ))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(RobotsTxtError::Config(format!(
                    "aiRobotsTxtUrl must use http or https: {}",
                    self.ai_robots_txt_url
                )));
            }
        }

        check_upper_bound("cacheTtl", self.cache_ttl, MAX_CACHE_TTL_SECS)?;
        check_upper_bound("maxRetries", self.max_retries.into(), MAX_RETRIES.into())?;
        check_upper_bound(
            "requestTimeout",
            self.request_timeout,
            MAX_REQUEST_TIMEOUT_SECS,
        )?;
        check_upper_bound("retryBackoffMs", self.retry_backoff_ms, MAX_RETRY_BACKOFF_MS)?;

        Ok(())
    }

    /// Resolve the external source; the local path wins over the URL
    pub fn content_source(&self) -> ContentSource {
        match &self.ai_robots_txt_path {
            Some(path) => ContentSource::File(path.clone()),
            None => ContentSource::Url(self.ai_robots_txt_url.clone()),
        }
    }

    /// Fetch parameters, or `None` when external rules are disabled
    pub fn fetch_settings(&self) -> Option<FetchSettings> {
        if !self.ai_robots_txt {
            return None;
        }

        Some(FetchSettings {
            source: self.content_source(),
            max_retries: self.max_retries.max(1),
            request_timeout: Duration::from_secs(self.request_timeout),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            cache_ttl: Duration::from_secs(self.cache_ttl),
            fallback_content: self.fallback_content.clone(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}

fn check_upper_bound(field: &str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(RobotsTxtError::Config(format!(
            "{} must be at most {}, got {}",
            field, max, value
        )));
    }
    Ok(())
}

/// Accepts any JSON integer; negatives become 0 so `normalized` applies the default
struct LenientInt;

impl<'de> Visitor<'de> for LenientInt {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u64, E> {
        Ok(u64::try_from(v).unwrap_or(0))
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    deserializer.deserialize_i64(LenientInt)
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = deserializer.deserialize_i64(LenientInt)?;
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

fn env_bool(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
