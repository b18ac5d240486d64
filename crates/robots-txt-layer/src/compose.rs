//! robots.txt body assembly
//!
//! Output layout: `[backend body + "\n"] + marker + [external rules] + custom rules`.

use crate::cache::ContentCache;
use crate::config::{FetchSettings, RobotsTxtConfig};
use crate::error::Result;
use crate::fetcher::ContentFetcher;
use crate::metrics::Metrics;
use crate::types::MetricsSnapshot;
use crate::validation::validate_robots_content;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Line inserted between the backend body and the added rules
pub const ATTRIBUTION_MARKER: &str =
    "# The following content was added on the fly by robots-txt-layer\n";

struct ExternalRules {
    settings: FetchSettings,
    source_key: String,
    fetcher: ContentFetcher,
}

/// Composes robots.txt responses. Cheap to share behind an `Arc`.
pub struct RobotsTxt {
    custom_rules: String,
    overwrite: bool,
    preserve_last_modified: bool,
    external: Option<ExternalRules>,
    cache: Arc<ContentCache>,
    metrics: Arc<Metrics>,
}

impl RobotsTxt {
    /// Build from `config` with a private cache
    pub fn new(config: RobotsTxtConfig) -> Result<Self> {
        Self::with_cache(config, Arc::new(ContentCache::new()))
    }

    /// Build from `config`, storing fetched rules in `cache`
    pub fn with_cache(config: RobotsTxtConfig, cache: Arc<ContentCache>) -> Result<Self> {
        let config = config.normalized();
        config.validate()?;

        let metrics = Arc::new(Metrics::new(config.enable_metrics));

        let external = match config.fetch_settings() {
            Some(settings) => {
                let fetcher = ContentFetcher::new(&settings, metrics.clone())?;
                Some(ExternalRules {
                    source_key: settings.source.identifier(),
                    settings,
                    fetcher,
                })
            }
            None => None,
        };

        if metrics.is_enabled() {
            info!(
                cache_ttl_secs = config.cache_ttl,
                external = config.ai_robots_txt,
                "robots.txt layer initialized with metrics enabled"
            );
        }

        Ok(Self {
            custom_rules: config.custom_rules,
            overwrite: config.overwrite,
            preserve_last_modified: config.last_modified,
            external,
            cache,
            metrics,
        })
    }

    pub fn preserve_last_modified(&self) -> bool {
        self.preserve_last_modified
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Counter values, or `None` when metrics are disabled
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.metrics.snapshot()
    }

    pub(crate) fn record_error(&self) {
        self.metrics.record_error();
    }

    pub(crate) fn metrics_handle(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    pub(crate) fn metrics_enabled(&self) -> bool {
        self.metrics.is_enabled()
    }

    /// Assemble the response body for a backend answer.
    ///
    /// The backend body is dropped when `overwrite` is set or the backend
    /// answered 404.
    pub async fn compose(&self, backend_status: StatusCode, backend_body: &str) -> String {
        let mut body = String::new();

        if !self.overwrite && backend_status != StatusCode::NOT_FOUND {
            body.push_str(backend_body);
            body.push('\n');
        }

        body.push_str(ATTRIBUTION_MARKER);

        if self.external.is_some() {
            body.push_str(&self.external_rules().await);
        }

        body.push_str(&self.custom_rules);
        body
    }

    /// External rules from cache or source, or the fallback text on failure.
    ///
    /// Empty when external rules are disabled.
    pub async fn external_rules(&self) -> String {
        let Some(external) = &self.external else {
            return String::new();
        };

        match self.fetch_with_cache(external).await {
            Ok(content) => content,
            Err(e) => {
                self.metrics.record_error();
                error!(source = %external.source_key, error = %e, "Unable to fetch external robots.txt");
                if !external.settings.fallback_content.is_empty() {
                    info!(source = %external.source_key, "Using fallback content for external robots.txt");
                }
                external.settings.fallback_content.clone()
            }
        }
    }

    async fn fetch_with_cache(&self, external: &ExternalRules) -> Result<String> {
        let key = external.source_key.as_str();

        if let Some(content) = self.cache.get(key).await {
            self.metrics.record_cache_hit();
            debug!(source = %key, "Cache hit");
            return Ok(content);
        }

        self.metrics.record_cache_miss();
        debug!(source = %key, "Cache miss");

        let content = external.fetcher.fetch(&external.settings.source).await?;

        if let Err(e) = validate_robots_content(&content) {
            warn!(source = %key, error = %e, "Fetched robots.txt failed validation");
        }

        self.cache
            .put(key, content.clone(), external.settings.cache_ttl)
            .await;
        debug!(source = %key, ttl = ?external.settings.cache_ttl, "Cached external robots.txt");

        Ok(content)
    }
}
