//! Rule-set retrieval from a local file or a remote URL

use crate::config::{ContentSource, FetchSettings};
use crate::error::{Result, RobotsTxtError};
use crate::metrics::Metrics;
use reqwest::Client;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on a single wait between attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(600);

/// Fetches external rule sets.
///
/// Remote fetches are retried on transport failures, body read failures and
/// 5xx responses, waiting `attempt * retry_backoff` between attempts. File
/// reads are attempted once.
pub struct ContentFetcher {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
    metrics: Arc<Metrics>,
}

impl ContentFetcher {
    pub fn new(settings: &FetchSettings, metrics: Arc<Metrics>) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| RobotsTxtError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: settings.max_retries.max(1),
            retry_backoff: settings.retry_backoff,
            metrics,
        })
    }

    pub async fn fetch(&self, source: &ContentSource) -> Result<String> {
        match source {
            ContentSource::File(path) => self.fetch_from_file(path).await,
            ContentSource::Url(url) => self.fetch_from_url(url).await,
        }
    }

    /// Read the whole file; any I/O error is returned as-is
    pub async fn fetch_from_file(&self, path: &Path) -> Result<String> {
        debug!(path = %path.display(), "Reading robots.txt from file");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RobotsTxtError::File {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET `url`, retrying retryable failures up to `max_retries` attempts
    pub async fn fetch_from_url(&self, url: &str) -> Result<String> {
        self.metrics.record_external_call();

        let content = retry_with_backoff(self.max_retries, self.retry_backoff, url, |attempt| {
            self.fetch_once(url, attempt)
        })
        .await?;

        debug!(url, bytes = content.len(), "Fetched robots.txt");
        Ok(content)
    }

    async fn fetch_once(&self, url: &str, attempt: u32) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RobotsTxtError::Http {
                attempt,
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RobotsTxtError::Status {
                status: status.as_u16(),
                attempt,
            });
        }

        response.text().await.map_err(|e| RobotsTxtError::Body {
            attempt,
            source: Box::new(e),
        })
    }
}

/// Run `op` until it succeeds, fails terminally or `max_retries` attempts are
/// used up. Attempt `n` is followed by a wait of `n * backoff`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    url: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_retries = max_retries.max(1);
    let mut attempt = 1;
    loop {
        if attempt > 1 {
            debug!(url, attempt, max_retries, "Retrying robots.txt fetch");
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = backoff.saturating_mul(attempt).min(MAX_RETRY_DELAY);
                warn!(
                    url,
                    error = %e,
                    "Fetch failed, retrying in {:?} (attempt {}/{})",
                    delay,
                    attempt,
                    max_retries
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
