//! robots.txt augmentation middleware for axum
//!
//! Intercepts `/robots.txt`, keeps (or drops) the backend's own body and
//! appends an external rule set plus statically configured rules. The
//! external rule set is read from a local file or fetched from a URL with
//! bounded retries, then held in an in-memory TTL cache.

pub mod body;
pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod middleware;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use body::ComposedBody;
pub use cache::ContentCache;
pub use compose::{RobotsTxt, ATTRIBUTION_MARKER};
pub use config::{ContentSource, FetchSettings, RobotsTxtConfig, DEFAULT_AI_ROBOTS_TXT_URL};
pub use error::{Result, RobotsTxtError};
pub use fetcher::ContentFetcher;
pub use metrics::Metrics;
pub use middleware::{is_robots_txt_path, robots_txt_middleware, ROBOTS_TXT_PATH};
pub use types::{CacheEntry, MetricsSnapshot};
pub use validation::validate_robots_content;
