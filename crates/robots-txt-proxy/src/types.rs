//! Core types for the robots.txt proxy

use robots_txt_layer::MetricsSnapshot;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for the proxy process
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Optional JSON file holding the middleware configuration
    pub config_file: Option<PathBuf>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            static_dir: PathBuf::from("./public"),
            config_file: None,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cached_sources: usize,
    pub metrics: Option<MetricsSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 3005);
        assert_eq!(config.static_dir, PathBuf::from("./public"));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 3600,
            cached_sources: 1,
            metrics: Some(MetricsSnapshot {
                cache_hits: 500,
                cache_misses: 5,
                external_calls: 5,
                errors: 0,
            }),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"uptime_secs\":3600"));
        assert!(json.contains("\"cache_hits\":500"));
    }

    #[test]
    fn test_health_response_without_metrics() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 0,
            cached_sources: 0,
            metrics: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"metrics\":null"));
    }
}
