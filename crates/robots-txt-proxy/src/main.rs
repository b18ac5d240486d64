//! robots.txt proxy - serves a static site with an augmented /robots.txt
//!
//! The site's own robots.txt (if any) is extended with an external rule set
//! and custom rules on every request.

mod error;
mod server;
mod types;

use crate::error::{ProxyError, Result};
use crate::server::{start_server, ServerState, SharedState};
use crate::types::ProxyConfig;
use robots_txt_layer::{RobotsTxt, RobotsTxtConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("robots_txt_proxy=info".parse()?)
        .add_directive("robots_txt_layer=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting robots.txt proxy...");

    let config = load_config();
    info!("Port: {}", config.port);
    info!("Static dir: {:?}", config.static_dir);

    let robots_config = load_robots_config(config.config_file.as_deref())?;
    info!(
        overwrite = robots_config.overwrite,
        external = robots_config.ai_robots_txt,
        source = %robots_config.content_source().identifier(),
        cache_ttl_secs = robots_config.cache_ttl,
        max_retries = robots_config.max_retries,
        "robots.txt configuration loaded"
    );

    let robots = RobotsTxt::new(robots_config)?;
    let state: SharedState = Arc::new(ServerState::new(robots));

    // Start HTTP server (blocking)
    start_server(state, &config.static_dir, config.port)
        .await
        .map_err(|e| ProxyError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

fn load_config() -> ProxyConfig {
    let defaults = ProxyConfig::default();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(defaults.port);

    let static_dir = std::env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.static_dir);

    let config_file = std::env::var("ROBOTS_CONFIG_FILE").ok().map(PathBuf::from);

    ProxyConfig {
        port,
        static_dir,
        config_file,
    }
}

/// Middleware config from a JSON file when given, otherwise from the environment
fn load_robots_config(config_file: Option<&Path>) -> Result<RobotsTxtConfig> {
    match config_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let config: RobotsTxtConfig = serde_json::from_str(&raw)?;
            info!(path = %path.display(), "Loaded robots.txt configuration file");
            Ok(config)
        }
        None => Ok(RobotsTxtConfig::from_env()),
    }
}
