//! Error types for the robots.txt layer

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum RobotsTxtError {
    Config(String),
    Http {
        attempt: u32,
        source: Box<reqwest::Error>,
    },
    Status {
        status: u16,
        attempt: u32,
    },
    Body {
        attempt: u32,
        source: Box<reqwest::Error>,
    },
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    Validation(String),
}

impl RobotsTxtError {
    /// Whether a failed remote attempt is worth repeating.
    ///
    /// Transport and body read failures are retried, as are server errors.
    /// Any other status is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            RobotsTxtError::Http { .. } | RobotsTxtError::Body { .. } => true,
            RobotsTxtError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for RobotsTxtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotsTxtError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RobotsTxtError::Http { attempt, source } => {
                write!(f, "HTTP request failed (attempt {}): {}", attempt, source)
            }
            RobotsTxtError::Status { status, attempt } => {
                write!(f, "HTTP status code {} (attempt {})", status, attempt)
            }
            RobotsTxtError::Body { attempt, source } => write!(
                f,
                "Failed to read response body (attempt {}): {}",
                attempt, source
            ),
            RobotsTxtError::File { path, source } => {
                write!(f, "Failed to read file {}: {}", path.display(), source)
            }
            RobotsTxtError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for RobotsTxtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RobotsTxtError::Http { source, .. } | RobotsTxtError::Body { source, .. } => {
                Some(source.as_ref())
            }
            RobotsTxtError::File { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RobotsTxtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = RobotsTxtError::Config("set customRules or set aiRobotsTxt to true".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: set customRules or set aiRobotsTxt to true"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = RobotsTxtError::Status {
            status: 503,
            attempt: 2,
        };
        assert_eq!(format!("{}", err), "HTTP status code 503 (attempt 2)");
    }

    #[test]
    fn test_file_error_display_and_source() {
        let err = RobotsTxtError::File {
            path: PathBuf::from("/etc/robots/ai.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/etc/robots/ai.txt"));
        assert!(msg.contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_retryable_statuses() {
        let server = RobotsTxtError::Status {
            status: 500,
            attempt: 1,
        };
        let bad_gateway = RobotsTxtError::Status {
            status: 502,
            attempt: 1,
        };
        let not_found = RobotsTxtError::Status {
            status: 404,
            attempt: 1,
        };
        assert!(server.is_retryable());
        assert!(bad_gateway.is_retryable());
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        let file = RobotsTxtError::File {
            path: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!file.is_retryable());
        assert!(!RobotsTxtError::Config("bad".to_string()).is_retryable());
        assert!(!RobotsTxtError::Validation("empty".to_string()).is_retryable());
    }

    #[test]
    fn test_error_is_debug() {
        let err = RobotsTxtError::Validation("content is empty".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Validation"));
    }
}
