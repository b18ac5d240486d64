//! Structural sanity check for fetched rule sets
//!
//! Advisory only: callers log a failure and keep using the content.

use crate::error::{Result, RobotsTxtError};

const USER_AGENT_DIRECTIVE: &str = "user-agent:";

/// Check that `content` is non-empty and has at least one `User-agent:` line
pub fn validate_robots_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(RobotsTxtError::Validation("content is empty".to_string()));
    }

    let has_user_agent = content.lines().any(|line| {
        line.trim()
            .to_ascii_lowercase()
            .starts_with(USER_AGENT_DIRECTIVE)
    });

    if !has_user_agent {
        return Err(RobotsTxtError::Validation(
            "no User-agent directive found".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_content() {
        let content = "User-agent: GPTBot\nDisallow: /\n";
        assert!(validate_robots_content(content).is_ok());
    }

    #[test]
    fn test_directive_is_case_insensitive_and_trimmed() {
        assert!(validate_robots_content("# ai bots\n   USER-AGENT: CCBot\nDisallow: /").is_ok());
        assert!(validate_robots_content("\tuser-agent:*\r\n").is_ok());
    }

    #[test]
    fn test_empty_content() {
        let err = validate_robots_content("").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: content is empty");
    }

    #[test]
    fn test_missing_user_agent() {
        let err = validate_robots_content("Disallow: /private/\n").unwrap_err();
        assert!(err.to_string().contains("no User-agent directive found"));
    }

    #[test]
    fn test_directive_must_start_the_line() {
        assert!(validate_robots_content("# User-agent: commented out\n").is_err());
        assert!(validate_robots_content("   \n\n").is_err());
    }
}
