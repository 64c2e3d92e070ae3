use url::Url;

use super::HarnessConfig;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a harness configuration, collecting every problem found
    pub fn validate(config: &HarnessConfig) -> ValidationResult {
        let mut errors = Vec::new();

        if let Err(message) = Self::validate_http_url(&config.webdriver_url) {
            errors.push(ValidationError {
                field: "webdriver_url".to_string(),
                message,
            });
        }

        if let Some(url) = &config.server_url {
            if let Err(message) = Self::validate_http_url(url) {
                errors.push(ValidationError {
                    field: "server_url".to_string(),
                    message,
                });
            }
        }

        if let Some(token) = &config.token {
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                errors.push(ValidationError {
                    field: "token".to_string(),
                    message: "Token must be non-empty and contain no whitespace".to_string(),
                });
            }
        }

        if config.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "timeout_ms".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }

        if config.poll_interval_ms == 0 || config.poll_interval_ms >= config.timeout_ms {
            errors.push(ValidationError {
                field: "poll_interval_ms".to_string(),
                message: "Poll interval must be non-zero and shorter than the timeout".to_string(),
            });
        }

        if config.server_startup_ms == 0 {
            errors.push(ValidationError {
                field: "server_startup_ms".to_string(),
                message: "Server startup timeout must be greater than zero".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_http_url(value: &str) -> Result<(), String> {
        let url = Url::parse(value).map_err(|e| format!("Invalid URL '{value}': {e}"))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(format!("Unsupported URL scheme '{other}', expected http or https")),
        }
        if url.host_str().is_none() {
            return Err(format!("URL '{value}' has no host"));
        }
        Ok(())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: ValidationResult) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&HarnessConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_urls() {
        let config = HarnessConfig {
            webdriver_url: "localhost:9515".to_string(),
            server_url: Some("ftp://example.com/".to_string()),
            ..HarnessConfig::default()
        };
        let fields = fields(ConfigValidator::validate(&config));
        assert!(fields.contains(&"webdriver_url".to_string()));
        assert!(fields.contains(&"server_url".to_string()));
    }

    #[test]
    fn test_bad_timeouts() {
        let config = HarnessConfig {
            timeout_ms: 0,
            server_startup_ms: 0,
            ..HarnessConfig::default()
        };
        let fields = fields(ConfigValidator::validate(&config));
        assert_eq!(
            fields,
            vec!["timeout_ms", "poll_interval_ms", "server_startup_ms"]
        );
    }

    #[test]
    fn test_poll_interval_must_be_below_timeout() {
        let config = HarnessConfig {
            timeout_ms: 100,
            poll_interval_ms: 100,
            ..HarnessConfig::default()
        };
        assert_eq!(
            fields(ConfigValidator::validate(&config)),
            vec!["poll_interval_ms"]
        );
    }

    #[test]
    fn test_token_with_whitespace() {
        let config = HarnessConfig {
            token: Some("a b".to_string()),
            ..HarnessConfig::default()
        };
        assert_eq!(fields(ConfigValidator::validate(&config)), vec!["token"]);
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError {
            field: "timeout_ms".to_string(),
            message: "Timeout must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "timeout_ms: Timeout must be greater than zero"
        );
    }
}
