use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Pricing service
    pub pricing_api_url: String,
    pub pricing_api_timeout_seconds: u64,

    // Session
    pub submit_default_job: bool,

    // Logging
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));

        // Pricing service
        let pricing_api_url = env::var("PRICING_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string());
        validate_base_url(&pricing_api_url)?;
        let pricing_api_timeout_seconds = env::var("PRICING_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Session
        let submit_default_job = env::var("SUBMIT_DEFAULT_JOB")
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        // Logging
        let log_filter = env::var("LOG_FILTER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Settings {
            env,
            pricing_api_url,
            pricing_api_timeout_seconds,
            submit_default_job,
            log_filter,
        })
    }
}

/// Ensure the pricing service URL can carry `/jobs/...` path segments.
pub fn validate_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("PRICING_API_URL is not a valid URL: {raw}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("PRICING_API_URL cannot be used as a base URL: {raw}");
    }
    Ok(url)
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_defaults_to_dev() {
        assert_eq!(Environment::from_str("production"), Environment::Prod);
        assert_eq!(Environment::from_str("STAGING"), Environment::Staging);
        assert_eq!(Environment::from_str("anything"), Environment::Dev);
    }

    #[test]
    fn base_url_must_be_absolute() {
        assert!(validate_base_url("http://localhost:8000/api/v1").is_ok());
        assert!(validate_base_url("/api/v1").is_err());
        assert!(validate_base_url("mailto:ops@example.com").is_err());
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
