use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Fallback shared secret for local development. Override in any real
/// deployment via `OTD_API_SECRET`.
const DEFAULT_API_SECRET: &str = "onthisday-dev-secret";

/// Fallback HMAC key for the optional request-signing path.
const DEFAULT_SIGNING_SECRET: &str = "onthisday-dev-signing-key";

/// Default origins allowed by CORS: local dev frontends.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub api_secret: String,
    pub signing_secret: String,
    pub base_url: String,
    pub data_path: Option<String>,
    pub allowed_origins: Vec<String>,
    pub token_max_age_secs: i64,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("OTD_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let api_secret = vars
            .get("OTD_API_SECRET")
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_SECRET.to_string());

        let signing_secret = vars
            .get("OTD_SIGNING_SECRET")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SIGNING_SECRET.to_string());

        let base_url = vars
            .get("OTD_BASE_URL")
            .cloned()
            .unwrap_or_else(|| "https://onthisday.example.com".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let data_path = vars.get("OTD_DATA_PATH").cloned();

        let allowed_origins = vars
            .get("OTD_ALLOWED_ORIGINS")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        let token_max_age_secs = parse_var(vars, "OTD_TOKEN_MAX_AGE_SECS", 300)?;
        let rate_limit_max = parse_var(vars, "OTD_RATE_LIMIT_MAX", 10)?;
        let rate_limit_window_secs = parse_var(vars, "OTD_RATE_LIMIT_WINDOW_SECS", 60)?;

        Ok(Config {
            bind_address,
            api_secret,
            signing_secret,
            base_url,
            data_path,
            allowed_origins,
            token_max_age_secs,
            rate_limit_max,
            rate_limit_window_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&HashMap::new()).expect("Config should load");

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api_secret, DEFAULT_API_SECRET);
        assert_eq!(config.base_url, "https://onthisday.example.com");
        assert_eq!(config.data_path, None);
        assert_eq!(config.token_max_age_secs, 300);
        assert_eq!(config.rate_limit_max, 10);
        assert_eq!(config.rate_limit_window_secs, 60);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn test_from_vars_custom_values() {
        let vars = HashMap::from([
            ("OTD_BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string()),
            ("OTD_API_SECRET".to_string(), "s3cret".to_string()),
            ("OTD_BASE_URL".to_string(), "https://otd.example.org/".to_string()),
            ("OTD_DATA_PATH".to_string(), "/srv/otd/history.json".to_string()),
            ("OTD_TOKEN_MAX_AGE_SECS".to_string(), "600".to_string()),
            ("OTD_RATE_LIMIT_MAX".to_string(), "25".to_string()),
        ]);

        let config = Config::from_vars(&vars).expect("Config should load");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.api_secret, "s3cret");
        // trailing slash is normalized away
        assert_eq!(config.base_url, "https://otd.example.org");
        assert_eq!(config.data_path, Some("/srv/otd/history.json".to_string()));
        assert_eq!(config.token_max_age_secs, 600);
        assert_eq!(config.rate_limit_max, 25);
    }

    #[test]
    fn test_from_vars_origin_list_is_trimmed() {
        let vars = HashMap::from([(
            "OTD_ALLOWED_ORIGINS".to_string(),
            " https://a.example.com , https://b.example.com ,".to_string(),
        )]);

        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_from_vars_rejects_non_numeric_knobs() {
        let vars = HashMap::from([(
            "OTD_TOKEN_MAX_AGE_SECS".to_string(),
            "five minutes".to_string(),
        )]);

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("OTD_TOKEN_MAX_AGE_SECS", v)) if v == "five minutes"
        ));
    }
}
