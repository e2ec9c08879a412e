//! Credential and target configuration
//!
//! Credentials are never compiled in. They come from the builder, the CLI, or
//! the environment:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `LANGFUSE_PUBLIC_KEY` | yes | |
//! | `LANGFUSE_SECRET_KEY` | yes | |
//! | `LANGFUSE_LABEL` | no | `production` |
//! | `LANGFUSE_HOSTS` | no | EU then US cloud (falls back to `LANGFUSE_BASE_URL`) |
//! | `LANGFUSE_ENDPOINTS` | no | depends on the auth style |
//! | `LANGFUSE_AUTH_STYLE` | no | `basic` |
//! | `LANGFUSE_TIMEOUT_SECS` | no | 15 |
//! | `LANGFUSE_PREVIEW_LEN` | no | 300 |

use bon::bon;
use reqwest::Url;
use std::time::Duration;

use crate::auth::AuthStyle;
use crate::error::{Error, Result};
use crate::security::SecretString;

/// Langfuse EU cloud
pub const EU_HOST: &str = "https://cloud.langfuse.com";
/// Langfuse US cloud
pub const US_HOST: &str = "https://us.cloud.langfuse.com";

/// Default label filter
pub const DEFAULT_LABEL: &str = "production";

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest per-attempt timeout accepted by [`FetcherConfig::validate`]
pub const MAX_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of content characters shown per prompt
pub const DEFAULT_PREVIEW_LEN: usize = 300;

const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const SDK_NAME: &str = env!("CARGO_PKG_NAME");

pub fn default_hosts() -> Vec<String> {
    vec![EU_HOST.to_string(), US_HOST.to_string()]
}

/// Endpoint variants tried per host for the given auth style
pub fn default_endpoints(auth: AuthStyle) -> Vec<String> {
    match auth {
        AuthStyle::Header => vec![
            "/api/public/prompts".to_string(),
            "/api/public/prompts/list".to_string(),
            "/api/public/v2/prompts".to_string(),
        ],
        AuthStyle::Basic => vec!["/api/public/prompts".to_string()],
        AuthStyle::Sdk => Vec::new(),
    }
}

/// Everything needed to run one discovery pass
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub public_key: String,
    pub secret_key: SecretString,
    pub label: String,
    pub hosts: Vec<String>,
    pub endpoints: Vec<String>,
    pub auth_style: AuthStyle,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub preview_len: usize,
    pub user_agent: String,
}

#[bon]
impl FetcherConfig {
    #[builder]
    pub fn new(
        #[builder(into)] public_key: String,
        #[builder(into)] secret_key: SecretString,
        #[builder(into, default = DEFAULT_LABEL.to_string())] label: String,
        #[builder(default = default_hosts())] hosts: Vec<String>,
        endpoints: Option<Vec<String>>,
        #[builder(default)] auth_style: AuthStyle,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
        preview_len: Option<usize>,
        #[builder(into)] user_agent: Option<String>,
    ) -> Self {
        let hosts = hosts
            .into_iter()
            .map(|h| h.trim().trim_end_matches('/').to_string())
            .filter(|h| !h.is_empty())
            .collect();
        let endpoints = endpoints
            .unwrap_or_else(|| default_endpoints(auth_style))
            .into_iter()
            .map(|e| normalize_endpoint(&e))
            .collect();

        Self {
            public_key: public_key.trim().to_string(),
            secret_key,
            label: label.trim().to_string(),
            hosts,
            endpoints,
            auth_style,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            preview_len: preview_len.unwrap_or(DEFAULT_PREVIEW_LEN),
            user_agent: user_agent.unwrap_or_else(|| format!("{}/{} (Rust)", SDK_NAME, SDK_VERSION)),
        }
    }
}

impl FetcherConfig {
    /// Create a configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a configuration from any key/value source
    ///
    /// Empty values are treated as unset. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let public_key = get("LANGFUSE_PUBLIC_KEY").ok_or_else(|| {
            Error::Configuration("LANGFUSE_PUBLIC_KEY environment variable not set".to_string())
        })?;
        let secret_key = get("LANGFUSE_SECRET_KEY").ok_or_else(|| {
            Error::Configuration("LANGFUSE_SECRET_KEY environment variable not set".to_string())
        })?;

        let auth_style = match get("LANGFUSE_AUTH_STYLE") {
            Some(raw) => raw.parse()?,
            None => AuthStyle::default(),
        };

        let hosts = get("LANGFUSE_HOSTS")
            .or_else(|| get("LANGFUSE_BASE_URL"))
            .map(|raw| split_list(&raw))
            .unwrap_or_else(default_hosts);

        let timeout = get("LANGFUSE_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("LANGFUSE_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let preview_len = get("LANGFUSE_PREVIEW_LEN")
            .map(|raw| parse_number::<usize>("LANGFUSE_PREVIEW_LEN", &raw))
            .transpose()?;

        let config = Self::builder()
            .public_key(public_key)
            .secret_key(secret_key)
            .label(get("LANGFUSE_LABEL").unwrap_or_else(|| DEFAULT_LABEL.to_string()))
            .hosts(hosts)
            .maybe_endpoints(get("LANGFUSE_ENDPOINTS").map(|raw| split_list(&raw)))
            .auth_style(auth_style)
            .maybe_timeout(timeout)
            .maybe_preview_len(preview_len)
            .build();

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on configuration that cannot produce a single valid request
    pub fn validate(&self) -> Result<()> {
        if self.public_key.is_empty() {
            return Err(Error::Configuration("public key is empty".to_string()));
        }
        if self.secret_key.expose_secret().trim().is_empty() {
            return Err(Error::Configuration("secret key is empty".to_string()));
        }
        if self.label.is_empty() {
            return Err(Error::Configuration("label filter is empty".to_string()));
        }
        if self.hosts.is_empty() {
            return Err(Error::Configuration("at least one host is required".to_string()));
        }
        for host in &self.hosts {
            let url = Url::parse(host)
                .map_err(|e| Error::Configuration(format!("invalid host '{}': {}", host, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::Configuration(format!(
                    "host '{}' must use http or https",
                    host
                )));
            }
        }
        if self.auth_style.uses_endpoints() && self.endpoints.is_empty() {
            return Err(Error::Configuration(format!(
                "auth style '{}' needs at least one endpoint",
                self.auth_style
            )));
        }
        if self.preview_len == 0 {
            return Err(Error::Configuration(
                "preview length must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() || self.timeout > MAX_TIMEOUT {
            return Err(Error::Configuration(format!(
                "timeout must be greater than zero and at most {} seconds",
                MAX_TIMEOUT.as_secs()
            )));
        }
        Ok(())
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{} must be a number, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 2] = [
        ("LANGFUSE_PUBLIC_KEY", "pk-lf-test"),
        ("LANGFUSE_SECRET_KEY", "sk-lf-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::from_lookup(lookup(&KEYS)).unwrap();

        assert_eq!(config.label, "production");
        assert_eq!(config.hosts, vec![EU_HOST, US_HOST]);
        assert_eq!(config.auth_style, AuthStyle::Basic);
        assert_eq!(config.endpoints, vec!["/api/public/prompts"]);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.preview_len, 300);
        assert!(config.user_agent.starts_with("langfuse-prompt-fetch/"));
    }

    #[test]
    fn test_missing_secret_key_fails_fast() {
        let err = FetcherConfig::from_lookup(lookup(&[("LANGFUSE_PUBLIC_KEY", "pk")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("LANGFUSE_SECRET_KEY"));
    }

    #[test]
    fn test_blank_public_key_counts_as_missing() {
        let err = FetcherConfig::from_lookup(lookup(&[
            ("LANGFUSE_PUBLIC_KEY", "  "),
            ("LANGFUSE_SECRET_KEY", "sk"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LANGFUSE_PUBLIC_KEY"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("LANGFUSE_HOSTS", "https://a.example/, https://b.example"),
            ("LANGFUSE_AUTH_STYLE", "header"),
            ("LANGFUSE_LABEL", "staging"),
            ("LANGFUSE_TIMEOUT_SECS", "10"),
            ("LANGFUSE_PREVIEW_LEN", "50"),
        ]);
        let config = FetcherConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.hosts, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.auth_style, AuthStyle::Header);
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.label, "staging");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.preview_len, 50);
    }

    #[test]
    fn test_base_url_used_when_hosts_unset() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("LANGFUSE_BASE_URL", "https://langfuse.internal"));
        let config = FetcherConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.hosts, vec!["https://langfuse.internal"]);
    }

    #[test]
    fn test_endpoints_get_leading_slash() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("LANGFUSE_ENDPOINTS", "api/public/prompts,/custom"));
        let config = FetcherConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.endpoints, vec!["/api/public/prompts", "/custom"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = || {
            FetcherConfig::builder()
                .public_key("pk")
                .secret_key("sk")
        };

        assert!(base().hosts(vec![]).build().validate().is_err());
        assert!(base()
            .hosts(vec!["ftp://example.com".to_string()])
            .build()
            .validate()
            .is_err());
        assert!(base()
            .hosts(vec!["not a url".to_string()])
            .build()
            .validate()
            .is_err());
        assert!(base().preview_len(0).build().validate().is_err());
        assert!(base()
            .timeout(Duration::from_secs(0))
            .build()
            .validate()
            .is_err());
        assert!(base()
            .timeout(Duration::from_secs(600))
            .build()
            .validate()
            .is_err());
        assert!(base().label("").build().validate().is_err());
        assert!(base().build().validate().is_ok());
    }

    #[test]
    fn test_sub_second_timeout_accepted() {
        let config = FetcherConfig::builder()
            .public_key("pk")
            .secret_key("sk")
            .timeout(Duration::from_millis(250))
            .build();
        assert!(config.validate().is_ok());

        let err = FetcherConfig::builder()
            .public_key("pk")
            .secret_key("sk")
            .timeout(Duration::ZERO)
            .build()
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero and at most 120 seconds"));
    }

    #[test]
    fn test_non_numeric_timeout_is_configuration_error() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("LANGFUSE_TIMEOUT_SECS", "soon"));
        let err = FetcherConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("LANGFUSE_TIMEOUT_SECS"));
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = FetcherConfig::from_lookup(lookup(&KEYS)).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-lf-test"));
        assert!(debug.contains("REDACTED"));
    }
}
