//! Client configuration
//!
//! A [`ClientConfig`] describes one control plane endpoint: where it lives,
//! how to authenticate, how to talk HTTP to it, how to page through
//! listings and where the pagination fields sit in its replies. It loads
//! from YAML or JSON.

use crate::auth::AuthConfig;
use crate::decode::PageLayout;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{ListOptions, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the basic auth password
pub const PASSWORD_ENV: &str = "STORAGELIST_PASSWORD";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the control plane API
    pub endpoint: String,

    /// Storage virtual machine to scope calls to
    #[serde(default)]
    pub vserver: Option<String>,

    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Listing settings
    #[serde(default)]
    pub listing: ListingSettings,

    /// Reply layout
    #[serde(default)]
    pub layout: PageLayout,
}

impl ClientConfig {
    /// Create a config for an endpoint with defaults everywhere else
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            vserver: None,
            auth: AuthConfig::None,
            http: HttpSettings::default(),
            listing: ListingSettings::default(),
            layout: PageLayout::default(),
        }
    }

    /// Load a config file; `.json` files are read as JSON, anything else as
    /// YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let mut config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON config
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            self.set_password(password);
        }
    }

    /// Replace the basic auth password, if basic auth is configured
    pub fn set_password(&mut self, new_password: String) {
        if let AuthConfig::Basic { password, .. } = &mut self.auth {
            *password = new_password;
        }
    }

    /// Check the config for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        let url = url::Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if matches!(&self.vserver, Some(v) if v.trim().is_empty()) {
            return Err(Error::invalid_value("vserver", "must not be empty"));
        }

        if self.listing.page_size == 0 {
            return Err(Error::invalid_value("listing.page_size", "must be positive"));
        }
        if self.listing.max_pages == Some(0) {
            return Err(Error::invalid_value("listing.max_pages", "must be positive"));
        }
        if self.listing.timeout_secs == Some(0) {
            return Err(Error::invalid_value("listing.timeout_secs", "must be positive"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }

        Ok(())
    }

    /// HTTP client settings for this endpoint
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.endpoint)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            )
            .accept_invalid_certs(self.http.accept_invalid_certs);

        builder = match self.http.rate_limit {
            Some(rate_limit) => builder.rate_limit(rate_limit),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }

    /// Listing options for this endpoint
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            page_size: self.listing.page_size,
            max_pages: self.listing.max_pages,
            timeout: self.listing.timeout_secs.map(Duration::from_secs),
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries per round-trip
    pub max_retries: u32,
    /// Backoff strategy
    pub backoff: BackoffType,
    /// First backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Backoff ceiling in milliseconds
    pub max_backoff_ms: u64,
    /// Rate limit, `null` to disable
    pub rate_limit: Option<RateLimiterConfig>,
    /// Accept self-signed cluster certificates
    pub accept_invalid_certs: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 30_000,
            rate_limit: Some(RateLimiterConfig::default()),
            accept_invalid_certs: false,
        }
    }
}

// ============================================================================
// Listing Settings
// ============================================================================

/// Listing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    /// Records requested per round-trip
    pub page_size: u32,
    /// Round-trip bound, `null` for unbounded
    pub max_pages: Option<usize>,
    /// Deadline for a whole listing in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const YAML: &str = r"
endpoint: https://cluster1.example.com/api
vserver: openstack
auth:
  type: basic
  username: admin
  password: netapp123
http:
  timeout_secs: 30
  max_retries: 1
  backoff: linear
  rate_limit: null
listing:
  page_size: 100
  max_pages: 500
  timeout_secs: 120
layout:
  items_path: records
";

    #[test]
    fn test_parse_yaml() {
        let config = ClientConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.endpoint, "https://cluster1.example.com/api");
        assert_eq!(config.vserver.as_deref(), Some("openstack"));
        assert_eq!(config.auth, AuthConfig::basic("admin", "netapp123"));
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert!(config.http.rate_limit.is_none());
        assert_eq!(config.http.initial_backoff_ms, 100);
        assert_eq!(config.listing.page_size, 100);
        assert_eq!(config.layout.items_path, "records");
        assert_eq!(config.layout.next_tag_path, "next-tag");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_json_str(r#"{"endpoint": "http://localhost:8080"}"#)
            .unwrap();

        assert_eq!(config, ClientConfig::new("http://localhost:8080"));
        assert_eq!(config.list_options(), ListOptions::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_list_options() {
        let options = ClientConfig::from_yaml_str(YAML).unwrap().list_options();
        assert_eq!(options.page_size, 100);
        assert_eq!(options.max_pages, Some(500));
        assert_eq!(options.timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_http_client_config() {
        let http = ClientConfig::from_yaml_str(YAML).unwrap().http_client_config();
        assert_eq!(
            http.base_url.as_deref(),
            Some("https://cluster1.example.com/api")
        );
        assert_eq!(http.timeout, Duration::from_secs(30));
        assert_eq!(http.max_retries, 1);
        assert_eq!(http.backoff_type, BackoffType::Linear);
        assert!(http.rate_limit.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));

        config.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        config.endpoint = "ftp://cluster1".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { .. })
        ));

        let mut config = ClientConfig::new("https://cluster1");
        config.listing.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new("https://cluster1");
        config.listing.max_pages = Some(0);
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new("https://cluster1");
        config.vserver = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_password() {
        let mut config = ClientConfig::from_yaml_str(YAML).unwrap();
        config.set_password("rotated".to_string());
        assert_eq!(config.auth, AuthConfig::basic("admin", "rotated"));

        let mut config = ClientConfig::new("https://cluster1");
        config.set_password("ignored".to_string());
        assert_eq!(config.auth, AuthConfig::None);
    }

    #[test]
    fn test_from_file_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("cluster.yaml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(b"endpoint: https://cluster1/api\n")
            .unwrap();
        let config = ClientConfig::from_file(&yaml_path).unwrap();
        assert_eq!(config.endpoint, "https://cluster1/api");

        let json_path = dir.path().join("cluster.json");
        std::fs::write(&json_path, r#"{"endpoint": "https://cluster2/api"}"#).unwrap();
        let config = ClientConfig::from_file(&json_path).unwrap();
        assert_eq!(config.endpoint, "https://cluster2/api");
    }

    #[test]
    fn test_from_file_missing() {
        let err = ClientConfig::from_file("/nonexistent/cluster.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "endpoint: https://cluster1\nlisting:\n  page_size: 0\n").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }
}
