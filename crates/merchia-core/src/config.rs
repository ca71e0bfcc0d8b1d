//! Application configuration loaded from the environment.

use anyhow::Result;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::models::SiteId;

/// Which store backend the application talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory backend for tests and local development.
    #[default]
    Memory,
    /// Storefront management REST API.
    Rest,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Rest => write!(f, "rest"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StoreBackend::Memory),
            "rest" => Ok(StoreBackend::Rest),
            _ => Err(anyhow::anyhow!("Invalid store backend: {}", s)),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    /// Storefront site remote calls are scoped to.
    pub site_id: i64,
    pub store_backend: StoreBackend,
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    /// Per-phase upload timeout in seconds. Unset means wait indefinitely.
    pub upload_phase_timeout_secs: Option<u64>,
    /// Whether EXIF location data is stripped from uploaded images.
    pub strip_location: bool,
}

impl AppConfig {
    /// Loads configuration from environment variables, falling back to
    /// development defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        const DEFAULT_ENVIRONMENT: &str = "development";
        const DEFAULT_SITE_ID: i64 = 1;
        const DEFAULT_STRIP_LOCATION: bool = true;

        let environment =
            env::var("MERCHIA_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        let site_id = env::var("MERCHIA_SITE_ID")
            .unwrap_or_else(|_| DEFAULT_SITE_ID.to_string())
            .parse()
            .unwrap_or(DEFAULT_SITE_ID);

        let store_backend = env::var("MERCHIA_STORE_BACKEND")
            .unwrap_or_else(|_| StoreBackend::Memory.to_string())
            .parse()
            .unwrap_or(StoreBackend::Memory);

        let api_base_url = env::var("MERCHIA_API_BASE_URL").ok();
        let api_token = env::var("MERCHIA_API_TOKEN").ok();

        let upload_phase_timeout_secs = env::var("MERCHIA_UPLOAD_PHASE_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok());

        let strip_location = env::var("MERCHIA_STRIP_LOCATION")
            .unwrap_or_else(|_| DEFAULT_STRIP_LOCATION.to_string())
            .parse()
            .unwrap_or(DEFAULT_STRIP_LOCATION);

        AppConfig {
            environment,
            site_id,
            store_backend,
            api_base_url,
            api_token,
            upload_phase_timeout_secs,
            strip_location,
        }
    }

    /// Validates settings that cannot be defaulted away.
    pub fn validate(&self) -> Result<()> {
        if self.site_id <= 0 {
            return Err(anyhow::anyhow!("MERCHIA_SITE_ID must be positive"));
        }

        if self.store_backend == StoreBackend::Rest {
            let base_url = self.api_base_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("MERCHIA_API_BASE_URL is required for the rest store backend")
            })?;
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "MERCHIA_API_BASE_URL must start with http:// or https://"
                ));
            }
            if self
                .api_token
                .as_deref()
                .map(str::is_empty)
                .unwrap_or(true)
            {
                return Err(anyhow::anyhow!(
                    "MERCHIA_API_TOKEN is required for the rest store backend"
                ));
            }
        }

        if self.upload_phase_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!(
                "MERCHIA_UPLOAD_PHASE_TIMEOUT_SECS must be positive when set"
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn site(&self) -> SiteId {
        SiteId(self.site_id)
    }

    pub fn upload_phase_timeout(&self) -> Option<Duration> {
        self.upload_phase_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            environment: "development".to_string(),
            site_id: 1,
            store_backend: StoreBackend::Memory,
            api_base_url: None,
            api_token: None,
            upload_phase_timeout_secs: None,
            strip_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rest_backend_requires_base_url_and_token() {
        let mut config = AppConfig {
            store_backend: StoreBackend::Rest,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        config.api_base_url = Some("https://api.example.com".to_string());
        assert!(config.validate().is_err());

        config.api_token = Some("token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_base_url_must_be_http() {
        let config = AppConfig {
            store_backend: StoreBackend::Rest,
            api_base_url: Some("ftp://api.example.com".to_string()),
            api_token: Some("token".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = AppConfig {
            upload_phase_timeout_secs: Some(0),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_converts_to_duration() {
        let mut config = AppConfig::default();
        assert_eq!(config.upload_phase_timeout(), None);

        config.upload_phase_timeout_secs = Some(30);
        assert_eq!(config.upload_phase_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_store_backend_parses() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("rest".parse::<StoreBackend>().unwrap(), StoreBackend::Rest);
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_negative_site_id_is_rejected() {
        let config = AppConfig {
            site_id: -3,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
