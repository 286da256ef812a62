//! Configuration module for the Adopt-an-Area client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::errors::AppError;
use crate::models::LatLng;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API (always ends with `/`)
    pub api_base_url: Url,
    /// Reverse geocoding endpoint
    pub geocode_url: Url,
    /// Upper bound for every outgoing request
    pub http_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Session credential used by the binary
    pub session_token: Option<String>,
    /// Identity email used by the binary
    pub user_email: Option<String>,
    /// Home position of the map
    pub default_center: LatLng,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("ADOPTMAP_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api/".to_string());
        let api_base_url = parse_base_url(&api_base_url)?;

        let geocode_url = env::var("ADOPTMAP_GEOCODE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/reverse".to_string());
        let geocode_url = Url::parse(&geocode_url)
            .map_err(|e| AppError::Config(format!("Invalid ADOPTMAP_GEOCODE_URL: {}", e)))?;

        let http_timeout = match env::var("ADOPTMAP_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|_| {
                AppError::Config(format!("Invalid ADOPTMAP_HTTP_TIMEOUT_SECS: {:?}", raw))
            })?,
            Err(_) => Duration::from_secs(10),
        };

        let user_agent = env::var("ADOPTMAP_USER_AGENT")
            .unwrap_or_else(|_| format!("adoptmap/{}", env!("CARGO_PKG_VERSION")));

        let session_token = env::var("ADOPTMAP_SESSION_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let user_email = env::var("ADOPTMAP_USER_EMAIL")
            .ok()
            .filter(|e| !e.trim().is_empty());

        let default_center = match env::var("ADOPTMAP_DEFAULT_CENTER") {
            Ok(raw) => parse_center(&raw)?,
            Err(_) => LatLng::new(38.64, -90.3),
        };

        let log_level = env::var("ADOPTMAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url,
            geocode_url,
            http_timeout,
            user_agent,
            session_token,
            user_email,
            default_center,
            log_level,
        })
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path.
pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid ADOPTMAP_API_BASE_URL: {}", e)))
}

/// Parse a `lat,lng` pair.
fn parse_center(raw: &str) -> Result<LatLng, AppError> {
    let invalid = || AppError::Config(format!("Invalid ADOPTMAP_DEFAULT_CENTER: {:?}", raw));

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(invalid());
    }

    Ok(LatLng::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("ADOPTMAP_API_BASE_URL");
        env::remove_var("ADOPTMAP_GEOCODE_URL");
        env::remove_var("ADOPTMAP_HTTP_TIMEOUT_SECS");
        env::remove_var("ADOPTMAP_SESSION_TOKEN");
        env::remove_var("ADOPTMAP_DEFAULT_CENTER");
        env::remove_var("ADOPTMAP_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            config.geocode_url.as_str(),
            "https://nominatim.openstreetmap.org/reverse"
        );
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.session_token.is_none());
        assert_eq!(config.default_center, LatLng::new(38.64, -90.3));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://example.test/api").unwrap();
        assert_eq!(url.as_str(), "http://example.test/api/");
        assert_eq!(
            url.join("adopt-area/").unwrap().as_str(),
            "http://example.test/api/adopt-area/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_parse_center() {
        assert_eq!(
            parse_center(" 42.3601 , -71.0589 ").unwrap(),
            LatLng::new(42.3601, -71.0589)
        );
        assert!(parse_center("42.3601").is_err());
        assert!(parse_center("north,west").is_err());
        assert!(parse_center("NaN,1").is_err());
    }
}
