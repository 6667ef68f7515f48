use std::time::Duration;

use url::Url;
use visplain_core::BackendOrigin;

pub const UPLOAD_PATH: &str = "/upload";
pub const SUMMARY_PATH: &str = "/generate_repo_summary";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backend origin {origin:?}: {message}")]
    InvalidOrigin { origin: String, message: String },
}

/// Immutable settings handed to the backend client at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    origin: BackendOrigin,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` leaves slow analyses to finish on their own.
    pub request_timeout: Option<Duration>,
    pub max_image_bytes: u64,
}

impl ClientConfig {
    pub fn new(backend_origin: &str) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidOrigin {
            origin: backend_origin.to_string(),
            message: message.to_string(),
        };
        let parsed = Url::parse(backend_origin.trim()).map_err(|err| invalid(&err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }

        Ok(Self {
            origin: BackendOrigin::new(backend_origin),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_image_bytes: 20 * 1024 * 1024,
        })
    }

    pub fn origin(&self) -> &BackendOrigin {
        &self.origin
    }

    pub fn endpoint(&self, path: &str) -> String {
        self.origin.resolve(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, ConfigError, UPLOAD_PATH};

    #[test]
    fn endpoint_joins_origin_and_path() {
        let config = ClientConfig::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(config.origin().as_str(), "http://127.0.0.1:5000");
        assert_eq!(config.endpoint(UPLOAD_PATH), "http://127.0.0.1:5000/upload");
    }

    #[test]
    fn rejects_non_http_origins() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidOrigin { .. })
        ));
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("http://example.com/?x=1").is_err());
    }
}
