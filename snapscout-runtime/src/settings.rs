use snapscout_core::config::{API_URL_ENV, ClientConfig, DEFAULT_API_BASE_URL};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid backend URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub client: ClientConfig,
}

impl Settings {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(API_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self::with_api_url(&raw)
    }

    pub fn with_api_url(raw: &str) -> Result<Self, SettingsError> {
        let api_base_url = validate_base_url(raw)?;
        Ok(Self {
            client: ClientConfig { api_base_url },
        })
    }
}

/// Accepts absolute http(s) URLs; returns the value without a trailing slash.
pub fn validate_base_url(raw: &str) -> Result<String, SettingsError> {
    let raw = raw.trim();
    let invalid = |reason: String| SettingsError::InvalidUrl {
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other:?}"))),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".into()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
