//! Client configuration.

use std::time::Duration;

use petition_verification::AppId;

use crate::ConfigError;

/// Default upper bound on the whole verification step: widget plus backend
/// check.
pub const DEFAULT_VERIFICATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the petitions API, without a trailing slash.
    pub server_url: String,
    pub app_id: AppId,
    pub action: String,
    pub verification_timeout: Duration,
}

impl ClientConfig {
    /// Both identity provider settings are required; a client without them
    /// cannot gate petition creation and must not start.
    pub fn new(
        server_url: &str,
        app_id: Option<&str>,
        action: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let app_id = match app_id {
            Some(id) if !id.is_empty() => AppId::new(id)?,
            _ => return Err(ConfigError::MissingAppId),
        };
        let action = match action {
            Some(action) if !action.is_empty() => action.to_string(),
            _ => return Err(ConfigError::MissingAction),
        };
        let url = reqwest::Url::parse(server_url)
            .map_err(|_| ConfigError::InvalidServerUrl(server_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServerUrl(server_url.to_string()));
        }

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            app_id,
            action,
            verification_timeout: DEFAULT_VERIFICATION_TIMEOUT,
        })
    }

    pub fn with_verification_timeout(mut self, timeout: Duration) -> Self {
        self.verification_timeout = timeout;
        self
    }
}
