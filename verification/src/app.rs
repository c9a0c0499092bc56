//! Application identifiers issued by the identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const APP_ID_PREFIX: &str = "app_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppIdError {
    #[error("app id is empty")]
    Empty,

    #[error("app id '{0}' must start with \"app_\"")]
    MissingPrefix(String),
}

/// An `app_…` identifier registered with the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Result<Self, AppIdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AppIdError::Empty);
        }
        if !id.starts_with(APP_ID_PREFIX) || id.len() == APP_ID_PREFIX.len() {
            return Err(AppIdError::MissingPrefix(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppId {
    type Error = AppIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(id: AppId) -> Self {
        id.0
    }
}

impl FromStr for AppId {
    type Err = AppIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefixed_ids() {
        let id: AppId = "app_staging_123".parse().unwrap();
        assert_eq!(id.as_str(), "app_staging_123");
    }

    #[test]
    fn rejects_empty_and_unprefixed() {
        assert_eq!(AppId::new(""), Err(AppIdError::Empty));
        assert!(matches!(AppId::new("staging_123"), Err(AppIdError::MissingPrefix(_))));
        assert!(matches!(AppId::new("app_"), Err(AppIdError::MissingPrefix(_))));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<AppId>(r#""app_x""#).is_ok());
        assert!(serde_json::from_str::<AppId>(r#""x""#).is_err());
    }
}
