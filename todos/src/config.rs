//! Configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TODOS_API_URL` | `https://mate.academy/students-api` |
//! | `TODOS_OWNER_ID` | required, non-zero |
//! | `TODOS_NOTIFICATION_TIMEOUT_MS` | `3000` |
//!
//! Log filtering is read separately from `RUST_LOG`.

use crate::error::ConfigError;
use crate::notification::DEFAULT_NOTIFICATION_TIMEOUT;
use crate::types::OwnerId;
use std::env;
use std::time::Duration;

/// Default API root
pub const DEFAULT_API_URL: &str = "https://mate.academy/students-api";

const API_URL: &str = "TODOS_API_URL";
const OWNER_ID: &str = "TODOS_OWNER_ID";
const NOTIFICATION_TIMEOUT_MS: &str = "TODOS_NOTIFICATION_TIMEOUT_MS";

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoConfig {
    /// Root URL of the todo API
    pub api_url: String,
    /// Owner whose todos are synchronized
    pub owner_id: OwnerId,
    /// How long error notifications stay visible
    pub notification_timeout: Duration,
}

impl TodoConfig {
    /// Configuration for `owner_id` with every other setting at its default
    #[must_use]
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner_id,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `TODOS_OWNER_ID` is missing, zero or not a
    /// number, or if the notification timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`TodoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let owner_id = lookup(OWNER_ID).ok_or(ConfigError::Missing(OWNER_ID))?;
        let owner_id = owner_id
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid {
                name: OWNER_ID,
                reason: e.to_string(),
            })?;
        if owner_id == 0 {
            return Err(ConfigError::Invalid {
                name: OWNER_ID,
                reason: "must not be zero".to_string(),
            });
        }

        let notification_timeout = match lookup(NOTIFICATION_TIMEOUT_MS) {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(
                |e: std::num::ParseIntError| ConfigError::Invalid {
                    name: NOTIFICATION_TIMEOUT_MS,
                    reason: e.to_string(),
                },
            )?),
            None => DEFAULT_NOTIFICATION_TIMEOUT,
        };

        let api_url = lookup(API_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_url,
            owner_id: OwnerId::new(owner_id),
            notification_timeout,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests can unwrap
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<TodoConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TodoConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_owner_is_set() {
        let config = load(&[("TODOS_OWNER_ID", "12")]).unwrap();

        assert_eq!(config, TodoConfig::new(OwnerId::new(12)));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.notification_timeout, Duration::from_millis(3000));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("TODOS_OWNER_ID", "5"),
            ("TODOS_API_URL", "http://localhost:8080"),
            ("TODOS_NOTIFICATION_TIMEOUT_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.notification_timeout, Duration::from_millis(250));
    }

    #[test]
    fn owner_is_required() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("TODOS_OWNER_ID")));
    }

    #[test]
    fn zero_or_garbage_owner_is_rejected() {
        assert!(matches!(
            load(&[("TODOS_OWNER_ID", "0")]),
            Err(ConfigError::Invalid { name: "TODOS_OWNER_ID", .. })
        ));
        assert!(matches!(
            load(&[("TODOS_OWNER_ID", "abc")]),
            Err(ConfigError::Invalid { name: "TODOS_OWNER_ID", .. })
        ));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(matches!(
            load(&[("TODOS_OWNER_ID", "1"), ("TODOS_NOTIFICATION_TIMEOUT_MS", "soon")]),
            Err(ConfigError::Invalid { name: "TODOS_NOTIFICATION_TIMEOUT_MS", .. })
        ));
    }
}
