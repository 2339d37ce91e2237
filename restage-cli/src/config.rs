use restage_orchestrations::{RefreshSettings, WaitPolicy};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DB_IDENTIFIER_LIVE: &str = "DB_IDENTIFIER_LIVE";
pub const DB_IDENTIFIER_STAGING: &str = "DB_IDENTIFIER_STAGING";
pub const DB_INSTANCE_CLASS: &str = "DB_INSTANCE_CLASS";
pub const DB_SUBNET_GROUP_NAME: &str = "DB_SUBNET_GROUP_NAME";

pub const POLL_INTERVAL_SECS: &str = "RESTAGE_POLL_INTERVAL_SECS";
pub const MAX_POLLS: &str = "RESTAGE_MAX_POLLS";
pub const ABSENCE_BACKOFF_SECS: &str = "RESTAGE_ABSENCE_BACKOFF_SECS";
pub const MAX_ATTEMPTS: &str = "RESTAGE_MAX_ATTEMPTS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable `{key}` is not set")]
    Missing { key: &'static str },

    #[error("Environment variable `{key}` is invalid: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub live_identifier: String,
    pub staging_identifier: String,
    pub instance_class: String,
    pub subnet_group: String,
    pub wait_policy: WaitPolicy,
}

impl Config {
    /// Read from the process environment; `.env` is loaded by `main` first
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let live_identifier = required(DB_IDENTIFIER_LIVE)?;
        let staging_identifier = required(DB_IDENTIFIER_STAGING)?;
        let instance_class = required(DB_INSTANCE_CLASS)?;
        let subnet_group = required(DB_SUBNET_GROUP_NAME)?;

        if live_identifier.eq_ignore_ascii_case(&staging_identifier) {
            return Err(ConfigError::Invalid {
                key: DB_IDENTIFIER_STAGING,
                message: format!("must differ from {} ({})", DB_IDENTIFIER_LIVE, live_identifier),
            });
        }

        let defaults = WaitPolicy::default();
        let wait_policy = WaitPolicy {
            poll_interval: optional(&lookup, POLL_INTERVAL_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            max_polls: optional(&lookup, MAX_POLLS)?.unwrap_or(defaults.max_polls),
            absence_backoff: optional(&lookup, ABSENCE_BACKOFF_SECS)?
                .map(Duration::from_secs)
                .unwrap_or(defaults.absence_backoff),
            max_attempts: optional(&lookup, MAX_ATTEMPTS)?.unwrap_or(defaults.max_attempts),
        };
        if wait_policy.max_polls == 0 || wait_policy.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: if wait_policy.max_polls == 0 { MAX_POLLS } else { MAX_ATTEMPTS },
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            live_identifier,
            staging_identifier,
            instance_class,
            subnet_group,
            wait_policy,
        })
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            live_identifier: self.live_identifier.clone(),
            staging_identifier: self.staging_identifier.clone(),
            instance_class: self.instance_class.clone(),
            subnet_group: self.subnet_group.clone(),
            wait_policy: self.wait_policy,
        }
    }
}

fn optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        (DB_IDENTIFIER_LIVE, "db-live"),
        (DB_IDENTIFIER_STAGING, "db-staging"),
        (DB_INSTANCE_CLASS, "db.t3.micro"),
        (DB_SUBNET_GROUP_NAME, "staging-private"),
    ];

    #[test]
    fn test_loads_required_values_with_default_policy() {
        let config = Config::from_lookup(env(REQUIRED)).unwrap();

        assert_eq!(config.live_identifier, "db-live");
        assert_eq!(config.staging_identifier, "db-staging");
        assert_eq!(config.wait_policy, WaitPolicy::default());
    }

    #[test]
    fn test_each_missing_key_is_named() {
        for (missing, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| k != missing).collect();
            let err = Config::from_lookup(env(&pairs)).unwrap_err();

            assert_eq!(err, ConfigError::Missing { key: *missing });
            assert_eq!(err.to_string(), format!("Environment variable `{}` is not set", missing));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[2] = (DB_INSTANCE_CLASS, "  ");

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing { key: DB_INSTANCE_CLASS });
    }

    #[test]
    fn test_live_and_staging_must_differ() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = (DB_IDENTIFIER_STAGING, "DB-LIVE");

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: DB_IDENTIFIER_STAGING, .. }));
    }

    #[test]
    fn test_policy_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((POLL_INTERVAL_SECS, "5"));
        pairs.push((MAX_ATTEMPTS, "3"));

        let config = Config::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.wait_policy.poll_interval, Duration::from_secs(5));
        assert_eq!(config.wait_policy.max_attempts, 3);
        assert_eq!(config.wait_policy.max_polls, 60);
    }

    #[test]
    fn test_unparsable_policy_value_is_invalid() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((MAX_POLLS, "many"));

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: MAX_POLLS, .. }));
    }
}
