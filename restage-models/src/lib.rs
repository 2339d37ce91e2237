use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a database instance as reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceStatus {
    Creating,
    Available,
    Renaming,
    Rebooting,
    Modifying,
    BackingUp,
    Deleting,
    Failed,
    IncompatibleRestore,
    IncompatibleParameters,
    IncompatibleNetwork,
    /// Any status string this crate does not model explicitly
    Other(String),
}

impl InstanceStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "renaming" => Self::Renaming,
            "rebooting" => Self::Rebooting,
            "modifying" => Self::Modifying,
            "backing-up" => Self::BackingUp,
            "deleting" => Self::Deleting,
            "failed" => Self::Failed,
            "incompatible-restore" => Self::IncompatibleRestore,
            "incompatible-parameters" => Self::IncompatibleParameters,
            "incompatible-network" => Self::IncompatibleNetwork,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Renaming => "renaming",
            Self::Rebooting => "rebooting",
            Self::Modifying => "modifying",
            Self::BackingUp => "backing-up",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
            Self::IncompatibleRestore => "incompatible-restore",
            Self::IncompatibleParameters => "incompatible-parameters",
            Self::IncompatibleNetwork => "incompatible-network",
            Self::Other(other) => other,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Statuses from which an instance never becomes available on its own
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            Self::Deleting
                | Self::Failed
                | Self::IncompatibleRestore
                | Self::IncompatibleParameters
                | Self::IncompatibleNetwork
        )
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InstanceStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<InstanceStatus> for String {
    fn from(value: InstanceStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A database instance as observed through the control plane
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseInstance {
    /// Current identifier (unique within the account/region at any instant)
    pub identifier: String,
    /// Stable id of the underlying resource, unchanged by renames
    pub resource_id: Option<String>,
    pub status: InstanceStatus,
    /// Snapshot the instance was restored from, when known
    pub restored_from: Option<String>,
}

/// An automated snapshot of a source instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub identifier: String,
    pub source_instance: String,
    pub created_at: DateTime<Utc>,
}

const RESTORE_PREFIX: &str = "restore";
const TERMINATE_PREFIX: &str = "terminate";

/// Per-run random value used to derive the temporary instance identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunToken(String);

impl RunToken {
    /// Generate a fresh 8-hex-character token
    pub fn generate() -> Self {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(8);
        Self(token)
    }

    /// Generate a token whose derived identifiers collide with none of `reserved`
    pub fn generate_avoiding(reserved: &[&str]) -> Self {
        loop {
            let token = Self::generate();
            let collides = reserved.iter().any(|name| {
                *name == token.restore_identifier() || *name == token.terminate_identifier()
            });
            if !collides {
                return token;
            }
        }
    }

    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the instance restored from the live snapshot
    pub fn restore_identifier(&self) -> String {
        format!("{}-{}", RESTORE_PREFIX, self.0)
    }

    /// Identifier the previous staging instance is renamed to before deletion
    pub fn terminate_identifier(&self) -> String {
        format!("{}-{}", TERMINATE_PREFIX, self.0)
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_and_unknown() {
        assert_eq!(InstanceStatus::parse("available"), InstanceStatus::Available);
        assert_eq!(InstanceStatus::parse("backing-up"), InstanceStatus::BackingUp);
        assert_eq!(
            InstanceStatus::parse("storage-optimization"),
            InstanceStatus::Other("storage-optimization".to_string())
        );
        assert_eq!(InstanceStatus::parse("storage-optimization").as_str(), "storage-optimization");
    }

    #[test]
    fn test_terminal_failure_statuses() {
        assert!(InstanceStatus::Failed.is_terminal_failure());
        assert!(InstanceStatus::IncompatibleRestore.is_terminal_failure());
        assert!(!InstanceStatus::Renaming.is_terminal_failure());
        assert!(!InstanceStatus::Creating.is_terminal_failure());
    }

    #[test]
    fn test_instance_status_serializes_as_plain_string() {
        let instance = DatabaseInstance {
            identifier: "db-staging".to_string(),
            resource_id: Some("db-ABC".to_string()),
            status: InstanceStatus::Renaming,
            restored_from: None,
        };

        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["status"], "renaming");

        let parsed: DatabaseInstance = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, instance);
    }

    #[test]
    fn test_run_token_identifiers() {
        let token = RunToken::from_string("0a1b2c3d");
        assert_eq!(token.restore_identifier(), "restore-0a1b2c3d");
        assert_eq!(token.terminate_identifier(), "terminate-0a1b2c3d");
    }

    #[test]
    fn test_generated_tokens_are_hex_and_distinct() {
        let first = RunToken::generate();
        let second = RunToken::generate();

        assert_eq!(first.as_str().len(), 8);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
        assert_ne!(first.restore_identifier(), first.terminate_identifier());
    }

    #[test]
    fn test_generate_avoiding_skips_reserved_names() {
        let token = RunToken::generate_avoiding(&["db-live", "db-staging"]);
        assert_ne!(token.restore_identifier(), "db-live");
        assert_ne!(token.terminate_identifier(), "db-staging");
    }
}
