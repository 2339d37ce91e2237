//! Error types for staging refresh orchestrations

use restage_models::InstanceStatus;
use thiserror::Error;

use crate::orchestrations::swap_identities::SwapStep;

/// Result type alias using the crate's error type
pub type Result<T> = std::result::Result<T, RefreshError>;

/// Failures reported by a control plane implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneError {
    /// The identifier does not currently resolve to an instance
    #[error("instance `{identifier}` not found")]
    NotFound { identifier: String },

    /// The identifier is already taken by another instance
    #[error("instance `{identifier}` already exists")]
    AlreadyExists { identifier: String },

    /// Any other rejected or failed request
    #[error("{operation} failed: {message}")]
    Request { operation: String, message: String },
}

impl ControlPlaneError {
    pub fn request(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Errors that terminate a refresh run
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("no automated snapshots found for `{source_instance}`")]
    SnapshotNotFound { source_instance: String },

    #[error("instance `{identifier}` not available after {attempts} attempt(s) ({polls} status checks)")]
    AvailabilityTimeout {
        identifier: String,
        attempts: u32,
        polls: u32,
    },

    #[error("instance `{identifier}` entered status `{status}` and will not become available")]
    UnexpectedStatus {
        identifier: String,
        status: InstanceStatus,
    },

    #[error("instance identifier `{identifier}` is already in use")]
    AlreadyExists { identifier: String },

    #[error("data mangling failed for `{identifier}`: {message}")]
    Mangling { identifier: String, message: String },

    #[error("swap interrupted at step '{step}': {source}")]
    SwapInterrupted {
        step: SwapStep,
        #[source]
        source: Box<RefreshError>,
    },

    #[error("control plane error: {0}")]
    ControlPlane(#[from] ControlPlaneError),
}

impl RefreshError {
    /// True when the error only means the instance is momentarily unresolvable
    pub fn is_transient_absence(&self) -> bool {
        matches!(self, Self::ControlPlane(ControlPlaneError::NotFound { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_transient() {
        let err = RefreshError::from(ControlPlaneError::NotFound {
            identifier: "restore-1".to_string(),
        });
        assert!(err.is_transient_absence());

        let err = RefreshError::from(ControlPlaneError::request("DescribeDBInstances", "denied"));
        assert!(!err.is_transient_absence());
    }

    #[test]
    fn test_error_messages_name_the_instance() {
        let err = RefreshError::AvailabilityTimeout {
            identifier: "terminate-1".to_string(),
            attempts: 10,
            polls: 600,
        };
        assert_eq!(
            err.to_string(),
            "instance `terminate-1` not available after 10 attempt(s) (600 status checks)"
        );
    }
}
