//! Control plane abstraction over the managed database service

use async_trait::async_trait;
use restage_models::{DatabaseInstance, Snapshot};
use serde::{Deserialize, Serialize};

use crate::error::ControlPlaneError;

pub mod memory;
pub mod rds;

pub use memory::{ControlPlaneCall, FailurePoint, Lookup, MemoryControlPlane};
pub use rds::RdsControlPlane;

/// Parameters for restoring a snapshot into a new instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestoreRequest {
    pub snapshot_identifier: String,
    pub instance_identifier: String,
    pub instance_class: String,
    pub subnet_group: String,
    /// Whether to provision a standby in a second availability zone
    pub multi_az: bool,
}

/// Operations consumed from the managed database control plane
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// List automated snapshots of a source instance, in listing order
    async fn list_automated_snapshots(
        &self,
        source_instance: &str,
    ) -> Result<Vec<Snapshot>, ControlPlaneError>;

    /// Look up an instance; `NotFound` when the identifier does not resolve
    async fn describe_instance(&self, identifier: &str)
        -> Result<DatabaseInstance, ControlPlaneError>;

    /// Request a restore; returns as soon as the request is accepted
    async fn restore_from_snapshot(
        &self,
        request: &RestoreRequest,
    ) -> Result<DatabaseInstance, ControlPlaneError>;

    /// Rename an instance, applied immediately
    async fn rename_instance(&self, identifier: &str, new_identifier: &str)
        -> Result<(), ControlPlaneError>;

    /// Delete an instance
    async fn delete_instance(
        &self,
        identifier: &str,
        skip_final_snapshot: bool,
    ) -> Result<(), ControlPlaneError>;
}
