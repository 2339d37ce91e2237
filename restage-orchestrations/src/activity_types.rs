//! Input and output types for restage activities

use restage_models::{DatabaseInstance, InstanceStatus, Snapshot};
use serde::{Deserialize, Serialize};

use crate::poll::WaitState;

// ============================================================================
// Find Latest Snapshot Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindLatestSnapshotInput {
    /// Instance whose automated snapshots are searched
    pub source_instance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FindLatestSnapshotOutput {
    /// Newest snapshot by creation time
    pub snapshot: Snapshot,
    /// Number of automated snapshots considered
    pub candidates: usize,
}

// ============================================================================
// Restore From Snapshot Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreFromSnapshotInput {
    pub snapshot_identifier: String,
    /// Run-scoped identifier for the new instance
    pub instance_identifier: String,
    pub instance_class: String,
    pub subnet_group: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestoreFromSnapshotOutput {
    /// Instance as reported when the restore was accepted
    pub instance: DatabaseInstance,
}

// ============================================================================
// Wait For Available Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitForAvailableInput {
    pub instance_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitForAvailableOutput {
    pub instance_identifier: String,
    /// Terminal state: `available` or `timed-out`
    pub state: WaitState,
    pub attempts: u32,
    pub polls: u32,
    /// Last status observed, if the instance ever resolved
    pub last_status: Option<InstanceStatus>,
    pub elapsed_seconds: u64,
}

impl WaitForAvailableOutput {
    pub fn is_available(&self) -> bool {
        self.state == WaitState::Available
    }
}

// ============================================================================
// Mangle Data Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangleDataInput {
    pub instance_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MangleDataOutput {
    /// Name of the mangler that ran
    pub mangler: String,
    pub elapsed_seconds: u64,
}

// ============================================================================
// Rename Instance Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameInstanceInput {
    pub instance_identifier: String,
    pub new_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenameInstanceOutput {
    pub previous_identifier: String,
    pub instance_identifier: String,
}

// ============================================================================
// Delete Instance Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteInstanceInput {
    pub instance_identifier: String,
    pub skip_final_snapshot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteInstanceOutput {
    pub instance_identifier: String,
    pub deleted: bool,
}
