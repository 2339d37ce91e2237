//! Input and output types for restage orchestrations

use serde::{Deserialize, Serialize};

// ============================================================================
// Swap Identities Orchestration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapIdentitiesInput {
    /// Freshly restored instance to promote
    pub restore_identifier: String,
    /// Identity to take over
    pub staging_identifier: String,
    /// Name the current staging instance is parked under before deletion
    pub terminate_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapIdentitiesOutput {
    /// Staging identity, now held by the restored instance
    pub staging_identifier: String,
    /// Identifier of the retired staging instance, deletion requested
    pub retired_identifier: String,
    /// Time taken for the whole swap (seconds)
    pub swap_time_seconds: u64,
}

// ============================================================================
// Refresh Staging Orchestration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshStagingOutput {
    /// Run token the temporary identifiers were derived from
    pub run_token: String,
    pub live_identifier: String,
    /// Snapshot the new staging instance was restored from
    pub snapshot_identifier: String,
    /// Identifier the instance was restored under
    pub restored_identifier: String,
    pub staging_identifier: String,
    pub retired_identifier: String,
    /// Time taken end to end (seconds)
    pub refresh_time_seconds: u64,
}
