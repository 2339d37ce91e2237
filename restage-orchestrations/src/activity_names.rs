//! Name constants for restage activities
//!
//! Naming convention: {crate-name}::{type}::{name}

/// Activity names
pub mod activities {
    /// Find the newest automated snapshot of an instance
    ///
    /// **Input:** [`crate::activity_types::FindLatestSnapshotInput`]  
    /// **Output:** [`crate::activity_types::FindLatestSnapshotOutput`]  
    /// **Idempotent:** Yes (read only)
    pub const FIND_LATEST_SNAPSHOT: &str = "restage-orchestrations::activity::find-latest-snapshot";

    /// Restore a snapshot into a new run-scoped instance
    ///
    /// **Input:** [`crate::activity_types::RestoreFromSnapshotInput`]  
    /// **Output:** [`crate::activity_types::RestoreFromSnapshotOutput`]  
    /// **Idempotent:** No (fails with AlreadyExists on a second call)
    /// **Operations:**
    /// - Single-AZ restore with the configured instance class and subnet group
    /// - Returns once the request is accepted, not once the instance is up
    pub const RESTORE_FROM_SNAPSHOT: &str = "restage-orchestrations::activity::restore-from-snapshot";

    /// Wait for an instance to report `available`
    ///
    /// **Input:** [`crate::activity_types::WaitForAvailableInput`]  
    /// **Output:** [`crate::activity_types::WaitForAvailableOutput`]  
    /// **Idempotent:** Yes
    /// **Operations:**
    /// - Polls status every 30 seconds, 60 checks per attempt
    /// - Treats a missing instance as transient (mid-rename) and retries, 10 attempts
    pub const WAIT_FOR_AVAILABLE: &str = "restage-orchestrations::activity::wait-for-available";

    /// Transform the restored data in place
    ///
    /// **Input:** [`crate::activity_types::MangleDataInput`]  
    /// **Output:** [`crate::activity_types::MangleDataOutput`]  
    pub const MANGLE_DATA: &str = "restage-orchestrations::activity::mangle-data";

    /// Rename an instance, applied immediately
    ///
    /// **Input:** [`crate::activity_types::RenameInstanceInput`]  
    /// **Output:** [`crate::activity_types::RenameInstanceOutput`]  
    /// **Idempotent:** No
    pub const RENAME_INSTANCE: &str = "restage-orchestrations::activity::rename-instance";

    /// Delete an instance without a final snapshot
    ///
    /// **Input:** [`crate::activity_types::DeleteInstanceInput`]  
    /// **Output:** [`crate::activity_types::DeleteInstanceOutput`]  
    /// **Idempotent:** No
    pub const DELETE_INSTANCE: &str = "restage-orchestrations::activity::delete-instance";
}
