//! Name constants for restage orchestrations
//!
//! Naming convention: {crate-name}::{type}::{name}

/// Orchestration names
pub mod orchestrations {
    /// Refresh staging from the latest live snapshot
    ///
    /// **Input:** [`crate::context::RunContext`]  
    /// **Output:** [`crate::types::RefreshStagingOutput`]  
    /// **Activities used:**
    /// - [`crate::activity_names::activities::FIND_LATEST_SNAPSHOT`]
    /// - [`crate::activity_names::activities::RESTORE_FROM_SNAPSHOT`]
    /// - [`crate::activity_names::activities::WAIT_FOR_AVAILABLE`]
    /// - [`crate::activity_names::activities::MANGLE_DATA`]
    /// - [`SWAP_IDENTITIES`] (runs inline)
    /// **Duration:** restore time plus three availability waits, typically 20-60 minutes
    pub const REFRESH_STAGING: &str = "restage-orchestrations::orchestration::refresh-staging";

    /// Promote a restored instance to the staging identity and retire the old one
    ///
    /// **Input:** [`crate::types::SwapIdentitiesInput`]  
    /// **Output:** [`crate::types::SwapIdentitiesOutput`]  
    /// **Activities used:**
    /// - [`crate::activity_names::activities::WAIT_FOR_AVAILABLE`] (x3)
    /// - [`crate::activity_names::activities::RENAME_INSTANCE`] (x2)
    /// - [`crate::activity_names::activities::DELETE_INSTANCE`]
    /// **Note:** Not transactional. Nothing is rolled back on failure.
    pub const SWAP_IDENTITIES: &str = "restage-orchestrations::orchestration::swap-identities";
}
