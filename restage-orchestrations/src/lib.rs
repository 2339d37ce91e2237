//! Restage Orchestrations - refresh a staging database from live snapshots
//!
//! This crate provides the orchestrations (ordered, multi-step workflows) and
//! activities (single control-plane operations) that restore the newest
//! automated snapshot of a live instance, transform its data, and swap it
//! into the staging identity.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use restage_orchestrations::{
//!     refresh_staging_orchestration, PassthroughMangler, RdsControlPlane, RefreshSettings,
//!     RunContext, WaitPolicy,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = RefreshSettings {
//!     live_identifier: "db-live".to_string(),
//!     staging_identifier: "db-staging".to_string(),
//!     instance_class: "db.t3.medium".to_string(),
//!     subnet_group: "staging-private".to_string(),
//!     wait_policy: WaitPolicy::default(),
//! };
//! let ctx = RunContext::new(Arc::new(RdsControlPlane::from_env().await), settings);
//!
//! let output = refresh_staging_orchestration(&ctx, &PassthroughMangler).await?;
//! println!("staging restored from {}", output.snapshot_identifier);
//! # Ok(())
//! # }
//! ```

// Orchestration exports
pub mod names;
pub mod types;
pub mod flows;
pub mod orchestrations;

// Activity exports
pub mod activity_names;
pub mod activity_types;
pub mod activities;

pub mod context;
pub mod control_plane;
pub mod error;
pub mod poll;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use types::*;
pub use activity_types::*;
pub use activities::mangle_data::{DataMangler, PassthroughMangler};
pub use context::{RefreshSettings, RunContext};
pub use control_plane::{ControlPlane, MemoryControlPlane, RdsControlPlane, RestoreRequest};
pub use error::{ControlPlaneError, RefreshError, Result};
pub use orchestrations::refresh_staging::refresh_staging_orchestration;
pub use orchestrations::swap_identities::{swap_identities_orchestration, SwapStep};
pub use poll::{WaitPolicy, WaitState};
