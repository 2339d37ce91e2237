//! Fixtures shared by unit tests

use chrono::{TimeZone, Utc};
use restage_models::{RunToken, Snapshot};
use std::sync::Arc;

use crate::context::{RefreshSettings, RunContext};
use crate::control_plane::MemoryControlPlane;
use crate::poll::WaitPolicy;

pub(crate) const TOKEN: &str = "0a1b2c3d";
pub(crate) const RESTORE: &str = "restore-0a1b2c3d";
pub(crate) const TERMINATE: &str = "terminate-0a1b2c3d";

pub(crate) fn settings() -> RefreshSettings {
    RefreshSettings {
        live_identifier: "db-live".to_string(),
        staging_identifier: "db-staging".to_string(),
        instance_class: "db.t3.micro".to_string(),
        subnet_group: "staging-private".to_string(),
        wait_policy: WaitPolicy::default(),
    }
}

pub(crate) fn snapshot(identifier: &str, year: i32, month: u32, day: u32) -> Snapshot {
    Snapshot {
        identifier: identifier.to_string(),
        source_instance: "db-live".to_string(),
        created_at: Utc.with_ymd_and_hms(year, month, day, 3, 0, 0).unwrap(),
    }
}

/// Context over `plane` with the fixed token [`TOKEN`]
pub(crate) fn context(plane: MemoryControlPlane) -> (RunContext, Arc<MemoryControlPlane>) {
    context_with(plane, settings())
}

pub(crate) fn context_with(
    plane: MemoryControlPlane,
    settings: RefreshSettings,
) -> (RunContext, Arc<MemoryControlPlane>) {
    let plane = Arc::new(plane);
    let ctx = RunContext::with_token(plane.clone(), settings, RunToken::from_string(TOKEN));
    (ctx, plane)
}
