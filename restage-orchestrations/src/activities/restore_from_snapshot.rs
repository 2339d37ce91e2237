//! Restore a snapshot into a new run-scoped instance

use crate::activity_names::activities;
use crate::activity_types::{RestoreFromSnapshotInput, RestoreFromSnapshotOutput};
use crate::context::RunContext;
use crate::control_plane::RestoreRequest;
use crate::error::{ControlPlaneError, RefreshError, Result};

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::RESTORE_FROM_SNAPSHOT;

/// Request the restore and return without waiting for the instance to come up
pub async fn activity(
    ctx: &RunContext,
    input: RestoreFromSnapshotInput,
) -> Result<RestoreFromSnapshotOutput> {
    tracing::info!(
        activity = NAME,
        instance_class = %input.instance_class,
        subnet_group = %input.subnet_group,
        "Restoring snapshot {} into {}",
        input.snapshot_identifier,
        input.instance_identifier
    );

    let request = RestoreRequest {
        snapshot_identifier: input.snapshot_identifier,
        instance_identifier: input.instance_identifier,
        instance_class: input.instance_class,
        subnet_group: input.subnet_group,
        multi_az: false,
    };

    let instance = match ctx.control_plane().restore_from_snapshot(&request).await {
        Ok(instance) => instance,
        Err(ControlPlaneError::AlreadyExists { identifier }) => {
            return Err(RefreshError::AlreadyExists { identifier });
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(activity = NAME, "Restore of {} requested (status: {})", instance.identifier, instance.status);

    Ok(RestoreFromSnapshotOutput { instance })
}
