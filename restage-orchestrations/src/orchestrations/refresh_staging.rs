//! Refresh Staging Orchestration
//!
//! Restores the newest automated snapshot of the live instance under a
//! run-scoped identifier, waits for it, mangles its data and swaps it into
//! the staging identity. Every step runs strictly after the previous one.

use tokio::time::Instant;

use crate::activities::mangle_data::{self, DataMangler};
use crate::activities::{find_latest_snapshot, restore_from_snapshot, wait_for_available};
use crate::activity_types::{FindLatestSnapshotInput, MangleDataInput, RestoreFromSnapshotInput};
use crate::context::RunContext;
use crate::error::Result;
use crate::names::orchestrations;
use crate::orchestrations::swap_identities::swap_identities_orchestration;
use crate::types::{RefreshStagingOutput, SwapIdentitiesInput};

pub async fn refresh_staging_orchestration(
    ctx: &RunContext,
    mangler: &dyn DataMangler,
) -> Result<RefreshStagingOutput> {
    tracing::info!(
        orchestration = orchestrations::REFRESH_STAGING,
        run_token = %ctx.token(),
        "Refreshing {} from {}",
        ctx.staging_identifier(),
        ctx.live_identifier()
    );

    let started = Instant::now();
    let restore_identifier = ctx.restore_identifier();

    // Step 1: Locate the snapshot
    tracing::info!(orchestration = orchestrations::REFRESH_STAGING, "Step 1: Finding latest snapshot");
    let latest = find_latest_snapshot::activity(
        ctx,
        FindLatestSnapshotInput {
            source_instance: ctx.live_identifier().to_string(),
        },
    )
    .await?;

    // Step 2: Restore it under the run-scoped identifier
    tracing::info!(orchestration = orchestrations::REFRESH_STAGING, "Step 2: Restoring snapshot");
    let settings = ctx.settings();
    restore_from_snapshot::activity(
        ctx,
        RestoreFromSnapshotInput {
            snapshot_identifier: latest.snapshot.identifier.clone(),
            instance_identifier: restore_identifier.clone(),
            instance_class: settings.instance_class.clone(),
            subnet_group: settings.subnet_group.clone(),
        },
    )
    .await?;

    // Step 3: The mangler needs a reachable instance
    tracing::info!(orchestration = orchestrations::REFRESH_STAGING, "Step 3: Waiting for restored instance");
    wait_for_available::require_available(ctx, &restore_identifier).await?;

    // Step 4: Mangle; a failure here skips the swap
    tracing::info!(orchestration = orchestrations::REFRESH_STAGING, "Step 4: Mangling restored data");
    mangle_data::activity(
        ctx,
        mangler,
        MangleDataInput {
            instance_identifier: restore_identifier.clone(),
        },
    )
    .await?;

    // Step 5: Swap identities
    tracing::info!(orchestration = orchestrations::REFRESH_STAGING, "Step 5: Swapping into staging");
    let swap = swap_identities_orchestration(
        ctx,
        SwapIdentitiesInput {
            restore_identifier: restore_identifier.clone(),
            staging_identifier: ctx.staging_identifier().to_string(),
            terminate_identifier: ctx.terminate_identifier(),
        },
    )
    .await?;

    let refresh_time = started.elapsed().as_secs();
    tracing::info!(
        orchestration = orchestrations::REFRESH_STAGING,
        "Staging refreshed from {} in {} seconds",
        latest.snapshot.identifier,
        refresh_time
    );

    Ok(RefreshStagingOutput {
        run_token: ctx.token().to_string(),
        live_identifier: ctx.live_identifier().to_string(),
        snapshot_identifier: latest.snapshot.identifier,
        restored_identifier: restore_identifier,
        staging_identifier: swap.staging_identifier,
        retired_identifier: swap.retired_identifier,
        refresh_time_seconds: refresh_time,
    })
}
