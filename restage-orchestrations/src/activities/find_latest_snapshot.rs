//! Find the newest automated snapshot of a source instance

use restage_models::Snapshot;

use crate::activity_names::activities;
use crate::activity_types::{FindLatestSnapshotInput, FindLatestSnapshotOutput};
use crate::context::RunContext;
use crate::error::{RefreshError, Result};

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::FIND_LATEST_SNAPSHOT;

pub async fn activity(
    ctx: &RunContext,
    input: FindLatestSnapshotInput,
) -> Result<FindLatestSnapshotOutput> {
    tracing::info!(activity = NAME, "Looking up automated snapshots of {}", input.source_instance);

    let snapshots = ctx
        .control_plane()
        .list_automated_snapshots(&input.source_instance)
        .await?;

    let snapshot = select_latest(&snapshots)
        .cloned()
        .ok_or_else(|| RefreshError::SnapshotNotFound {
            source_instance: input.source_instance.clone(),
        })?;

    tracing::info!(
        activity = NAME,
        candidates = snapshots.len(),
        "Found snapshot with id: {} (created {})",
        snapshot.identifier,
        snapshot.created_at
    );

    Ok(FindLatestSnapshotOutput {
        snapshot,
        candidates: snapshots.len(),
    })
}

/// Newest snapshot by creation time. Among equal timestamps the one listed
/// first wins, so the result then depends on listing order.
pub fn select_latest(snapshots: &[Snapshot]) -> Option<&Snapshot> {
    snapshots.iter().fold(None, |best: Option<&Snapshot>, candidate| match best {
        Some(current) if current.created_at >= candidate.created_at => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::{FailurePoint, MemoryControlPlane};
    use crate::error::ControlPlaneError;
    use crate::test_support::{context, snapshot};

    fn input() -> FindLatestSnapshotInput {
        FindLatestSnapshotInput {
            source_instance: "db-live".to_string(),
        }
    }

    #[tokio::test]
    async fn test_picks_maximum_timestamp() {
        let (ctx, _) = context(
            MemoryControlPlane::new()
                .with_snapshot(snapshot("s1", 2024, 1, 1))
                .with_snapshot(snapshot("s2", 2024, 1, 3))
                .with_snapshot(snapshot("s3", 2024, 1, 2)),
        );

        let output = activity(&ctx, input()).await.unwrap();
        assert_eq!(output.snapshot.identifier, "s2");
        assert_eq!(output.candidates, 3);
    }

    #[tokio::test]
    async fn test_no_snapshots_is_not_found() {
        let (ctx, _) = context(MemoryControlPlane::new());

        let err = activity(&ctx, input()).await.unwrap_err();
        assert!(matches!(
            err,
            RefreshError::SnapshotNotFound { ref source_instance } if source_instance == "db-live"
        ));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let (ctx, _) = context(
            MemoryControlPlane::new()
                .with_snapshot(snapshot("s1", 2024, 1, 1))
                .fail_on(FailurePoint::ListAutomatedSnapshots, "access denied"),
        );

        let err = activity(&ctx, input()).await.unwrap_err();
        assert!(matches!(err, RefreshError::ControlPlane(ControlPlaneError::Request { .. })));
    }

    #[test]
    fn test_tie_keeps_first_listed() {
        let snapshots = vec![
            snapshot("a", 2024, 1, 5),
            snapshot("b", 2024, 1, 5),
            snapshot("c", 2024, 1, 4),
        ];
        assert_eq!(select_latest(&snapshots).unwrap().identifier, "a");
        assert!(select_latest(&[]).is_none());
    }
}
