//! Delete a database instance

use crate::activity_names::activities;
use crate::activity_types::{DeleteInstanceInput, DeleteInstanceOutput};
use crate::context::RunContext;
use crate::error::Result;

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::DELETE_INSTANCE;

pub async fn activity(ctx: &RunContext, input: DeleteInstanceInput) -> Result<DeleteInstanceOutput> {
    tracing::info!(
        activity = NAME,
        skip_final_snapshot = input.skip_final_snapshot,
        "Deleting {}",
        input.instance_identifier
    );

    ctx.control_plane()
        .delete_instance(&input.instance_identifier, input.skip_final_snapshot)
        .await?;

    tracing::info!(activity = NAME, "Deletion of {} requested", input.instance_identifier);

    Ok(DeleteInstanceOutput {
        instance_identifier: input.instance_identifier,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::{ControlPlaneCall, MemoryControlPlane};
    use crate::test_support::{context, TERMINATE};
    use restage_models::InstanceStatus;

    #[tokio::test]
    async fn test_delete_skips_final_snapshot() {
        let (ctx, plane) = context(MemoryControlPlane::new().with_instance(TERMINATE, InstanceStatus::Available));

        let output = activity(
            &ctx,
            DeleteInstanceInput {
                instance_identifier: TERMINATE.to_string(),
                skip_final_snapshot: true,
            },
        )
        .await
        .unwrap();

        assert!(output.deleted);
        assert!(plane.instance(TERMINATE).is_none());
        assert_eq!(
            plane.calls(),
            vec![ControlPlaneCall::DeleteInstance {
                identifier: TERMINATE.to_string(),
                skip_final_snapshot: true,
            }]
        );
    }
}
