//! Rename a database instance

use crate::activity_names::activities;
use crate::activity_types::{RenameInstanceInput, RenameInstanceOutput};
use crate::context::RunContext;
use crate::error::Result;

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::RENAME_INSTANCE;

/// Issue the rename. Completion is not checked here; callers wait on the new
/// identifier.
pub async fn activity(ctx: &RunContext, input: RenameInstanceInput) -> Result<RenameInstanceOutput> {
    tracing::info!(
        activity = NAME,
        "Renaming {} to {}",
        input.instance_identifier,
        input.new_identifier
    );

    ctx.control_plane()
        .rename_instance(&input.instance_identifier, &input.new_identifier)
        .await?;

    Ok(RenameInstanceOutput {
        previous_identifier: input.instance_identifier,
        instance_identifier: input.new_identifier,
    })
}
