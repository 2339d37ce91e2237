//! Wait for a database instance to become available

use restage_models::DatabaseInstance;
use tokio::time::Instant;

use crate::activity_names::activities;
use crate::activity_types::{WaitForAvailableInput, WaitForAvailableOutput};
use crate::context::RunContext;
use crate::error::{RefreshError, Result};
use crate::poll::poll_until;

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::WAIT_FOR_AVAILABLE;

/// Poll the instance until it reports `available`.
///
/// A missing instance is expected while a rename settles, so it only ends the
/// current attempt. Running out of attempts is reported through the output's
/// state, not as an error; see [`require_available`].
pub async fn activity(
    ctx: &RunContext,
    input: WaitForAvailableInput,
) -> Result<WaitForAvailableOutput> {
    let identifier = input.instance_identifier;
    tracing::info!(activity = NAME, "Waiting for {} to become available", identifier);

    let started = Instant::now();
    let report = poll_until(
        ctx.wait_policy(),
        &identifier,
        || check_status(ctx, &identifier),
        |instance: &DatabaseInstance| instance.status.is_available(),
    )
    .await?;

    let output = WaitForAvailableOutput {
        instance_identifier: identifier,
        state: report.state,
        attempts: report.attempts,
        polls: report.polls,
        last_status: report.last.map(|instance| instance.status),
        elapsed_seconds: started.elapsed().as_secs(),
    };

    if output.is_available() {
        tracing::info!(
            activity = NAME,
            attempts = output.attempts,
            polls = output.polls,
            "{} is available (took {} seconds)",
            output.instance_identifier,
            output.elapsed_seconds
        );
    } else {
        tracing::warn!(
            activity = NAME,
            attempts = output.attempts,
            polls = output.polls,
            "{} did not become available",
            output.instance_identifier
        );
    }

    Ok(output)
}

/// Wait and turn a timed-out wait into [`RefreshError::AvailabilityTimeout`]
pub async fn require_available(ctx: &RunContext, identifier: &str) -> Result<WaitForAvailableOutput> {
    let output = activity(
        ctx,
        WaitForAvailableInput {
            instance_identifier: identifier.to_string(),
        },
    )
    .await?;

    if !output.is_available() {
        return Err(RefreshError::AvailabilityTimeout {
            identifier: output.instance_identifier,
            attempts: output.attempts,
            polls: output.polls,
        });
    }

    Ok(output)
}

async fn check_status(ctx: &RunContext, identifier: &str) -> Result<DatabaseInstance> {
    let instance = ctx.control_plane().describe_instance(identifier).await?;

    if instance.status.is_terminal_failure() {
        return Err(RefreshError::UnexpectedStatus {
            identifier: identifier.to_string(),
            status: instance.status,
        });
    }

    tracing::debug!(activity = NAME, "{} status: {}", identifier, instance.status);
    Ok(instance)
}
