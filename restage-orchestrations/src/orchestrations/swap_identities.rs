//! Swap Identities Orchestration
//!
//! Promotes a restored instance to the staging identity and retires the
//! instance that held it:
//!
//! 1. Wait for the restored instance
//! 2. Rename staging -> terminate
//! 3. Wait for the terminate identifier
//! 4. Rename restore -> staging
//! 5. Wait for the staging identifier
//! 6. Delete terminate, skipping the final snapshot
//!
//! Each step starts only after the previous one completed. Nothing is retried
//! and nothing is rolled back: a failure leaves the instances as they were at
//! that point, and the error names the step so an operator can repair by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

use crate::activities::{delete_instance, rename_instance, wait_for_available};
use crate::activity_types::{DeleteInstanceInput, RenameInstanceInput};
use crate::context::RunContext;
use crate::error::{RefreshError, Result};
use crate::names::orchestrations;
use crate::types::{SwapIdentitiesInput, SwapIdentitiesOutput};

/// Steps of the swap, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapStep {
    WaitForRestore,
    RetireStaging,
    WaitForRetired,
    PromoteRestore,
    WaitForStaging,
    DeleteRetired,
}

impl SwapStep {
    pub const ALL: [SwapStep; 6] = [
        SwapStep::WaitForRestore,
        SwapStep::RetireStaging,
        SwapStep::WaitForRetired,
        SwapStep::PromoteRestore,
        SwapStep::WaitForStaging,
        SwapStep::DeleteRetired,
    ];

    /// State the instances are left in when this step fails
    pub fn exposure(&self, input: &SwapIdentitiesInput) -> String {
        match self {
            SwapStep::WaitForRestore | SwapStep::RetireStaging => format!(
                "staging is untouched; {} is left running",
                input.restore_identifier
            ),
            SwapStep::WaitForRetired | SwapStep::PromoteRestore => format!(
                "staging identity {} is vacant; previous staging is held as {} and the restored instance as {}",
                input.staging_identifier, input.terminate_identifier, input.restore_identifier
            ),
            SwapStep::WaitForStaging => format!(
                "{} holds the restored instance but is not confirmed available; previous staging is held as {}",
                input.staging_identifier, input.terminate_identifier
            ),
            SwapStep::DeleteRetired => format!(
                "swap completed; previous staging {} still exists and must be deleted",
                input.terminate_identifier
            ),
        }
    }
}

impl fmt::Display for SwapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStep::WaitForRestore => "wait for restored instance",
            SwapStep::RetireStaging => "rename staging to terminate",
            SwapStep::WaitForRetired => "wait for renamed staging",
            SwapStep::PromoteRestore => "rename restored to staging",
            SwapStep::WaitForStaging => "wait for new staging",
            SwapStep::DeleteRetired => "delete previous staging",
        };
        f.write_str(name)
    }
}

pub async fn swap_identities_orchestration(
    ctx: &RunContext,
    input: SwapIdentitiesInput,
) -> Result<SwapIdentitiesOutput> {
    tracing::info!(
        orchestration = orchestrations::SWAP_IDENTITIES,
        "Swapping {} into {} (previous staging parked as {})",
        input.restore_identifier,
        input.staging_identifier,
        input.terminate_identifier
    );

    let started = Instant::now();

    for step in SwapStep::ALL {
        tracing::info!(orchestration = orchestrations::SWAP_IDENTITIES, "Step: {}", step);

        if let Err(e) = run_step(ctx, &input, step).await {
            tracing::error!(
                orchestration = orchestrations::SWAP_IDENTITIES,
                step = %step,
                "Swap failed: {}. Manual repair needed: {}",
                e,
                step.exposure(&input)
            );
            return Err(RefreshError::SwapInterrupted {
                step,
                source: Box::new(e),
            });
        }
    }

    let swap_time = started.elapsed().as_secs();
    tracing::info!(
        orchestration = orchestrations::SWAP_IDENTITIES,
        "{} now serves as {} (took {} seconds)",
        input.restore_identifier,
        input.staging_identifier,
        swap_time
    );

    Ok(SwapIdentitiesOutput {
        staging_identifier: input.staging_identifier,
        retired_identifier: input.terminate_identifier,
        swap_time_seconds: swap_time,
    })
}

async fn run_step(ctx: &RunContext, input: &SwapIdentitiesInput, step: SwapStep) -> Result<()> {
    match step {
        SwapStep::WaitForRestore => {
            wait_for_available::require_available(ctx, &input.restore_identifier).await?;
        }
        SwapStep::RetireStaging => {
            rename(ctx, &input.staging_identifier, &input.terminate_identifier).await?;
        }
        SwapStep::WaitForRetired => {
            wait_for_available::require_available(ctx, &input.terminate_identifier).await?;
        }
        SwapStep::PromoteRestore => {
            rename(ctx, &input.restore_identifier, &input.staging_identifier).await?;
        }
        SwapStep::WaitForStaging => {
            wait_for_available::require_available(ctx, &input.staging_identifier).await?;
        }
        SwapStep::DeleteRetired => {
            delete_instance::activity(
                ctx,
                DeleteInstanceInput {
                    instance_identifier: input.terminate_identifier.clone(),
                    skip_final_snapshot: true,
                },
            )
            .await?;
        }
    }
    Ok(())
}

async fn rename(ctx: &RunContext, from: &str, to: &str) -> Result<()> {
    rename_instance::activity(
        ctx,
        RenameInstanceInput {
            instance_identifier: from.to_string(),
            new_identifier: to.to_string(),
        },
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::{ControlPlaneCall, FailurePoint, MemoryControlPlane};
    use crate::error::ControlPlaneError;
    use crate::test_support::{context, context_with, settings, RESTORE, TERMINATE};
    use restage_models::InstanceStatus;

    fn input() -> SwapIdentitiesInput {
        SwapIdentitiesInput {
            restore_identifier: RESTORE.to_string(),
            staging_identifier: "db-staging".to_string(),
            terminate_identifier: TERMINATE.to_string(),
        }
    }

    fn plane() -> MemoryControlPlane {
        MemoryControlPlane::new()
            .with_instance("db-staging", InstanceStatus::Available)
            .with_instance(RESTORE, InstanceStatus::Available)
    }

    fn describe(identifier: &str) -> ControlPlaneCall {
        ControlPlaneCall::DescribeInstance {
            identifier: identifier.to_string(),
        }
    }

    fn rename_call(from: &str, to: &str) -> ControlPlaneCall {
        ControlPlaneCall::RenameInstance {
            identifier: from.to_string(),
            new_identifier: to.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_issues_calls_in_protocol_order() {
        let (ctx, plane) = context(plane());
        let restored = plane.instance(RESTORE).unwrap().resource_id;

        let output = swap_identities_orchestration(&ctx, input()).await.unwrap();

        assert_eq!(output.staging_identifier, "db-staging");
        assert_eq!(output.retired_identifier, TERMINATE);
        assert_eq!(
            plane.calls(),
            vec![
                describe(RESTORE),
                rename_call("db-staging", TERMINATE),
                describe(TERMINATE),
                rename_call(RESTORE, "db-staging"),
                describe("db-staging"),
                ControlPlaneCall::DeleteInstance {
                    identifier: TERMINATE.to_string(),
                    skip_final_snapshot: true,
                },
            ]
        );
        assert_eq!(plane.identifiers(), vec!["db-staging".to_string()]);
        assert_eq!(plane.instance("db-staging").unwrap().resource_id, restored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_rides_out_transient_absence_after_renames() {
        let (ctx, plane) = context(plane().with_rename_absence(2));

        swap_identities_orchestration(&ctx, input()).await.unwrap();

        let renames = plane
            .calls()
            .into_iter()
            .filter(|call| matches!(call, ControlPlaneCall::RenameInstance { .. }))
            .count();
        assert_eq!(renames, 2);
        assert_eq!(plane.identifiers(), vec!["db-staging".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_rename_failure_stops_the_swap() {
        let (ctx, plane) = context(plane().fail_on(
            FailurePoint::RenameInstance {
                identifier: "db-staging".to_string(),
            },
            "not authorized",
        ));

        let err = swap_identities_orchestration(&ctx, input()).await.unwrap_err();

        assert!(matches!(
            err,
            RefreshError::SwapInterrupted { step: SwapStep::RetireStaging, .. }
        ));
        assert_eq!(
            plane.mutations(),
            vec![rename_call("db-staging", TERMINATE)]
        );
        assert_eq!(plane.calls().len(), 2);
        assert!(plane.instance("db-staging").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_rename_failure_leaves_staging_vacant() {
        let (ctx, plane) = context(plane().fail_on(
            FailurePoint::RenameInstance {
                identifier: RESTORE.to_string(),
            },
            "throttled",
        ));

        let err = swap_identities_orchestration(&ctx, input()).await.unwrap_err();

        match err {
            RefreshError::SwapInterrupted { step, source } => {
                assert_eq!(step, SwapStep::PromoteRestore);
                assert!(matches!(
                    *source,
                    RefreshError::ControlPlane(ControlPlaneError::Request { .. })
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(plane.instance("db-staging").is_none());
        assert!(plane.instance(TERMINATE).is_some());
        assert!(plane.instance(RESTORE).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_restore_times_out_before_any_rename() {
        let mut settings = settings();
        settings.wait_policy.max_polls = 3;
        settings.wait_policy.max_attempts = 2;
        let (ctx, plane) = context_with(
            MemoryControlPlane::new()
                .with_instance("db-staging", InstanceStatus::Available)
                .with_instance(RESTORE, InstanceStatus::Creating),
            settings,
        );

        let err = swap_identities_orchestration(&ctx, input()).await.unwrap_err();

        match err {
            RefreshError::SwapInterrupted { step, source } => {
                assert_eq!(step, SwapStep::WaitForRestore);
                assert!(matches!(*source, RefreshError::AvailabilityTimeout { polls: 6, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(plane.mutations().is_empty());
    }

    #[test]
    fn test_exposure_after_first_rename_names_parked_instance() {
        let text = SwapStep::PromoteRestore.exposure(&input());
        assert!(text.contains("db-staging is vacant"));
        assert!(text.contains(TERMINATE));
    }
}
