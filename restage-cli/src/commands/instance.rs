use anyhow::Result;
use restage_models::RunToken;
use restage_orchestrations::activities::{find_latest_snapshot, wait_for_available};
use restage_orchestrations::{
    swap_identities_orchestration, FindLatestSnapshotInput, RunContext, SwapIdentitiesInput,
    WaitForAvailableInput,
};

use crate::cli::OutputFormat;
use crate::commands::print_json;

const RESTORE_PREFIX: &str = "restore-";

pub async fn run_snapshot(ctx: &RunContext, output: OutputFormat) -> Result<()> {
    let latest = find_latest_snapshot::activity(
        ctx,
        FindLatestSnapshotInput {
            source_instance: ctx.live_identifier().to_string(),
        },
    )
    .await?;

    match output {
        OutputFormat::Json => print_json(&latest)?,
        OutputFormat::Table => {
            println!("{:<40} {:<25} {}", "SNAPSHOT", "SOURCE", "CREATED");
            println!("{}", "-".repeat(90));
            println!(
                "{:<40} {:<25} {}",
                latest.snapshot.identifier,
                latest.snapshot.source_instance,
                latest.snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!();
            println!("{} automated snapshot(s) considered", latest.candidates);
        }
    }

    Ok(())
}

pub async fn run_wait(ctx: &RunContext, identifier: String, output: OutputFormat) -> Result<()> {
    let result = wait_for_available::activity(
        ctx,
        WaitForAvailableInput {
            instance_identifier: identifier,
        },
    )
    .await?;

    match output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            let status = result
                .last_status
                .as_ref()
                .map(|status| status.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("Instance: {}", result.instance_identifier);
            println!("{}", "=".repeat(60));
            println!("  State:              {:?}", result.state);
            println!("  Last Status:        {}", status);
            println!("  Attempts:           {}", result.attempts);
            println!("  Polls:              {}", result.polls);
            println!("  Elapsed:            {}s", result.elapsed_seconds);
        }
    }

    if !result.is_available() {
        anyhow::bail!(
            "{} did not become available after {} attempt(s)",
            result.instance_identifier,
            result.attempts
        );
    }

    Ok(())
}

pub async fn run_swap(ctx: &RunContext, restore_identifier: String, output: OutputFormat) -> Result<()> {
    let input = swap_input(ctx, restore_identifier)?;
    tracing::info!(
        "Promoting {} to {} (previous staging parked as {})",
        input.restore_identifier,
        input.staging_identifier,
        input.terminate_identifier
    );

    let result = swap_identities_orchestration(ctx, input).await?;

    match output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            println!("✓ Swap complete");
            println!("  Staging Instance:   {}", result.staging_identifier);
            println!("  Retired Instance:   {} (deleting)", result.retired_identifier);
            println!("  Duration:           {}s", result.swap_time_seconds);
        }
    }

    Ok(())
}

/// A restore left by an earlier run keeps that run's token so the parked
/// staging name matches; any other identifier uses this run's token.
///
/// The restore and terminate identifiers must not name the live or staging
/// instance, nor each other.
fn swap_input(ctx: &RunContext, restore_identifier: String) -> Result<SwapIdentitiesInput> {
    let terminate_identifier = restore_identifier
        .strip_prefix(RESTORE_PREFIX)
        .filter(|token| !token.is_empty())
        .map(|token| RunToken::from_string(token).terminate_identifier())
        .unwrap_or_else(|| ctx.terminate_identifier());

    let reserved = [
        ("live", ctx.live_identifier()),
        ("staging", ctx.staging_identifier()),
    ];
    for (role, identifier) in reserved {
        if restore_identifier.eq_ignore_ascii_case(identifier) {
            anyhow::bail!(
                "Refusing to swap: restore identifier '{}' is the {} instance",
                restore_identifier,
                role
            );
        }
        if terminate_identifier.eq_ignore_ascii_case(identifier) {
            anyhow::bail!(
                "Refusing to swap: parked name '{}' would collide with the {} instance",
                terminate_identifier,
                role
            );
        }
    }
    if restore_identifier.eq_ignore_ascii_case(&terminate_identifier) {
        anyhow::bail!(
            "Refusing to swap: restore identifier '{}' equals the parked name",
            restore_identifier
        );
    }

    Ok(SwapIdentitiesInput {
        restore_identifier,
        staging_identifier: ctx.staging_identifier().to_string(),
        terminate_identifier,
    })
}
