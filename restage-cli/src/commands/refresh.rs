use anyhow::Result;
use restage_orchestrations::{refresh_staging_orchestration, PassthroughMangler, RunContext};

use crate::cli::OutputFormat;
use crate::commands::print_json;

pub async fn run_refresh(ctx: &RunContext, output: OutputFormat) -> Result<()> {
    tracing::info!(
        run_token = %ctx.token(),
        "Refreshing staging instance {} from {}",
        ctx.staging_identifier(),
        ctx.live_identifier()
    );

    let result = refresh_staging_orchestration(ctx, &PassthroughMangler).await?;

    match output {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            println!("✓ Staging refreshed");
            println!("{}", "=".repeat(60));
            println!("  Run Token:          {}", result.run_token);
            println!("  Live Instance:      {}", result.live_identifier);
            println!("  Snapshot:           {}", result.snapshot_identifier);
            println!("  Restored As:        {}", result.restored_identifier);
            println!("  Staging Instance:   {}", result.staging_identifier);
            println!("  Retired Instance:   {} (deleting)", result.retired_identifier);
            println!("  Duration:           {}s", result.refresh_time_seconds);
        }
    }

    Ok(())
}
