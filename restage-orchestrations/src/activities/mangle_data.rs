//! Transform restored data before it becomes staging

use async_trait::async_trait;
use tokio::time::Instant;

use crate::activity_names::activities;
use crate::activity_types::{MangleDataInput, MangleDataOutput};
use crate::context::RunContext;
use crate::error::{RefreshError, Result};

/// Activity name for logging and flow diagram mapping
pub const NAME: &str = activities::MANGLE_DATA;

/// Data transformation applied to a restored, available instance
#[async_trait]
pub trait DataMangler: Send + Sync {
    /// Short name used in logs and run output
    fn name(&self) -> &str;

    /// Transform the instance's data in place
    async fn transform(&self, ctx: &RunContext, instance_identifier: &str) -> anyhow::Result<()>;
}

/// Mangler that leaves the restored data untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughMangler;

#[async_trait]
impl DataMangler for PassthroughMangler {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn transform(&self, _ctx: &RunContext, instance_identifier: &str) -> anyhow::Result<()> {
        tracing::warn!(
            activity = NAME,
            "No data transformation configured, {} keeps live data as restored",
            instance_identifier
        );
        Ok(())
    }
}

pub async fn activity(
    ctx: &RunContext,
    mangler: &dyn DataMangler,
    input: MangleDataInput,
) -> Result<MangleDataOutput> {
    tracing::info!(
        activity = NAME,
        mangler = mangler.name(),
        "Mangling data in {}",
        input.instance_identifier
    );

    let started = Instant::now();
    mangler
        .transform(ctx, &input.instance_identifier)
        .await
        .map_err(|e| RefreshError::Mangling {
            identifier: input.instance_identifier.clone(),
            message: format!("{:#}", e),
        })?;

    Ok(MangleDataOutput {
        mangler: mangler.name().to_string(),
        elapsed_seconds: started.elapsed().as_secs(),
    })
}
