//! Per-run context shared by every activity and orchestration

use restage_models::RunToken;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::control_plane::ControlPlane;
use crate::poll::WaitPolicy;

/// Settings for one refresh run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSettings {
    /// Instance whose automated snapshots are restored
    pub live_identifier: String,
    /// Identity the restored instance takes over
    pub staging_identifier: String,
    pub instance_class: String,
    pub subnet_group: String,
    #[serde(default)]
    pub wait_policy: WaitPolicy,
}

/// Control plane handle, settings and run token, built once per run
#[derive(Clone)]
pub struct RunContext {
    control_plane: Arc<dyn ControlPlane>,
    settings: RefreshSettings,
    token: RunToken,
}

impl RunContext {
    /// Create a context with a fresh token whose derived identifiers avoid
    /// the live and staging identifiers
    pub fn new(control_plane: Arc<dyn ControlPlane>, settings: RefreshSettings) -> Self {
        let token = RunToken::generate_avoiding(&[
            settings.live_identifier.as_str(),
            settings.staging_identifier.as_str(),
        ]);
        Self::with_token(control_plane, settings, token)
    }

    pub fn with_token(
        control_plane: Arc<dyn ControlPlane>,
        settings: RefreshSettings,
        token: RunToken,
    ) -> Self {
        Self {
            control_plane,
            settings,
            token,
        }
    }

    pub fn control_plane(&self) -> &dyn ControlPlane {
        self.control_plane.as_ref()
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.settings
    }

    pub fn wait_policy(&self) -> &WaitPolicy {
        &self.settings.wait_policy
    }

    pub fn token(&self) -> &RunToken {
        &self.token
    }

    pub fn live_identifier(&self) -> &str {
        &self.settings.live_identifier
    }

    pub fn staging_identifier(&self) -> &str {
        &self.settings.staging_identifier
    }

    pub fn restore_identifier(&self) -> String {
        self.token.restore_identifier()
    }

    pub fn terminate_identifier(&self) -> String {
        self.token.terminate_identifier()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("settings", &self.settings)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
