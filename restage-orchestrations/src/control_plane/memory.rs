//! In-memory control plane for testing.
//!
//! Simulates the parts of the managed database service the refresh flow
//! depends on: restores that take a few status checks to come up, renames
//! that leave the new identifier briefly unresolvable, and one-shot failure
//! injection. Every call is recorded in a journal for ordering assertions.

use async_trait::async_trait;
use parking_lot::Mutex;
use restage_models::{DatabaseInstance, InstanceStatus, Snapshot};
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::{ControlPlane, RestoreRequest};
use crate::error::ControlPlaneError;

/// A call received by the in-memory control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneCall {
    ListAutomatedSnapshots { source_instance: String },
    DescribeInstance { identifier: String },
    RestoreFromSnapshot(RestoreRequest),
    RenameInstance { identifier: String, new_identifier: String },
    DeleteInstance { identifier: String, skip_final_snapshot: bool },
}

impl ControlPlaneCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::RestoreFromSnapshot(_) | Self::RenameInstance { .. } | Self::DeleteInstance { .. }
        )
    }
}

/// Scripted response for a describe call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Absent,
    Status(InstanceStatus),
}

/// Operation at which the next call fails once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    ListAutomatedSnapshots,
    DescribeInstance { identifier: String },
    RestoreFromSnapshot,
    RenameInstance { identifier: String },
    DeleteInstance { identifier: String },
}

#[derive(Debug, Clone)]
struct SimulatedInstance {
    resource_id: String,
    status: InstanceStatus,
    restored_from: Option<String>,
    /// Describe calls left before a pending status settles to available
    settling_checks: u32,
}

#[derive(Debug, Default)]
struct MemoryState {
    instances: BTreeMap<String, SimulatedInstance>,
    snapshots: Vec<Snapshot>,
    scripted: HashMap<String, VecDeque<Lookup>>,
    failures: HashMap<FailurePoint, String>,
    calls: Vec<ControlPlaneCall>,
    restore_latency: u32,
    rename_absence: u32,
    next_resource: u64,
}

impl MemoryState {
    fn allocate_resource_id(&mut self) -> String {
        self.next_resource += 1;
        format!("db-{:06}", self.next_resource)
    }

    fn take_failure(&mut self, point: &FailurePoint) -> Option<String> {
        self.failures.remove(point)
    }
}

/// In-memory control plane
#[derive(Debug, Default)]
pub struct MemoryControlPlane {
    state: Mutex<MemoryState>,
}

impl MemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing instance
    pub fn with_instance(self, identifier: &str, status: InstanceStatus) -> Self {
        {
            let mut state = self.state.lock();
            let resource_id = state.allocate_resource_id();
            state.instances.insert(
                identifier.to_string(),
                SimulatedInstance {
                    resource_id,
                    status,
                    restored_from: None,
                    settling_checks: 0,
                },
            );
        }
        self
    }

    /// Add an automated snapshot
    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.state.lock().snapshots.push(snapshot);
        self
    }

    /// Restored instances report `creating` for this many status checks
    pub fn with_restore_latency(self, checks: u32) -> Self {
        self.state.lock().restore_latency = checks;
        self
    }

    /// Renamed instances are unresolvable under their new identifier for this
    /// many status checks, then report `renaming` once before settling
    pub fn with_rename_absence(self, checks: u32) -> Self {
        self.state.lock().rename_absence = checks;
        self
    }

    /// Queue describe responses for an identifier, consumed before the
    /// simulated state is consulted
    pub fn script(self, identifier: &str, lookups: impl IntoIterator<Item = Lookup>) -> Self {
        self.state
            .lock()
            .scripted
            .entry(identifier.to_string())
            .or_default()
            .extend(lookups);
        self
    }

    /// Make the next call matching `point` fail with a request error
    pub fn fail_on(self, point: FailurePoint, message: &str) -> Self {
        self.state.lock().failures.insert(point, message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ControlPlaneCall> {
        self.state.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<ControlPlaneCall> {
        self.calls().into_iter().filter(ControlPlaneCall::is_mutation).collect()
    }

    /// Snapshot of an instance without recording a call or advancing state
    pub fn instance(&self, identifier: &str) -> Option<DatabaseInstance> {
        let state = self.state.lock();
        state.instances.get(identifier).map(|sim| DatabaseInstance {
            identifier: identifier.to_string(),
            resource_id: Some(sim.resource_id.clone()),
            status: sim.status.clone(),
            restored_from: sim.restored_from.clone(),
        })
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.state.lock().instances.keys().cloned().collect()
    }
}

#[async_trait]
impl ControlPlane for MemoryControlPlane {
    async fn list_automated_snapshots(
        &self,
        source_instance: &str,
    ) -> Result<Vec<Snapshot>, ControlPlaneError> {
        let mut state = self.state.lock();
        state.calls.push(ControlPlaneCall::ListAutomatedSnapshots {
            source_instance: source_instance.to_string(),
        });

        if let Some(message) = state.take_failure(&FailurePoint::ListAutomatedSnapshots) {
            return Err(ControlPlaneError::request("DescribeDBSnapshots", message));
        }

        Ok(state
            .snapshots
            .iter()
            .filter(|s| s.source_instance == source_instance)
            .cloned()
            .collect())
    }

    async fn describe_instance(
        &self,
        identifier: &str,
    ) -> Result<DatabaseInstance, ControlPlaneError> {
        let mut state = self.state.lock();
        state.calls.push(ControlPlaneCall::DescribeInstance {
            identifier: identifier.to_string(),
        });

        let failure = FailurePoint::DescribeInstance {
            identifier: identifier.to_string(),
        };
        if let Some(message) = state.take_failure(&failure) {
            return Err(ControlPlaneError::request("DescribeDBInstances", message));
        }

        let not_found = || ControlPlaneError::NotFound {
            identifier: identifier.to_string(),
        };

        let scripted = state
            .scripted
            .get_mut(identifier)
            .and_then(VecDeque::pop_front);
        let resolved = state.instances.get(identifier);

        match scripted {
            Some(Lookup::Absent) => return Err(not_found()),
            Some(Lookup::Status(status)) => {
                return Ok(DatabaseInstance {
                    identifier: identifier.to_string(),
                    resource_id: resolved.map(|sim| sim.resource_id.clone()),
                    status,
                    restored_from: resolved.and_then(|sim| sim.restored_from.clone()),
                });
            }
            None => {}
        }

        let sim = state.instances.get_mut(identifier).ok_or_else(not_found)?;
        let observed = DatabaseInstance {
            identifier: identifier.to_string(),
            resource_id: Some(sim.resource_id.clone()),
            status: sim.status.clone(),
            restored_from: sim.restored_from.clone(),
        };

        if sim.settling_checks > 0 {
            sim.settling_checks -= 1;
            if sim.settling_checks == 0 {
                sim.status = InstanceStatus::Available;
            }
        }

        Ok(observed)
    }

    async fn restore_from_snapshot(
        &self,
        request: &RestoreRequest,
    ) -> Result<DatabaseInstance, ControlPlaneError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(ControlPlaneCall::RestoreFromSnapshot(request.clone()));

        if let Some(message) = state.take_failure(&FailurePoint::RestoreFromSnapshot) {
            return Err(ControlPlaneError::request(
                "RestoreDBInstanceFromDBSnapshot",
                message,
            ));
        }

        if state.instances.contains_key(&request.instance_identifier) {
            return Err(ControlPlaneError::AlreadyExists {
                identifier: request.instance_identifier.clone(),
            });
        }
        if !state
            .snapshots
            .iter()
            .any(|s| s.identifier == request.snapshot_identifier)
        {
            return Err(ControlPlaneError::request(
                "RestoreDBInstanceFromDBSnapshot",
                format!("snapshot `{}` not found", request.snapshot_identifier),
            ));
        }

        let resource_id = state.allocate_resource_id();
        let settling_checks = state.restore_latency;
        let status = if settling_checks == 0 {
            InstanceStatus::Available
        } else {
            InstanceStatus::Creating
        };
        state.instances.insert(
            request.instance_identifier.clone(),
            SimulatedInstance {
                resource_id: resource_id.clone(),
                status: status.clone(),
                restored_from: Some(request.snapshot_identifier.clone()),
                settling_checks,
            },
        );

        Ok(DatabaseInstance {
            identifier: request.instance_identifier.clone(),
            resource_id: Some(resource_id),
            status,
            restored_from: Some(request.snapshot_identifier.clone()),
        })
    }

    async fn rename_instance(
        &self,
        identifier: &str,
        new_identifier: &str,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock();
        state.calls.push(ControlPlaneCall::RenameInstance {
            identifier: identifier.to_string(),
            new_identifier: new_identifier.to_string(),
        });

        let failure = FailurePoint::RenameInstance {
            identifier: identifier.to_string(),
        };
        if let Some(message) = state.take_failure(&failure) {
            return Err(ControlPlaneError::request("ModifyDBInstance", message));
        }

        if state.instances.contains_key(new_identifier) {
            return Err(ControlPlaneError::AlreadyExists {
                identifier: new_identifier.to_string(),
            });
        }
        let mut sim = state
            .instances
            .remove(identifier)
            .ok_or_else(|| ControlPlaneError::NotFound {
                identifier: identifier.to_string(),
            })?;

        let absence = state.rename_absence;
        if absence > 0 {
            sim.status = InstanceStatus::Renaming;
            sim.settling_checks = 1;
            state
                .scripted
                .entry(new_identifier.to_string())
                .or_default()
                .extend(std::iter::repeat(Lookup::Absent).take(absence as usize));
        }
        state.instances.insert(new_identifier.to_string(), sim);

        Ok(())
    }

    async fn delete_instance(
        &self,
        identifier: &str,
        skip_final_snapshot: bool,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock();
        state.calls.push(ControlPlaneCall::DeleteInstance {
            identifier: identifier.to_string(),
            skip_final_snapshot,
        });

        let failure = FailurePoint::DeleteInstance {
            identifier: identifier.to_string(),
        };
        if let Some(message) = state.take_failure(&failure) {
            return Err(ControlPlaneError::request("DeleteDBInstance", message));
        }

        state
            .instances
            .remove(identifier)
            .map(|_| ())
            .ok_or_else(|| ControlPlaneError::NotFound {
                identifier: identifier.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(identifier: &str) -> Snapshot {
        Snapshot {
            identifier: identifier.to_string(),
            source_instance: "db-live".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap(),
        }
    }

    fn restore_request(identifier: &str) -> RestoreRequest {
        RestoreRequest {
            snapshot_identifier: "snap-9".to_string(),
            instance_identifier: identifier.to_string(),
            instance_class: "db.t3.micro".to_string(),
            subnet_group: "private".to_string(),
            multi_az: false,
        }
    }

    #[tokio::test]
    async fn test_restore_settles_after_latency() {
        let plane = MemoryControlPlane::new()
            .with_snapshot(snapshot("snap-9"))
            .with_restore_latency(2);

        let created = plane.restore_from_snapshot(&restore_request("restore-1")).await.unwrap();
        assert_eq!(created.status, InstanceStatus::Creating);

        let first = plane.describe_instance("restore-1").await.unwrap();
        let second = plane.describe_instance("restore-1").await.unwrap();
        let third = plane.describe_instance("restore-1").await.unwrap();
        assert_eq!(first.status, InstanceStatus::Creating);
        assert_eq!(second.status, InstanceStatus::Creating);
        assert_eq!(third.status, InstanceStatus::Available);
    }

    #[tokio::test]
    async fn test_rename_keeps_resource_and_hides_new_name() {
        let plane = MemoryControlPlane::new()
            .with_instance("db-staging", InstanceStatus::Available)
            .with_rename_absence(1);
        let resource_id = plane.instance("db-staging").unwrap().resource_id;

        plane.rename_instance("db-staging", "terminate-1").await.unwrap();

        assert!(matches!(
            plane.describe_instance("db-staging").await,
            Err(ControlPlaneError::NotFound { .. })
        ));
        assert!(matches!(
            plane.describe_instance("terminate-1").await,
            Err(ControlPlaneError::NotFound { .. })
        ));
        let renaming = plane.describe_instance("terminate-1").await.unwrap();
        assert_eq!(renaming.status, InstanceStatus::Renaming);
        assert_eq!(renaming.resource_id, resource_id);
        let settled = plane.describe_instance("terminate-1").await.unwrap();
        assert_eq!(settled.status, InstanceStatus::Available);
    }

    #[tokio::test]
    async fn test_rename_onto_existing_identifier_is_rejected() {
        let plane = MemoryControlPlane::new()
            .with_instance("a", InstanceStatus::Available)
            .with_instance("b", InstanceStatus::Available);

        let err = plane.rename_instance("a", "b").await.unwrap_err();
        assert_eq!(err, ControlPlaneError::AlreadyExists { identifier: "b".to_string() });
        assert!(plane.instance("a").is_some());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let plane = MemoryControlPlane::new()
            .with_instance("db-staging", InstanceStatus::Available)
            .fail_on(
                FailurePoint::DescribeInstance { identifier: "db-staging".to_string() },
                "throttled",
            );

        assert!(matches!(
            plane.describe_instance("db-staging").await,
            Err(ControlPlaneError::Request { .. })
        ));
        assert!(plane.describe_instance("db-staging").await.is_ok());
        assert_eq!(plane.calls().len(), 2);
    }
}
