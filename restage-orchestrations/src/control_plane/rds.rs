//! Amazon RDS control plane client

use async_trait::async_trait;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::Client;
use chrono::{DateTime, Utc};
use restage_models::{DatabaseInstance, InstanceStatus, Snapshot};

use super::{ControlPlane, RestoreRequest};
use crate::error::ControlPlaneError;

const AUTOMATED_SNAPSHOT_TYPE: &str = "automated";

/// Control plane backed by the RDS API
#[derive(Clone)]
pub struct RdsControlPlane {
    client: Client,
}

impl RdsControlPlane {
    /// Build a client from the default AWS credential and region chain
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn request_error(operation: &str, err: impl std::error::Error) -> ControlPlaneError {
    ControlPlaneError::request(operation, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ControlPlane for RdsControlPlane {
    async fn list_automated_snapshots(
        &self,
        source_instance: &str,
    ) -> Result<Vec<Snapshot>, ControlPlaneError> {
        let mut pages = self
            .client
            .describe_db_snapshots()
            .db_instance_identifier(source_instance)
            .snapshot_type(AUTOMATED_SNAPSHOT_TYPE)
            .into_paginator()
            .send();

        let mut snapshots = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| request_error("DescribeDBSnapshots", e))?;

            for snapshot in page.db_snapshots() {
                let Some(identifier) = snapshot.db_snapshot_identifier() else {
                    continue;
                };
                // Snapshots still in progress carry no creation time yet
                let Some(created_at) = snapshot
                    .snapshot_create_time()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
                else {
                    tracing::debug!(snapshot = identifier, "Skipping snapshot without creation time");
                    continue;
                };

                snapshots.push(Snapshot {
                    identifier: identifier.to_string(),
                    source_instance: snapshot
                        .db_instance_identifier()
                        .unwrap_or(source_instance)
                        .to_string(),
                    created_at,
                });
            }
        }

        Ok(snapshots)
    }

    async fn describe_instance(
        &self,
        identifier: &str,
    ) -> Result<DatabaseInstance, ControlPlaneError> {
        let output = match self
            .client
            .describe_db_instances()
            .db_instance_identifier(identifier)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, |e| e.is_db_instance_not_found_fault()) =>
            {
                return Err(ControlPlaneError::NotFound {
                    identifier: identifier.to_string(),
                });
            }
            Err(err) => return Err(request_error("DescribeDBInstances", err)),
        };

        let instance = output
            .db_instances()
            .first()
            .ok_or_else(|| ControlPlaneError::NotFound {
                identifier: identifier.to_string(),
            })?;

        Ok(DatabaseInstance {
            identifier: instance
                .db_instance_identifier()
                .unwrap_or(identifier)
                .to_string(),
            resource_id: instance.dbi_resource_id().map(str::to_string),
            status: InstanceStatus::parse(instance.db_instance_status().unwrap_or("unknown")),
            restored_from: None,
        })
    }

    async fn restore_from_snapshot(
        &self,
        request: &RestoreRequest,
    ) -> Result<DatabaseInstance, ControlPlaneError> {
        let output = match self
            .client
            .restore_db_instance_from_db_snapshot()
            .db_instance_identifier(&request.instance_identifier)
            .db_snapshot_identifier(&request.snapshot_identifier)
            .db_subnet_group_name(&request.subnet_group)
            .db_instance_class(&request.instance_class)
            .multi_az(request.multi_az)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, |e| e.is_db_instance_already_exists_fault()) =>
            {
                return Err(ControlPlaneError::AlreadyExists {
                    identifier: request.instance_identifier.clone(),
                });
            }
            Err(err) => return Err(request_error("RestoreDBInstanceFromDBSnapshot", err)),
        };

        let instance = output.db_instance();
        Ok(DatabaseInstance {
            identifier: request.instance_identifier.clone(),
            resource_id: instance.and_then(|i| i.dbi_resource_id()).map(str::to_string),
            status: InstanceStatus::parse(
                instance
                    .and_then(|i| i.db_instance_status())
                    .unwrap_or("creating"),
            ),
            restored_from: Some(request.snapshot_identifier.clone()),
        })
    }

    async fn rename_instance(
        &self,
        identifier: &str,
        new_identifier: &str,
    ) -> Result<(), ControlPlaneError> {
        self.client
            .modify_db_instance()
            .db_instance_identifier(identifier)
            .new_db_instance_identifier(new_identifier)
            .apply_immediately(true)
            .send()
            .await
            .map_err(|e| request_error("ModifyDBInstance", e))?;

        Ok(())
    }

    async fn delete_instance(
        &self,
        identifier: &str,
        skip_final_snapshot: bool,
    ) -> Result<(), ControlPlaneError> {
        self.client
            .delete_db_instance()
            .db_instance_identifier(identifier)
            .skip_final_snapshot(skip_final_snapshot)
            .send()
            .await
            .map_err(|e| request_error("DeleteDBInstance", e))?;

        Ok(())
    }
}
