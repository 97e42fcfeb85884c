// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The entry point the outer (HTTP) layer talks to: solve deployment requests
//! into stored deployments, ship them to devices and start them.

use uuid::Uuid;

use crate::coordinator::{DeployReport, DeploymentCoordinator, ExecutionInputs};
use crate::errors::{DispatchError, OrchestratorError};
use crate::model::{Deployment, NewDeployment};
use crate::observability::messages::deployment::{ResolutionFailed, ResolutionStarted};
use crate::observability::messages::StructuredLog;
use crate::registry::{DeviceRegistry, ModuleRegistry};
use crate::solver::{build_manifest, resolve};
use crate::store::{Collection, Filter};
use crate::traits::{DeviceMessenger, ExecutionResponse, Persistence};

pub struct Orchestrator<S: Persistence, M: DeviceMessenger> {
    devices: DeviceRegistry,
    modules: ModuleRegistry,
    store: S,
    coordinator: DeploymentCoordinator<M>,
    package_base_url: String,
}

impl<S: Persistence, M: DeviceMessenger> Orchestrator<S, M> {
    pub fn new(
        devices: DeviceRegistry,
        modules: ModuleRegistry,
        store: S,
        coordinator: DeploymentCoordinator<M>,
        package_base_url: impl Into<String>,
    ) -> Self {
        Self {
            devices,
            modules,
            store,
            coordinator,
            package_base_url: package_base_url.into(),
        }
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// Resolve `request` against the current registries and store the result.
    ///
    /// The manifest is built completely before anything is written, and the
    /// record (pinned sequence plus manifest) is stored with a single create.
    /// Returns the new deployment's id.
    pub async fn solve(&self, request: NewDeployment) -> Result<String, OrchestratorError> {
        let existing = self
            .store
            .read(Collection::Deployment, &Filter::eq("name", request.name.as_str()))
            .await?;
        if !existing.is_empty() {
            return Err(OrchestratorError::DuplicateDeploymentName(request.name));
        }

        let devices = self.devices.snapshot().await;
        let modules = self.modules.snapshot().await;
        ResolutionStarted {
            deployment: &request.name,
            steps: request.sequence.len(),
            known_devices: devices.len(),
        }
        .log();

        let id = Uuid::new_v4().to_string();
        let solved = resolve(&request.sequence, &devices, &modules).and_then(|resolved| {
            build_manifest(&resolved, &id, &self.package_base_url).map(|m| (resolved, m))
        });
        let (resolved, manifest) = match solved {
            Ok(solved) => solved,
            Err(error) => {
                ResolutionFailed {
                    deployment: &request.name,
                    error: &error,
                }
                .log();
                return Err(error.into());
            }
        };

        let deployment = Deployment {
            id,
            name: request.name,
            sequence: resolved.iter().map(|step| step.to_step()).collect(),
            full_manifest: Some(manifest),
        };
        let record =
            serde_json::to_value(&deployment).map_err(|e| OrchestratorError::CorruptRecord {
                kind: "deployment",
                reason: e.to_string(),
            })?;
        self.store.create(Collection::Deployment, vec![record]).await?;

        Ok(deployment.id)
    }

    pub async fn deployment(&self, id: &str) -> Result<Deployment, OrchestratorError> {
        let record = self
            .store
            .read(Collection::Deployment, &Filter::eq("id", id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OrchestratorError::DeploymentNotFound(id.to_string()))?;
        serde_json::from_value(record).map_err(|e| OrchestratorError::CorruptRecord {
            kind: "deployment",
            reason: e.to_string(),
        })
    }

    pub async fn deployments(&self) -> Result<Vec<Deployment>, OrchestratorError> {
        self.store
            .read(Collection::Deployment, &Filter::all())
            .await?
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| OrchestratorError::CorruptRecord {
                    kind: "deployment",
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Ship a stored deployment's manifest to its devices.
    pub async fn deploy(&self, id: &str) -> Result<DeployReport, OrchestratorError> {
        let deployment = self.deployment(id).await?;
        let manifest = deployment
            .full_manifest
            .as_ref()
            .ok_or_else(|| DispatchError::NoEntryPoint {
                deployment: deployment.id.clone(),
            })?;
        let devices = self.devices.snapshot().await;
        Ok(self
            .coordinator
            .deploy(&deployment.id, manifest, &devices)
            .await?)
    }

    /// Start a stored deployment by messaging its entry device.
    pub async fn execute(
        &self,
        id: &str,
        inputs: &ExecutionInputs,
    ) -> Result<ExecutionResponse, OrchestratorError> {
        let deployment = self.deployment(id).await?;
        Ok(self.coordinator.start_execution(&deployment, inputs).await?)
    }

    /// Remove every stored deployment. Returns how many were removed.
    pub async fn delete_deployments(&self) -> Result<usize, OrchestratorError> {
        Ok(self
            .store
            .delete(Collection::Deployment, &Filter::all())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::errors::MatchError;
    use crate::model::{Device, SequenceStep};
    use crate::store::MemoryStore;
    use crate::traits::{DeviceResponse, ExecutionRequest};
    use crate::utils::fixtures::{device, module};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMessenger {
        executions: Mutex<Vec<ExecutionRequest>>,
    }

    #[async_trait]
    impl DeviceMessenger for FakeMessenger {
        async fn post_json(
            &self,
            _device: &Device,
            _path: &str,
            _body: &Value,
        ) -> Result<DeviceResponse, DispatchError> {
            Ok(DeviceResponse {
                status: 200,
                body: json!({ "status": "success" }),
            })
        }

        async fn send_execution(
            &self,
            request: ExecutionRequest,
        ) -> Result<ExecutionResponse, DispatchError> {
            self.executions.lock().unwrap().push(request);
            Ok(ExecutionResponse {
                status: 200,
                content_type: Some("application/json".to_string()),
                body: b"42".to_vec(),
            })
        }
    }

    async fn orchestrator() -> Orchestrator<MemoryStore, FakeMessenger> {
        let devices = DeviceRegistry::with_devices(vec![
            device("d1", "10.0.0.1", &["camera"]),
            device("d2", "10.0.0.2", &[]),
        ]);
        let modules = ModuleRegistry::new();
        modules.insert(module("cam", &["take"], &["camera"])).await;
        modules.insert(module("math", &["add"], &[])).await;

        Orchestrator::new(
            devices,
            modules,
            MemoryStore::new(),
            DeploymentCoordinator::new(FakeMessenger::default(), &DispatchConfig::default()),
            "http://10.0.0.100:3000/",
        )
    }

    fn request(name: &str) -> NewDeployment {
        NewDeployment {
            name: name.to_string(),
            sequence: vec![SequenceStep::new("cam", "take"), SequenceStep::new("math", "add")],
        }
    }

    #[tokio::test]
    async fn test_solve_stores_pinned_sequence_and_manifest() {
        let orchestrator = orchestrator().await;
        let id = orchestrator.solve(request("pipeline")).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let stored = orchestrator.deployment(&id).await.unwrap();
        assert_eq!(stored.name, "pipeline");
        assert_eq!(
            stored.sequence,
            vec![
                SequenceStep::new("cam", "take").on_device("d1"),
                SequenceStep::new("math", "add").on_device("d1"),
            ]
        );
        let manifest = stored.full_manifest.unwrap();
        assert_eq!(manifest["d1"].deployment_id, id);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let orchestrator = orchestrator().await;
        orchestrator.solve(request("pipeline")).await.unwrap();
        let second = orchestrator.solve(request("pipeline")).await;
        assert!(matches!(second, Err(OrchestratorError::DuplicateDeploymentName(name)) if name == "pipeline"));
    }

    #[tokio::test]
    async fn test_failed_solve_stores_nothing() {
        let orchestrator = orchestrator().await;
        let bad = NewDeployment {
            name: "bad".to_string(),
            sequence: vec![SequenceStep::new("cam", "take").on_device("d2")],
        };
        let result = orchestrator.solve(bad).await;
        assert!(matches!(
            result,
            Err(OrchestratorError::Match(MatchError::CapabilityMismatch { .. }))
        ));
        assert!(orchestrator.deployments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deploy_and_execute() {
        let orchestrator = orchestrator().await;
        let id = orchestrator.solve(request("pipeline")).await.unwrap();

        let report = orchestrator.deploy(&id).await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.outcomes.len(), 1);

        // The entry function is `take`, whose endpoint wants `a` and `b`.
        let inputs = ExecutionInputs::default().with_param("a", 1).with_param("b", 2);
        let response = orchestrator.execute(&id, &inputs).await.unwrap();
        assert_eq!(response.body, b"42".to_vec());

        let executions = orchestrator.coordinator.messenger().executions.lock().unwrap();
        assert_eq!(executions.len(), 1);
        assert_eq!(executions[0].device, "d1");
        assert_eq!(executions[0].url.path(), format!("/{}/modules/cam_mod/take", id));
    }

    #[tokio::test]
    async fn test_missing_and_deleted_deployments() {
        let orchestrator = orchestrator().await;
        assert!(matches!(
            orchestrator.deploy("nope").await,
            Err(OrchestratorError::DeploymentNotFound(_))
        ));

        orchestrator.solve(request("one")).await.unwrap();
        orchestrator.solve(request("two")).await.unwrap();
        assert_eq!(orchestrator.delete_deployments().await.unwrap(), 2);
        assert!(orchestrator.deployments().await.unwrap().is_empty());
    }
}
