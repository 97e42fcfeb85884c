// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shipping manifests to devices and starting executions.
//!
//! Deployment is a best-effort fan-out: every device gets its manifest
//! concurrently, each request bounded by the configured timeout, and the
//! caller receives every device's outcome. Nothing is rolled back when some
//! devices fail.

mod deploy;
mod execution;
mod messenger;


pub use deploy::{DeployReport, DeviceOutcome};
pub use execution::{build_execution_request, ExecutionInputs};
pub use messenger::HttpMessenger;

use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::Instrument;

use crate::config::DispatchConfig;
use crate::errors::DispatchError;
use crate::model::{Deployment, Device, Manifest};
use crate::observability::messages::deployment::{
    DeviceDispatchFailed, DispatchCompleted, DispatchStarted, ExecutionRequested,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{DeviceMessenger, ExecutionResponse};

pub struct DeploymentCoordinator<M: DeviceMessenger> {
    messenger: M,
    deploy_path: String,
    timeout: Duration,
}

impl<M: DeviceMessenger> DeploymentCoordinator<M> {
    pub fn new(messenger: M, config: &DispatchConfig) -> Self {
        Self {
            messenger,
            deploy_path: config.deploy_path.clone(),
            timeout: config.request_timeout(),
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// POST each device its node of `manifest` and collect every outcome.
    ///
    /// All devices are looked up before anything is sent, so an unknown device
    /// fails the whole call without side effects.
    pub async fn deploy(
        &self,
        deployment_id: &str,
        manifest: &Manifest,
        devices: &[Device],
    ) -> Result<DeployReport, DispatchError> {
        let mut targets = Vec::with_capacity(manifest.len());
        for (device_id, node) in manifest {
            let device = devices
                .iter()
                .find(|d| &d.id == device_id)
                .ok_or_else(|| DispatchError::DeviceNotFound {
                    device: device_id.clone(),
                })?;
            let body = serde_json::to_value(node).map_err(|e| DispatchError::Transport {
                target: device_id.clone(),
                reason: format!("failed to encode manifest: {}", e),
            })?;
            targets.push((device, body));
        }

        let started = DispatchStarted {
            deployment_id,
            devices: targets.len(),
            timeout: self.timeout,
        };
        started.log();
        let span = started.span("deploy");
        let start = Instant::now();

        let sends = targets.iter().map(|(device, body)| async move {
            let outcome = match timeout(
                self.timeout,
                self.messenger.post_json(device, &self.deploy_path, body),
            )
            .await
            {
                Ok(Ok(response)) => DeviceOutcome::Responded {
                    status: response.status,
                    body: response.body,
                },
                Ok(Err(e)) => DeviceOutcome::Failed {
                    reason: e.to_string(),
                },
                Err(_) => DeviceOutcome::Failed {
                    reason: DispatchError::Timeout {
                        target: device.id.clone(),
                        timeout: self.timeout,
                    }
                    .to_string(),
                },
            };
            if !outcome.is_success() {
                DeviceDispatchFailed {
                    device: &device.id,
                    reason: &outcome.to_string(),
                }
                .log();
            }
            (device.id.clone(), outcome)
        });
        let outcomes: BTreeMap<String, DeviceOutcome> =
            join_all(sends).instrument(span).await.into_iter().collect();

        let report = DeployReport {
            deployment_id: deployment_id.to_string(),
            outcomes,
        };
        DispatchCompleted {
            deployment_id,
            devices: report.outcomes.len(),
            failed: report.failed_devices().len(),
            duration: start.elapsed(),
        }
        .log();

        Ok(report)
    }

    /// Send the single request that starts `deployment` and hand back the
    /// entry device's response untouched.
    pub async fn start_execution(
        &self,
        deployment: &Deployment,
        inputs: &ExecutionInputs,
    ) -> Result<ExecutionResponse, DispatchError> {
        let request = build_execution_request(deployment, inputs)?;
        let target = request.url.to_string();

        let requested = ExecutionRequested {
            deployment_id: &deployment.id,
            device: &request.device,
            method: request.method.as_str(),
            url: &target,
        };
        requested.log();
        let span = requested.span("start_execution");

        let send = timeout(self.timeout, self.messenger.send_execution(request));
        match send.instrument(span).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout {
                target,
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeploymentNode, SequenceStep};
    use crate::solver::{build_manifest, resolve};
    use crate::traits::{DeviceResponse, ExecutionRequest};
    use crate::utils::fixtures::{device, module};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<String>>,
        slow: Vec<String>,
        rejecting: Vec<String>,
    }

    #[async_trait]
    impl DeviceMessenger for RecordingMessenger {
        async fn post_json(
            &self,
            device: &Device,
            path: &str,
            body: &Value,
        ) -> Result<DeviceResponse, DispatchError> {
            assert_eq!(path, "/deploy");
            assert!(body.get("deploymentId").is_some());
            self.sent.lock().unwrap().push(device.id.clone());
            if self.slow.contains(&device.id) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            let status = if self.rejecting.contains(&device.id) { 500 } else { 200 };
            Ok(DeviceResponse {
                status,
                body: json!({ "device": device.id }),
            })
        }

        async fn send_execution(
            &self,
            _request: ExecutionRequest,
        ) -> Result<ExecutionResponse, DispatchError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            unreachable!("the coordinator times out first")
        }
    }

    fn coordinator(messenger: RecordingMessenger) -> DeploymentCoordinator<RecordingMessenger> {
        DeploymentCoordinator {
            messenger,
            deploy_path: "/deploy".to_string(),
            timeout: Duration::from_millis(100),
        }
    }

    fn manifest(devices: &[&str]) -> Manifest {
        devices
            .iter()
            .map(|d| (d.to_string(), DeploymentNode::new("dep")))
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_device_fails_before_sending() {
        let coordinator = coordinator(RecordingMessenger::default());
        let devices = vec![device("a", "10.0.0.1", &[])];

        let result = coordinator.deploy("dep", &manifest(&["a", "zz"]), &devices).await;
        assert!(matches!(result, Err(DispatchError::DeviceNotFound { device }) if device == "zz"));
        assert!(coordinator.messenger().sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcomes_for_every_device() {
        let messenger = RecordingMessenger {
            slow: vec!["b".to_string()],
            rejecting: vec!["c".to_string()],
            ..Default::default()
        };
        let coordinator = coordinator(messenger);
        let devices = vec![
            device("a", "10.0.0.1", &[]),
            device("b", "10.0.0.2", &[]),
            device("c", "10.0.0.3", &[]),
        ];

        let report = coordinator
            .deploy("dep", &manifest(&["a", "b", "c"]), &devices)
            .await
            .unwrap();

        assert_eq!(coordinator.messenger().sent.lock().unwrap().len(), 3);
        assert!(report.outcomes["a"].is_success());
        assert!(matches!(&report.outcomes["b"], DeviceOutcome::Failed { reason } if reason.contains("timed out")));
        assert!(matches!(report.outcomes["c"], DeviceOutcome::Responded { status: 500, .. }));
        assert_eq!(report.failed_devices(), vec!["b".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_unsolved_deployment_has_no_entry_point() {
        let coordinator = coordinator(RecordingMessenger::default());
        let deployment = Deployment {
            id: "dep".to_string(),
            name: "n".to_string(),
            sequence: vec![],
            full_manifest: None,
        };
        let result = coordinator
            .start_execution(&deployment, &ExecutionInputs::default())
            .await;
        assert!(matches!(result, Err(DispatchError::NoEntryPoint { .. })));
    }

    #[tokio::test]
    async fn test_execution_is_bounded_by_timeout() {
        let devices = vec![device("a", "10.0.0.1", &[])];
        let modules = vec![module("m", &["add"], &[])];
        let resolved = resolve(&[SequenceStep::new("m", "add")], &devices, &modules).unwrap();
        let deployment = Deployment {
            id: "dep".to_string(),
            name: "n".to_string(),
            sequence: resolved.iter().map(|r| r.to_step()).collect(),
            full_manifest: Some(build_manifest(&resolved, "dep", "http://pkg/").unwrap()),
        };
        let inputs = ExecutionInputs::default().with_param("a", 1).with_param("b", 2);

        let result = coordinator(RecordingMessenger::default())
            .start_execution(&deployment, &inputs)
            .await;
        assert!(matches!(result, Err(DispatchError::Timeout { .. })));
    }
}
