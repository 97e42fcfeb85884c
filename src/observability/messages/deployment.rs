// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for deployment resolution and dispatch:
//! * matching sequence steps to devices
//! * manifest construction
//! * manifest fan-out and execution start

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Resolution of a deployment sequence started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use wasm_fleet::observability::messages::deployment::ResolutionStarted;
///
/// let msg = ResolutionStarted {
///     deployment: "camera-pipeline",
///     steps: 3,
///     known_devices: 5,
/// };
///
/// assert!(msg.to_string().contains("3 steps"));
/// ```
pub struct ResolutionStarted<'a> {
    pub deployment: &'a str,
    pub steps: usize,
    pub known_devices: usize,
}

impl Display for ResolutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolving deployment '{}': {} steps against {} known devices",
            self.deployment, self.steps, self.known_devices
        )
    }
}

impl StructuredLog for ResolutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            deployment = self.deployment,
            steps = self.steps,
            known_devices = self.known_devices,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resolution",
            span_name = name,
            deployment = self.deployment,
            steps = self.steps,
        )
    }
}

/// A step was matched to a device.
///
/// # Log Level
/// `debug!` - Per-step detail
pub struct DeviceSelected<'a> {
    pub step: usize,
    pub device: &'a str,
    pub module: &'a str,
    pub func: &'a str,
    pub pinned: bool,
}

impl Display for DeviceSelected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let how = if self.pinned { "pinned" } else { "selected" };
        write!(
            f,
            "Step {}: {} device '{}' for {}::{}",
            self.step, how, self.device, self.module, self.func
        )
    }
}

impl StructuredLog for DeviceSelected<'_> {
    fn log(&self) {
        tracing::debug!(
            step = self.step,
            device = self.device,
            module = self.module,
            func = self.func,
            pinned = self.pinned,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "device_selected",
            span_name = name,
            step = self.step,
            device = self.device,
        )
    }
}

/// Manifest construction finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ManifestBuilt<'a> {
    pub deployment_id: &'a str,
    pub devices: usize,
    pub steps: usize,
}

impl Display for ManifestBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built manifest for deployment '{}': {} steps over {} devices",
            self.deployment_id, self.steps, self.devices
        )
    }
}

impl StructuredLog for ManifestBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            deployment_id = self.deployment_id,
            devices = self.devices,
            steps = self.steps,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "manifest_built",
            span_name = name,
            deployment_id = self.deployment_id,
            devices = self.devices,
        )
    }
}

/// Resolution or manifest construction failed.
///
/// # Log Level
/// `error!` - The deployment request is rejected
pub struct ResolutionFailed<'a> {
    pub deployment: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed constructing manifest for deployment '{}': {}",
            self.deployment, self.error
        )
    }
}

impl StructuredLog for ResolutionFailed<'_> {
    fn log(&self) {
        tracing::error!(deployment = self.deployment, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "resolution_failed",
            span_name = name,
            deployment = self.deployment,
            error = %self.error,
        )
    }
}

/// Manifests are being sent to devices.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DispatchStarted<'a> {
    pub deployment_id: &'a str,
    pub devices: usize,
    pub timeout: Duration,
}

impl Display for DispatchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deploying '{}' to {} devices (timeout {:?} per device)",
            self.deployment_id, self.devices, self.timeout
        )
    }
}

impl StructuredLog for DispatchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            deployment_id = self.deployment_id,
            devices = self.devices,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            deployment_id = self.deployment_id,
            devices = self.devices,
        )
    }
}

/// One device did not accept its manifest.
///
/// # Log Level
/// `warn!` - Surfaced to the caller in the aggregate report
pub struct DeviceDispatchFailed<'a> {
    pub device: &'a str,
    pub reason: &'a str,
}

impl Display for DeviceDispatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deploying to device '{}' failed: {}", self.device, self.reason)
    }
}

impl StructuredLog for DeviceDispatchFailed<'_> {
    fn log(&self) {
        tracing::warn!(device = self.device, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("device_dispatch_failed", span_name = name, device = self.device)
    }
}

/// Every device answered (or timed out).
///
/// # Log Level
/// `info!` - Important operational event
pub struct DispatchCompleted<'a> {
    pub deployment_id: &'a str,
    pub devices: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl Display for DispatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deployment '{}' dispatched to {} devices in {:?}: {} failed",
            self.deployment_id, self.devices, self.duration, self.failed
        )
    }
}

impl StructuredLog for DispatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            deployment_id = self.deployment_id,
            devices = self.devices,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch_completed",
            span_name = name,
            deployment_id = self.deployment_id,
            failed = self.failed,
        )
    }
}

/// The entry device of a deployment is being called.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionRequested<'a> {
    pub deployment_id: &'a str,
    pub device: &'a str,
    pub method: &'a str,
    pub url: &'a str,
}

impl Display for ExecutionRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting deployment '{}' on device '{}': {} {}",
            self.deployment_id,
            self.device,
            self.method.to_uppercase(),
            self.url
        )
    }
}

impl StructuredLog for ExecutionRequested<'_> {
    fn log(&self) {
        tracing::info!(
            deployment_id = self.deployment_id,
            device = self.device,
            method = self.method,
            url = self.url,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            deployment_id = self.deployment_id,
            device = self.device,
        )
    }
}
