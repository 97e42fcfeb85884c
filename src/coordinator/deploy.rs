// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::DispatchError;

/// How a single device reacted to its manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DeviceOutcome {
    /// The device answered; any status, including errors
    Responded { status: u16, body: serde_json::Value },
    /// No answer: transport failure or timeout
    Failed { reason: String },
}

impl DeviceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeviceOutcome::Responded { status, .. } if (200..300).contains(status))
    }
}

impl fmt::Display for DeviceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceOutcome::Responded { status, .. } => write!(f, "responded {}", status),
            DeviceOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Per-device outcomes of shipping one deployment's manifests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployReport {
    pub deployment_id: String,
    pub outcomes: BTreeMap<String, DeviceOutcome>,
}

impl DeployReport {
    /// Devices that did not accept their manifest, in id order.
    pub fn failed_devices(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(device, _)| device.clone())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(DeviceOutcome::is_success)
    }

    /// Turn a partially failed deployment into an error carrying every
    /// outcome. Devices that did accept keep their manifest; nothing is undone.
    pub fn into_accepted(self) -> Result<Self, DispatchError> {
        let failed = self.failed_devices();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(DispatchError::DeploymentDispatchFailed {
                failed,
                outcomes: self.outcomes,
            })
        }
    }
}
