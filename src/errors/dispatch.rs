// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::coordinator::DeviceOutcome;

/// Where an execution input was expected to be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocationHint {
    Path,
    Query,
    Body,
}

impl fmt::Display for ParameterLocationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match self {
            ParameterLocationHint::Path => "path",
            ParameterLocationHint::Query => "query",
            ParameterLocationHint::Body => "body",
        };
        f.write_str(location)
    }
}

/// Errors for shipping manifests to devices and starting executions.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    /// The manifest or deployment references a device the registry does not know
    #[error("Device '{device}' not found")]
    DeviceNotFound { device: String },

    /// The deployment has not been solved or has an empty sequence
    #[error("Deployment '{deployment}' has no entry point")]
    NoEntryPoint { deployment: String },

    /// The entry device's node has no endpoint for the entry function
    #[error("Device '{device}' exposes no endpoint for function '{func}'")]
    EndpointMissing { device: String, func: String },

    /// A parameter declared by the entry endpoint was not supplied
    #[error("Missing argument '{name}' (expected in {location})")]
    ParameterMissing {
        name: String,
        location: ParameterLocationHint,
    },

    /// The endpoint declares a parameter in a location that cannot be filled
    #[error("Parameter '{name}' location not supported: '{location}'")]
    UnsupportedParameterLocation { name: String, location: String },

    /// At least one device did not accept its manifest
    #[error("Deployment failed on {} device(s): {}", failed.len(), failed.join(", "))]
    DeploymentDispatchFailed {
        failed: Vec<String>,
        outcomes: BTreeMap<String, DeviceOutcome>,
    },

    /// The request did not complete in time
    #[error("Request to {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },

    /// Transport level failure talking to a device
    #[error("Request to {target} failed: {reason}")]
    Transport { target: String, reason: String },

    /// A device URL could not be built
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
