// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for matching a deployment sequence to devices and building its manifest.
//!
//! Every variant is fatal to the single resolution request that produced it and
//! carries enough context (step index, device, module) for the caller to act on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// The step names a module that is not in the module registry
    #[error("Step {step}: module '{module}' does not exist")]
    ModuleNotFound { step: usize, module: String },

    /// The module does not export the requested function
    #[error("Step {step}: function '{func}' is not exported by module '{module}'")]
    FunctionNotFound {
        step: usize,
        module: String,
        func: String,
    },

    /// The step pins a device that is not in the device registry
    #[error("Step {step}: device '{device}' does not exist")]
    DeviceNotFound { step: usize, device: String },

    /// The pinned device does not provide every interface the module requires
    #[error(
        "Step {step}: device '{device}' does not satisfy the requirements of module '{module}' (missing: {})",
        missing.join(", ")
    )]
    CapabilityMismatch {
        step: usize,
        device: String,
        module: String,
        missing: Vec<String>,
    },

    /// No known device satisfies the module's requirements
    #[error(
        "Step {step}: no device satisfies all requirements of module '{module}': [{}]",
        requirements.join(", ")
    )]
    NoSuitableDevice {
        step: usize,
        module: String,
        requirements: Vec<String>,
    },

    /// Resolution produced a different number of triples than there were steps
    #[error("Resolved {resolved} steps for a sequence of {expected}")]
    SequenceLengthMismatch { expected: usize, resolved: usize },

    /// A device ended up in the manifest with nothing to serve
    #[error("No endpoints defined for device '{device}'")]
    EmptyEndpointsForDevice { device: String },

    /// The module's API description template cannot be specialized
    #[error("Module '{module}' has an unusable API description: {reason}")]
    EndpointTemplate { module: String, reason: String },

    /// A URL built from a template or the package base URL does not parse
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
