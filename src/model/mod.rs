// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed records for devices, modules and deployments.
//!
//! Fields that may legitimately be absent (a device whose description has not
//! been fetched yet, an unsolved deployment) are explicit `Option`s; everything
//! else is validated by serde when a record is constructed.

mod api;
mod deployment;
mod device;
mod module;

pub use api::{
    ApiDescription, MediaType, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    Server, ServerVariable, MULTIPART_FORM_DATA,
};
pub use deployment::{
    Deployment, DeploymentNode, EndpointDescription, Instruction, Manifest, ModuleData,
    ModuleUrls, NewDeployment, ResolvedStep, SequenceStep,
};
pub use device::{Communication, Device, DeviceDescription};
pub use module::{FunctionExport, Module, Requirement, ValueKind};
