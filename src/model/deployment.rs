// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{ApiDescription, Device, Module, PathItem};

/// A module's API description specialized to one device, deployment and function.
pub type EndpointDescription = ApiDescription;

/// Device id to the package of work that device receives.
pub type Manifest = BTreeMap<String, DeploymentNode>;

/// One call in a deployment's sequence. `device` is optional in requests and
/// always filled in once the deployment has been solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStep {
    #[serde(default)]
    pub device: Option<String>,
    pub module: String,
    pub func: String,
}

impl SequenceStep {
    pub fn new(module: impl Into<String>, func: impl Into<String>) -> Self {
        Self {
            device: None,
            module: module.into(),
            func: func.into(),
        }
    }

    pub fn on_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

/// A deployment request as submitted, before it has an id or a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeployment {
    pub name: String,
    pub sequence: Vec<SequenceStep>,
}

/// A solved deployment as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub name: String,
    pub sequence: Vec<SequenceStep>,
    #[serde(default)]
    pub full_manifest: Option<Manifest>,
}

/// A sequence step matched to concrete registry entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStep {
    pub device: Device,
    pub module: Module,
    pub func: String,
}

impl ResolvedStep {
    /// The step as it is stored after solving: ids only, device pinned.
    pub fn to_step(&self) -> SequenceStep {
        SequenceStep {
            device: Some(self.device.id.clone()),
            module: self.module.id.clone(),
            func: self.func.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUrls {
    pub binary: String,
    pub description: String,
    pub other: Vec<String>,
}

/// What a device needs in order to fetch a module from the package server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleData {
    pub id: String,
    pub name: String,
    pub urls: ModuleUrls,
}

/// How a device reacts to a call of one of its functions: which paths it
/// serves and where the result is forwarded to (`None` ends the chain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub source_paths: BTreeMap<String, PathItem>,
    pub forward_to: Option<EndpointDescription>,
}

/// Everything a single device needs for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentNode {
    /// Separates requests of different deployments at the supervisor.
    pub deployment_id: String,
    pub modules: Vec<ModuleData>,
    pub endpoints: BTreeMap<String, EndpointDescription>,
    /// module name -> function name -> instruction
    pub instructions: BTreeMap<String, BTreeMap<String, Instruction>>,
}

impl DeploymentNode {
    pub fn new(deployment_id: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            modules: Vec::new(),
            endpoints: BTreeMap::new(),
            instructions: BTreeMap::new(),
        }
    }

    /// Add module data unless the device already fetches that module.
    pub fn add_module(&mut self, data: ModuleData) {
        if !self.modules.iter().any(|m| m.id == data.id) {
            self.modules.push(data);
        }
    }

    pub fn add_instruction(&mut self, module_name: &str, func: &str, instruction: Instruction) {
        self.instructions
            .entry(module_name.to_string())
            .or_default()
            .insert(func.to_string(), instruction);
    }

    pub fn instruction(&self, module_name: &str, func: &str) -> Option<&Instruction> {
        self.instructions.get(module_name)?.get(func)
    }
}
