// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::model::ApiDescription;

/// WebAssembly value types a function may take or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    I32,
    I64,
    F32,
    F64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionExport {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ValueKind>,
    #[serde(default)]
    pub result: Option<ValueKind>,
}

/// An interface the hosting device's supervisor must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl Requirement {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            module: None,
        }
    }
}

/// An uploaded WebAssembly module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub name: String,
    pub exports: Vec<FunctionExport>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Stored file name of the `.wasm` binary, once uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    /// Names of auxiliary files (models, lookup tables) served next to the binary.
    #[serde(default)]
    pub data_files: Vec<String>,
    pub openapi: ApiDescription,
}

impl Module {
    pub fn export(&self, func: &str) -> Option<&FunctionExport> {
        self.exports.iter().find(|e| e.name == func)
    }

    /// Names of the interfaces a device must provide to host this module.
    pub fn required_interfaces(&self) -> impl Iterator<Item = &str> {
        self.requirements.iter().map(|r| r.name.as_str())
    }
}
