// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared builders for devices and modules used across test modules.

use serde_json::{json, Value};

use crate::model::{ApiDescription, Communication, Device, DeviceDescription, Module};

pub(crate) fn device(id: &str, address: &str, interfaces: &[&str]) -> Device {
    undescribed_device(id, address).with_description(DeviceDescription {
        platform: "linux".to_string(),
        architecture: "aarch64".to_string(),
        supervisor_interfaces: interfaces.iter().map(|i| i.to_string()).collect(),
        peripherals: vec![],
    })
}

pub(crate) fn undescribed_device(id: &str, address: &str) -> Device {
    Device::new(
        id,
        Communication {
            addresses: vec![address.to_string()],
            port: 5000,
        },
    )
}

/// API description template exposing each function as
/// `GET /{deployment}/modules/{module}/<func>?a=..&b=..`.
pub(crate) fn openapi_json(funcs: &[&str]) -> Value {
    let mut paths = serde_json::Map::new();
    for func in funcs {
        paths.insert(
            format!("/{{deployment}}/modules/{{module}}/{}", func),
            json!({
                "parameters": [
                    { "name": "deployment", "in": "path", "required": true },
                    { "name": "module", "in": "path", "required": true }
                ],
                "get": {
                    "parameters": [
                        { "name": "a", "in": "query", "required": true },
                        { "name": "b", "in": "query", "required": true }
                    ],
                    "responses": { "200": { "description": "result" } }
                }
            }),
        );
    }
    json!({
        "openapi": "3.0.0",
        "info": { "title": "module", "version": "0.1.0" },
        "servers": [{
            "url": "http://{serverIp}:{port}",
            "variables": {
                "serverIp": { "default": "localhost" },
                "port": { "default": "5000" }
            }
        }],
        "paths": paths
    })
}

pub(crate) fn openapi(funcs: &[&str]) -> ApiDescription {
    serde_json::from_value(openapi_json(funcs)).unwrap()
}

pub(crate) fn module(id: &str, funcs: &[&str], requirements: &[&str]) -> Module {
    module_with_api(id, funcs, requirements, openapi_json(funcs))
}

pub(crate) fn module_with_api(
    id: &str,
    funcs: &[&str],
    requirements: &[&str],
    api: Value,
) -> Module {
    let exports: Vec<Value> = funcs
        .iter()
        .map(|f| json!({ "name": f, "parameters": ["i32", "i32"], "result": "i32" }))
        .collect();
    let requirements: Vec<Value> = requirements.iter().map(|r| json!({ "name": r })).collect();
    serde_json::from_value(json!({
        "id": id,
        "name": format!("{}_mod", id),
        "exports": exports,
        "requirements": requirements,
        "openapi": api
    }))
    .unwrap()
}
