// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The subset of an OpenAPI document a module ships as its API description.
//!
//! Only the parts the orchestrator reads or rewrites are typed. Everything else
//! (`info`, `responses`, `components`, ...) is carried through untouched in the
//! flattened `extra` maps so devices receive the document the module author wrote.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    pub servers: Vec<Server>,
    pub paths: BTreeMap<String, PathItem>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, ServerVariable>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation on the path. In templates these
    /// declare `{deployment}` and `{module}`, which are filled at solve time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PathItem {
    /// The operation used to call the function: `get` when declared, else `post`.
    pub fn operation(&self) -> Option<(&'static str, &Operation)> {
        self.get
            .as_ref()
            .map(|op| ("get", op))
            .or_else(|| self.post.as_ref().map(|op| ("post", op)))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Operation {
    /// True when the request body must be sent as `multipart/form-data`.
    pub fn expects_multipart(&self) -> bool {
        self.request_body
            .as_ref()
            .map(|body| body.content.contains_key(MULTIPART_FORM_DATA))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Templates in the wild omit `in`; such parameters are treated as query parameters.
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    #[default]
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let doc = json!({
            "openapi": "3.1.0",
            "info": { "title": "primitive", "version": "0.0.1" },
            "servers": [{ "url": "http://{serverIp}:{port}" }],
            "paths": {
                "/{deployment}/modules/{module}/add1": {
                    "get": {
                        "parameters": [{ "name": "param0", "in": "query", "required": true }],
                        "responses": { "200": { "description": "sum" } }
                    }
                }
            }
        });
        let parsed: ApiDescription = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(parsed.extra.get("openapi"), Some(&json!("3.1.0")));
        let op = parsed.paths["/{deployment}/modules/{module}/add1"]
            .get
            .as_ref()
            .unwrap();
        assert!(op.extra.contains_key("responses"));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), doc);
    }

    #[test]
    fn test_get_is_preferred_over_post() {
        let item = PathItem {
            get: Some(Operation::default()),
            post: Some(Operation::default()),
            ..Default::default()
        };
        assert_eq!(item.operation().map(|(m, _)| m), Some("get"));

        let post_only = PathItem {
            post: Some(Operation::default()),
            ..Default::default()
        };
        assert_eq!(post_only.operation().map(|(m, _)| m), Some("post"));
        assert!(PathItem::default().operation().is_none());
    }

    #[test]
    fn test_missing_parameter_location_defaults_to_query() {
        let p: Parameter = serde_json::from_value(json!({ "name": "number" })).unwrap();
        assert_eq!(p.location, ParameterLocation::Query);
        assert!(!p.required);
    }
}
