// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use reqwest::Url;
use serde_json::{Map, Value};

use crate::errors::{DispatchError, ParameterLocationHint};
use crate::model::{Deployment, ParameterLocation};
use crate::traits::{ExecutionBody, ExecutionRequest, FileInput, HttpMethod};

/// Inputs supplied by whoever starts an execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionInputs {
    pub params: Map<String, Value>,
    pub file: Option<FileInput>,
}

impl ExecutionInputs {
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, file: FileInput) -> Self {
        self.file = Some(file);
        self
    }
}

/// Build the one request that starts a deployment: a call of the first
/// step's function on the first step's device, shaped by that endpoint's
/// description.
pub fn build_execution_request(
    deployment: &Deployment,
    inputs: &ExecutionInputs,
) -> Result<ExecutionRequest, DispatchError> {
    let no_entry = || DispatchError::NoEntryPoint {
        deployment: deployment.id.clone(),
    };
    let entry = deployment.sequence.first().ok_or_else(no_entry)?;
    let device = entry.device.as_deref().ok_or_else(no_entry)?;
    let manifest = deployment.full_manifest.as_ref().ok_or_else(no_entry)?;

    let endpoint_missing = || DispatchError::EndpointMissing {
        device: device.to_string(),
        func: entry.func.clone(),
    };
    let node = manifest.get(device).ok_or_else(|| DispatchError::DeviceNotFound {
        device: device.to_string(),
    })?;
    let endpoint = node.endpoints.get(&entry.func).ok_or_else(endpoint_missing)?;
    let server = endpoint.servers.first().ok_or_else(endpoint_missing)?;
    let (path_template, item) = endpoint.paths.iter().next().ok_or_else(endpoint_missing)?;
    let (method, operation) = item.operation().ok_or_else(endpoint_missing)?;

    let mut path = path_template.clone();
    let mut query = Vec::new();
    for parameter in &operation.parameters {
        let supplied = inputs.params.get(&parameter.name);
        // Path parameters are always required, a hole in the path cannot be skipped.
        if supplied.is_none()
            && !parameter.required
            && parameter.location != ParameterLocation::Path
        {
            continue;
        }
        let hint = match parameter.location {
            ParameterLocation::Path => ParameterLocationHint::Path,
            ParameterLocation::Query => ParameterLocationHint::Query,
            other => {
                return Err(DispatchError::UnsupportedParameterLocation {
                    name: parameter.name.clone(),
                    location: other.as_str().to_string(),
                })
            }
        };
        let value = supplied.ok_or_else(|| DispatchError::ParameterMissing {
            name: parameter.name.clone(),
            location: hint,
        })?;
        match hint {
            ParameterLocationHint::Path => {
                path = path.replace(&format!("{{{}}}", parameter.name), &value_to_text(value));
            }
            _ => query.push((parameter.name.as_str(), value_to_text(value))),
        }
    }

    let mut url = Url::parse(&server.url).map_err(|e| DispatchError::InvalidUrl {
        url: server.url.clone(),
        reason: e.to_string(),
    })?;
    url.set_path(&path);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &query {
            pairs.append_pair(name, value);
        }
    }

    let (method, body) = if method == "get" {
        (HttpMethod::Get, ExecutionBody::Empty)
    } else if operation.expects_multipart() {
        let file = inputs.file.clone().ok_or_else(|| DispatchError::ParameterMissing {
            name: "file".to_string(),
            location: ParameterLocationHint::Body,
        })?;
        (
            HttpMethod::Post,
            ExecutionBody::Multipart {
                fields: inputs.params.clone(),
                file,
            },
        )
    } else {
        (HttpMethod::Post, ExecutionBody::Json(inputs.params.clone()))
    };

    Ok(ExecutionRequest {
        device: device.to_string(),
        method,
        url,
        body,
    })
}

/// Strings are sent without their JSON quotes, everything else as JSON text.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequenceStep;
    use crate::solver::{build_manifest, resolve};
    use crate::utils::fixtures::{device, module, module_with_api, openapi_json};
    use serde_json::json;

    fn solved(module: crate::model::Module, func: &str) -> Deployment {
        let devices = vec![device("d1", "10.0.0.1", &[])];
        let sequence = vec![SequenceStep::new(module.id.clone(), func)];
        let resolved = resolve(&sequence, &devices, &[module]).unwrap();
        Deployment {
            id: "dep".to_string(),
            name: "test".to_string(),
            sequence: resolved.iter().map(|r| r.to_step()).collect(),
            full_manifest: Some(build_manifest(&resolved, "dep", "http://pkg/").unwrap()),
        }
    }

    fn api_with_operation(func: &str, path_suffix: &str, operation: Value) -> Value {
        let mut api = openapi_json(&[func]);
        let mut paths = Map::new();
        paths.insert(
            format!("/{{deployment}}/modules/{{module}}/{}", path_suffix),
            json!({ "post": operation }),
        );
        api["paths"] = Value::Object(paths);
        api
    }

    #[test]
    fn test_get_with_query_parameters() {
        let deployment = solved(module("m", &["add"], &[]), "add");
        let inputs = ExecutionInputs::default().with_param("a", 1).with_param("b", "2");

        let request = build_execution_request(&deployment, &inputs).unwrap();
        assert_eq!(request.device, "d1");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "http://10.0.0.1:5000/dep/modules/m_mod/add?a=1&b=2"
        );
        assert_eq!(request.body, ExecutionBody::Empty);
    }

    #[test]
    fn test_request_errors() {
        struct TestCase {
            name: &'static str,
            deployment: Deployment,
            inputs: ExecutionInputs,
            check: fn(&DispatchError) -> bool,
        }

        let mut unsolved = solved(module("m", &["add"], &[]), "add");
        unsolved.full_manifest = None;

        let optional_path_api = api_with_operation(
            "fetch",
            "fetch/{index}",
            json!({ "parameters": [{ "name": "index", "in": "path" }] }),
        );
        let header_api = api_with_operation(
            "auth",
            "auth",
            json!({ "parameters": [{ "name": "token", "in": "header", "required": true }] }),
        );
        let multipart_api = api_with_operation(
            "gray",
            "gray",
            json!({
                "requestBody": {
                    "required": true,
                    "content": { "multipart/form-data": { "schema": { "type": "object" } } }
                }
            }),
        );

        let cases = vec![
            TestCase {
                name: "unsolved deployment",
                deployment: unsolved,
                inputs: ExecutionInputs::default(),
                check: |e| matches!(e, DispatchError::NoEntryPoint { .. }),
            },
            TestCase {
                name: "missing query argument",
                deployment: solved(module("m", &["add"], &[]), "add"),
                inputs: ExecutionInputs::default().with_param("a", 1),
                check: |e| {
                    matches!(e, DispatchError::ParameterMissing { name, location: ParameterLocationHint::Query } if name == "b")
                },
            },
            TestCase {
                name: "path parameter not marked required",
                deployment: solved(
                    module_with_api("p", &["fetch"], &[], optional_path_api),
                    "fetch",
                ),
                inputs: ExecutionInputs::default(),
                check: |e| {
                    matches!(e, DispatchError::ParameterMissing { name, location: ParameterLocationHint::Path } if name == "index")
                },
            },
            TestCase {
                name: "header parameter",
                deployment: solved(module_with_api("h", &["auth"], &[], header_api), "auth"),
                inputs: ExecutionInputs::default().with_param("token", "t"),
                check: |e| {
                    matches!(e, DispatchError::UnsupportedParameterLocation { location, .. } if location == "header")
                },
            },
            TestCase {
                name: "multipart without file",
                deployment: solved(module_with_api("g", &["gray"], &[], multipart_api), "gray"),
                inputs: ExecutionInputs::default(),
                check: |e| {
                    matches!(e, DispatchError::ParameterMissing { name, location: ParameterLocationHint::Body } if name == "file")
                },
            },
        ];

        for case in cases {
            match build_execution_request(&case.deployment, &case.inputs) {
                Err(e) => assert!((case.check)(&e), "{}: unexpected error {:?}", case.name, e),
                Ok(r) => panic!("{}: expected an error, got {:?}", case.name, r),
            }
        }
    }

    #[test]
    fn test_optional_parameters_may_be_left_out() {
        struct TestCase {
            name: &'static str,
            inputs: ExecutionInputs,
            expected_query: Option<&'static str>,
        }

        let mut api = openapi_json(&["add"]);
        api["paths"]["/{deployment}/modules/{module}/add"]["get"]["parameters"] = json!([
            { "name": "a", "in": "query", "required": true },
            { "name": "b", "in": "query", "required": false },
            { "name": "trace", "in": "header" }
        ]);
        let deployment = solved(module_with_api("m", &["add"], &[], api), "add");

        let cases = vec![
            TestCase {
                name: "optional query parameter omitted",
                inputs: ExecutionInputs::default().with_param("a", 1),
                expected_query: Some("a=1"),
            },
            TestCase {
                name: "optional query parameter supplied",
                inputs: ExecutionInputs::default().with_param("a", 1).with_param("b", 2),
                expected_query: Some("a=1&b=2"),
            },
        ];

        for case in cases {
            let request = build_execution_request(&deployment, &case.inputs)
                .unwrap_or_else(|e| panic!("{}: unexpected error {:?}", case.name, e));
            assert_eq!(request.url.query(), case.expected_query, "{}", case.name);
        }

        let missing = build_execution_request(&deployment, &ExecutionInputs::default());
        assert!(matches!(
            missing,
            Err(DispatchError::ParameterMissing { ref name, location: ParameterLocationHint::Query }) if name == "a"
        ));
    }

    #[test]
    fn test_path_parameter_and_json_body() {
        let api = api_with_operation(
            "fetch",
            "fetch/{index}",
            json!({ "parameters": [{ "name": "index", "in": "path", "required": true }] }),
        );
        let deployment = solved(module_with_api("s", &["fetch"], &[], api), "fetch");
        let inputs = ExecutionInputs::default().with_param("index", 7);

        let request = build_execution_request(&deployment, &inputs).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.path(), "/dep/modules/s_mod/fetch/7");
        assert_eq!(request.body, ExecutionBody::Json(inputs.params.clone()));
    }

    #[test]
    fn test_multipart_with_file() {
        let api = api_with_operation(
            "gray",
            "gray",
            json!({
                "requestBody": {
                    "content": { "multipart/form-data": {} }
                }
            }),
        );
        let deployment = solved(module_with_api("g", &["gray"], &[], api), "gray");
        let file = FileInput {
            file_name: "img.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        };
        let inputs = ExecutionInputs::default()
            .with_param("mode", "fast")
            .with_file(file.clone());

        let request = build_execution_request(&deployment, &inputs).unwrap();
        match request.body {
            ExecutionBody::Multipart { fields, file: sent } => {
                assert_eq!(fields["mode"], json!("fast"));
                assert_eq!(sent, file);
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }
}
