// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::errors::MatchError;
use crate::model::{EndpointDescription, PathItem, ResolvedStep};
use crate::utils::host_for_url;

/// Specialize the module's API description template for one resolved step.
///
/// The first server URL gets the device's first address and port, the path
/// template for the function gets the deployment id and module name, and
/// every other path is dropped. Template-only fields (server `variables`,
/// path-level `parameters`) are removed.
pub fn endpoint_description(
    deployment_id: &str,
    step: &ResolvedStep,
) -> Result<EndpointDescription, MatchError> {
    let module = &step.module;
    let mut description = module.openapi.clone();

    let address = step.device.communication.primary_address().ok_or_else(|| {
        template_error(
            &module.name,
            format!("device '{}' has no address", step.device.id),
        )
    })?;

    let server = description
        .servers
        .first_mut()
        .ok_or_else(|| template_error(&module.name, "no servers declared"))?;
    let url = server
        .url
        .replace("{serverIp}", &host_for_url(address))
        .replace("{port}", &step.device.communication.port.to_string());
    let parsed = reqwest::Url::parse(&url).map_err(|e| MatchError::InvalidUrl {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    server.url = parsed.to_string();
    server.variables = None;

    let (template, item) = select_path(&module.openapi.paths, &step.func).ok_or_else(|| {
        template_error(
            &module.name,
            format!("no path for function '{}'", step.func),
        )
    })?;
    let path = template
        .replace("{deployment}", deployment_id)
        .replace("{module}", &module.name);
    let item = PathItem {
        parameters: Vec::new(),
        ..item.clone()
    };
    description.paths = BTreeMap::from([(path, item)]);

    Ok(description)
}

/// The path template whose last segment is `func`, or the only path when the
/// template declares exactly one.
fn select_path<'a>(
    paths: &'a BTreeMap<String, PathItem>,
    func: &str,
) -> Option<(&'a String, &'a PathItem)> {
    paths
        .iter()
        .find(|(template, _)| template.trim_end_matches('/').rsplit('/').next() == Some(func))
        .or_else(|| {
            if paths.len() == 1 {
                paths.iter().next()
            } else {
                None
            }
        })
}

fn template_error(module: &str, reason: impl Into<String>) -> MatchError {
    MatchError::EndpointTemplate {
        module: module.to_string(),
        reason: reason.into(),
    }
}
