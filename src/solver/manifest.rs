// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use reqwest::Url;

use crate::errors::MatchError;
use crate::model::{
    DeploymentNode, Instruction, Manifest, Module, ModuleData, ModuleUrls, ResolvedStep,
};
use crate::observability::messages::deployment::ManifestBuilt;
use crate::observability::messages::StructuredLog;
use crate::solver::endpoint_description;
use crate::utils::with_trailing_slash;

/// Build the per-device manifest for a resolved sequence.
///
/// The first pass creates one node per distinct device and fills in the
/// modules it must fetch and the endpoints it must expose. The second pass
/// links step *i* to the endpoint of step *i + 1*, leaving the last step
/// without a forward target. The result is only returned once complete.
pub fn build_manifest(
    resolved: &[ResolvedStep],
    deployment_id: &str,
    package_base_url: &str,
) -> Result<Manifest, MatchError> {
    let base = package_base(package_base_url)?;
    let mut manifest = Manifest::new();

    for step in resolved {
        let data = module_data(&step.module, &base)?;
        let endpoint = endpoint_description(deployment_id, step)?;
        let node = manifest
            .entry(step.device.id.clone())
            .or_insert_with(|| DeploymentNode::new(deployment_id));
        node.add_module(data);
        node.endpoints.insert(step.func.clone(), endpoint);
    }

    if let Some((device, _)) = manifest.iter().find(|(_, node)| node.endpoints.is_empty()) {
        return Err(MatchError::EmptyEndpointsForDevice {
            device: device.clone(),
        });
    }

    for (index, step) in resolved.iter().enumerate() {
        let forward_to = resolved.get(index + 1).and_then(|next| {
            manifest
                .get(&next.device.id)
                .and_then(|node| node.endpoints.get(&next.func))
                .cloned()
        });
        let source_paths = manifest
            .get(&step.device.id)
            .and_then(|node| node.endpoints.get(&step.func))
            .map(|endpoint| endpoint.paths.clone())
            .unwrap_or_default();

        if let Some(node) = manifest.get_mut(&step.device.id) {
            node.add_instruction(
                &step.module.name,
                &step.func,
                Instruction {
                    source_paths,
                    forward_to,
                },
            );
        }
    }

    ManifestBuilt {
        deployment_id,
        devices: manifest.len(),
        steps: resolved.len(),
    }
    .log();

    Ok(manifest)
}

fn package_base(package_base_url: &str) -> Result<Url, MatchError> {
    let normalized = with_trailing_slash(package_base_url);
    Url::parse(&normalized).map_err(|e| MatchError::InvalidUrl {
        url: normalized,
        reason: e.to_string(),
    })
}

/// Where a device downloads the module's binary, description and data files.
fn module_data(module: &Module, base: &Url) -> Result<ModuleData, MatchError> {
    let join = |relative: String| {
        base.join(&relative)
            .map(|url| url.to_string())
            .map_err(|e| MatchError::InvalidUrl {
                url: format!("{}{}", base, relative),
                reason: e.to_string(),
            })
    };

    let other = module
        .data_files
        .iter()
        .map(|file| join(format!("file/module/{}/{}", module.id, file)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ModuleData {
        id: module.id.clone(),
        name: module.name.clone(),
        urls: ModuleUrls {
            binary: join(format!("file/module/{}/wasm", module.id))?,
            description: join(format!("file/module/{}/description", module.id))?,
            other,
        },
    })
}
