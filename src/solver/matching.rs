// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::MatchError;
use crate::model::{Device, Module, ResolvedStep, SequenceStep};
use crate::observability::messages::deployment::DeviceSelected;
use crate::observability::messages::StructuredLog;

/// Match every step of `sequence` to a concrete (device, module, function).
///
/// Steps are processed in order and the first failing step aborts resolution.
/// A pinned device is only checked, never searched for. Unpinned steps take the
/// first device in `devices` order whose description provides every interface
/// the module requires; a device without a description is never chosen.
///
/// An empty sequence is rejected with [`MatchError::SequenceLengthMismatch`].
pub fn resolve(
    sequence: &[SequenceStep],
    devices: &[Device],
    modules: &[Module],
) -> Result<Vec<ResolvedStep>, MatchError> {
    let mut resolved = Vec::with_capacity(sequence.len());

    for (index, step) in sequence.iter().enumerate() {
        let module = modules
            .iter()
            .find(|m| m.id == step.module)
            .ok_or_else(|| MatchError::ModuleNotFound {
                step: index,
                module: step.module.clone(),
            })?;

        if module.export(&step.func).is_none() {
            return Err(MatchError::FunctionNotFound {
                step: index,
                module: module.id.clone(),
                func: step.func.clone(),
            });
        }

        let device = match &step.device {
            Some(id) => pinned_device(index, id, module, devices)?,
            None => search_device(index, module, devices)?,
        };

        DeviceSelected {
            step: index,
            device: &device.id,
            module: &module.id,
            func: &step.func,
            pinned: step.device.is_some(),
        }
        .log();

        resolved.push(ResolvedStep {
            device: device.clone(),
            module: module.clone(),
            func: step.func.clone(),
        });
    }

    if resolved.is_empty() || resolved.len() != sequence.len() {
        return Err(MatchError::SequenceLengthMismatch {
            expected: sequence.len(),
            resolved: resolved.len(),
        });
    }

    Ok(resolved)
}

fn pinned_device<'a>(
    step: usize,
    id: &str,
    module: &Module,
    devices: &'a [Device],
) -> Result<&'a Device, MatchError> {
    let device = devices
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| MatchError::DeviceNotFound {
            step,
            device: id.to_string(),
        })?;

    match device.missing_interfaces(module.required_interfaces()) {
        Some(missing) if missing.is_empty() => Ok(device),
        // Without a description nothing is known to be provided.
        missing => Err(MatchError::CapabilityMismatch {
            step,
            device: device.id.clone(),
            module: module.id.clone(),
            missing: missing
                .unwrap_or_else(|| module.required_interfaces().map(str::to_string).collect()),
        }),
    }
}

fn search_device<'a>(
    step: usize,
    module: &Module,
    devices: &'a [Device],
) -> Result<&'a Device, MatchError> {
    devices
        .iter()
        .find(|d| d.satisfies(module.required_interfaces()))
        .ok_or_else(|| MatchError::NoSuitableDevice {
            step,
            module: module.id.clone(),
            requirements: module.required_interfaces().map(str::to_string).collect(),
        })
}
