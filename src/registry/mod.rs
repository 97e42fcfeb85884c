// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registries of known devices and uploaded modules.
//!
//! Discovery is the only writer of the device registry and the upload flow the
//! only writer of the module registry. Matching works on snapshots and never
//! mutates either.

mod device_registry;
mod module_registry;

pub use device_registry::DeviceRegistry;
pub use module_registry::ModuleRegistry;
