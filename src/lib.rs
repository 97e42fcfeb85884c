// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;       // YAML config + defaults
pub mod coordinator;  // manifest dispatch + execution
pub mod discovery;    // mDNS + device descriptions
pub mod errors;       // error handling
pub mod model;        // devices, modules, deployments
pub mod observability;
pub mod orchestrator; // ties registries, store and coordinator together
pub mod registry;     // in-memory device/module registries
pub mod resolver;     // boolean constraint solving
pub mod solver;       // sequence matching + manifest building
pub mod store;        // persistence collections
pub mod traits;       // collaborator abstractions
pub mod utils;
