// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod discovery;
mod dispatch;
mod matching;
mod orchestrator;

pub use config::ConfigError;
pub use discovery::DiscoveryError;
pub use dispatch::{DispatchError, ParameterLocationHint};
pub use matching::MatchError;
pub use orchestrator::OrchestratorError;
