// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors that can occur while loading or validating the orchestrator configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML for the expected schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The package base URL does not parse as an absolute URL
    #[error("Invalid package base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A timeout or interval was configured as zero
    #[error("'{field}' must be greater than zero")]
    ZeroDuration { field: &'static str },

    /// A well-known device path does not start with '/'
    #[error("'{field}' must be an absolute path, got '{value}'")]
    RelativePath { field: &'static str, value: String },
}
