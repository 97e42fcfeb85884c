// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_DEPLOY_PATH, DEFAULT_DESCRIPTION_PATH, DEFAULT_DESCRIPTION_TIMEOUT_SECONDS,
    DEFAULT_LISTING_INTERVAL_SECONDS, DEFAULT_LOG_FILTER, DEFAULT_PACKAGE_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_SERVICE_TYPE,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the orchestrator.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example
/// ```yaml
/// package_base_url: "http://192.168.1.10:3000/"
/// log_filter: "wasm_fleet=debug"
/// discovery:
///   service_type: "_webthing._tcp.local."
///   description_timeout_seconds: 5
///   listing_interval_seconds: 60
/// dispatch:
///   deploy_path: "/deploy"
///   request_timeout_seconds: 30
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_package_base_url")]
    pub package_base_url: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_base_url: default_package_base_url(),
            log_filter: default_log_filter(),
            discovery: DiscoveryConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

/// Settings for learning about devices on the local network.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DiscoveryConfig {
    #[serde(default = "default_service_type")]
    pub service_type: String,
    #[serde(default = "default_description_path")]
    pub description_path: String,
    #[serde(default = "default_description_timeout")]
    pub description_timeout_seconds: u64,
    #[serde(default = "default_listing_interval")]
    pub listing_interval_seconds: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            service_type: default_service_type(),
            description_path: default_description_path(),
            description_timeout_seconds: default_description_timeout(),
            listing_interval_seconds: default_listing_interval(),
        }
    }
}

impl DiscoveryConfig {
    pub fn description_timeout(&self) -> Duration {
        Duration::from_secs(self.description_timeout_seconds)
    }

    pub fn listing_interval(&self) -> Duration {
        Duration::from_secs(self.listing_interval_seconds)
    }
}

/// Settings for talking to devices once a deployment exists.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DispatchConfig {
    #[serde(default = "default_deploy_path")]
    pub deploy_path: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            deploy_path: default_deploy_path(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl DispatchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_package_base_url() -> String {
    DEFAULT_PACKAGE_BASE_URL.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_service_type() -> String {
    DEFAULT_SERVICE_TYPE.to_string()
}

fn default_description_path() -> String {
    DEFAULT_DESCRIPTION_PATH.to_string()
}

fn default_description_timeout() -> u64 {
    DEFAULT_DESCRIPTION_TIMEOUT_SECONDS
}

fn default_listing_interval() -> u64 {
    DEFAULT_LISTING_INTERVAL_SECONDS
}

fn default_deploy_path() -> String {
    DEFAULT_DEPLOY_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// On top of parsing this checks that the package base URL is absolute, that
/// no timeout or interval is zero and that device paths start with '/'.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    reqwest::Url::parse(&cfg.package_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: cfg.package_base_url.clone(),
        reason: e.to_string(),
    })?;

    let durations = [
        ("description_timeout_seconds", cfg.discovery.description_timeout_seconds),
        ("listing_interval_seconds", cfg.discovery.listing_interval_seconds),
        ("request_timeout_seconds", cfg.dispatch.request_timeout_seconds),
    ];
    if let Some((field, _)) = durations.iter().find(|(_, value)| *value == 0) {
        return Err(ConfigError::ZeroDuration { field: *field });
    }

    let paths = [
        ("description_path", &cfg.discovery.description_path),
        ("deploy_path", &cfg.dispatch.deploy_path),
    ];
    for (field, value) in paths {
        if !value.starts_with('/') {
            return Err(ConfigError::RelativePath {
                field,
                value: value.to_string(),
            });
        }
    }

    Ok(())
}
