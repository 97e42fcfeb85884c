// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::host_for_url;

/// How to reach a device on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Communication {
    pub addresses: Vec<String>,
    pub port: u16,
}

impl Communication {
    /// First advertised address, which is the one used for all requests.
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }

    /// Base URL `http://{address}:{port}` of the device, if it has an address.
    pub fn base_url(&self) -> Option<String> {
        self.primary_address()
            .map(|address| format!("http://{}:{}", host_for_url(address), self.port))
    }

    /// True when the two address sets share at least one address.
    pub fn shares_address_with(&self, addresses: &[String]) -> bool {
        let own: HashSet<&str> = self.addresses.iter().map(String::as_str).collect();
        addresses.iter().any(|a| own.contains(a.as_str()))
    }
}

/// Capability description served by a device at its well-known description path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub platform: String,
    pub architecture: String,
    #[serde(default)]
    pub supervisor_interfaces: Vec<String>,
    #[serde(default)]
    pub peripherals: Vec<String>,
}

/// A device running the supervisor, as learned through discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub communication: Communication,
    #[serde(default)]
    pub description: Option<DeviceDescription>,
    pub last_seen: DateTime<Utc>,
}

impl Device {
    pub fn new(id: impl Into<String>, communication: Communication) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            communication,
            description: None,
            last_seen: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: DeviceDescription) -> Self {
        self.description = Some(description);
        self
    }

    /// A device is fully known once its description has been fetched.
    pub fn is_described(&self) -> bool {
        self.description.is_some()
    }

    /// Interfaces from `required` that this device does not provide.
    ///
    /// Returns `None` when the device has no description: an undescribed device
    /// satisfies no requirement set at all, not even an empty one.
    pub fn missing_interfaces<'a, I>(&self, required: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let description = self.description.as_ref()?;
        let provided: HashSet<&str> = description
            .supervisor_interfaces
            .iter()
            .map(String::as_str)
            .collect();
        Some(
            required
                .into_iter()
                .filter(|r| !provided.contains(r))
                .map(str::to_string)
                .collect(),
        )
    }

    /// True when the device provides every interface in `required`.
    pub fn satisfies<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        matches!(self.missing_interfaces(required), Some(missing) if missing.is_empty())
    }
}
