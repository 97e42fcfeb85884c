// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// A service instance as seen by service discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Full advertised instance name; doubles as the device id
    pub name: String,
    pub addresses: Vec<String>,
    pub port: u16,
}

impl ServiceInfo {
    pub fn new(name: impl Into<String>, addresses: Vec<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            addresses,
            port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A service was resolved or re-announced
    ServiceUp(ServiceInfo),
    /// A service said goodbye. Addresses may be empty when the transport only
    /// reports the instance name.
    ServiceDown(ServiceInfo),
}
