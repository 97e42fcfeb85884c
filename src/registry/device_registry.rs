// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::discovery::ServiceInfo;
use crate::model::{Communication, Device, DeviceDescription};

/// Shared, insertion-ordered collection of known devices.
///
/// Cloning the handle shares the underlying collection. Iteration order is the
/// order in which devices were first discovered; automatic device selection
/// walks devices in this order, which keeps matching reproducible.
#[derive(Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<RwLock<Vec<Device>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already known devices, e.g. initial data.
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Arc::new(RwLock::new(devices)),
        }
    }

    /// Record that a service was seen on the network.
    ///
    /// Creates the entry on first sight, otherwise refreshes its addresses and
    /// last-seen time. Returns the entry when its description still has to be
    /// fetched and `None` when the device is already fully known.
    pub async fn observe(&self, service: &ServiceInfo) -> Option<Device> {
        let mut devices = self.devices.write().await;
        match devices.iter_mut().find(|d| d.id == service.name) {
            Some(existing) => {
                existing.last_seen = Utc::now();
                if existing.is_described() {
                    return None;
                }
                existing.communication = Communication {
                    addresses: service.addresses.clone(),
                    port: service.port,
                };
                Some(existing.clone())
            }
            None => {
                let device = Device::new(
                    service.name.clone(),
                    Communication {
                        addresses: service.addresses.clone(),
                        port: service.port,
                    },
                );
                devices.push(device.clone());
                Some(device)
            }
        }
    }

    /// Merge a fetched description into an entry. Returns false when the
    /// device was removed while its description was being fetched.
    pub async fn set_description(&self, id: &str, description: DeviceDescription) -> bool {
        let mut devices = self.devices.write().await;
        match devices.iter_mut().find(|d| d.id == id) {
            Some(device) => {
                device.description = Some(description);
                true
            }
            None => false,
        }
    }

    /// Forget every device whose addresses intersect those of the departing
    /// service. A departure that carries no addresses is matched by name.
    pub async fn remove_departed(&self, service: &ServiceInfo) -> Vec<String> {
        let mut devices = self.devices.write().await;
        let mut removed = Vec::new();
        devices.retain(|d| {
            let departed = if service.addresses.is_empty() {
                d.id == service.name
            } else {
                d.communication.shares_address_with(&service.addresses)
            };
            if departed {
                removed.push(d.id.clone());
            }
            !departed
        });
        removed
    }

    /// Explicit deletion of one device.
    pub async fn remove(&self, id: &str) -> Option<Device> {
        let mut devices = self.devices.write().await;
        let index = devices.iter().position(|d| d.id == id)?;
        Some(devices.remove(index))
    }

    /// Insert or replace a device record.
    pub async fn insert(&self, device: Device) {
        let mut devices = self.devices.write().await;
        match devices.iter_mut().find(|d| d.id == device.id) {
            Some(existing) => *existing = device,
            None => devices.push(device),
        }
    }

    pub async fn clear(&self) {
        self.devices.write().await.clear();
    }

    pub async fn get(&self, id: &str) -> Option<Device> {
        self.devices.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Point-in-time copy in registry order.
    pub async fn snapshot(&self) -> Vec<Device> {
        self.devices.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}
