// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for device discovery and registry maintenance:
//! * services appearing and departing
//! * capability description queries
//! * the periodic listing of known devices

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Discovery started browsing for a service type.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DiscoveryStarted<'a> {
    pub service_type: &'a str,
}

impl Display for DiscoveryStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Device discovery started; searching for '{}'", self.service_type)
    }
}

impl StructuredLog for DiscoveryStarted<'_> {
    fn log(&self) {
        tracing::info!(service_type = self.service_type, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("discovery", span_name = name, service_type = self.service_type)
    }
}

/// A new service was seen, or a known one without a description reappeared.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DeviceDiscovered<'a> {
    pub device: &'a str,
    pub addresses: &'a [String],
    pub port: u16,
}

impl Display for DeviceDiscovered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discovered device '{}' at [{}]:{}",
            self.device,
            self.addresses.join(", "),
            self.port
        )
    }
}

impl StructuredLog for DeviceDiscovered<'_> {
    fn log(&self) {
        tracing::info!(
            device = self.device,
            addresses = ?self.addresses,
            port = self.port,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "device_discovered",
            span_name = name,
            device = self.device,
            port = self.port,
        )
    }
}

/// Rediscovery of a device that already has a description; nothing to do.
///
/// # Log Level
/// `debug!` - Repeats on every mDNS announcement
pub struct DeviceAlreadyKnown<'a> {
    pub device: &'a str,
}

impl Display for DeviceAlreadyKnown<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Service '{}' is already known", self.device)
    }
}

impl StructuredLog for DeviceAlreadyKnown<'_> {
    fn log(&self) {
        tracing::debug!(device = self.device, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("device_known", span_name = name, device = self.device)
    }
}

/// A capability description was merged into the registry entry.
///
/// # Log Level
/// `info!` - The device became matchable
pub struct DescriptionAdded<'a> {
    pub device: &'a str,
    pub platform: &'a str,
    pub interface_count: usize,
}

impl Display for DescriptionAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Added description for device '{}' ({}, {} supervisor interfaces)",
            self.device, self.platform, self.interface_count
        )
    }
}

impl StructuredLog for DescriptionAdded<'_> {
    fn log(&self) {
        tracing::info!(
            device = self.device,
            platform = self.platform,
            interface_count = self.interface_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "description_added",
            span_name = name,
            device = self.device,
            interface_count = self.interface_count,
        )
    }
}

/// The description query failed; the device stays registered but unmatchable.
///
/// # Log Level
/// `warn!` - Retried on the next rediscovery
pub struct DescriptionFailed<'a> {
    pub device: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DescriptionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Error in introduction of device '{}': {}; it stays unmatchable until rediscovered",
            self.device, self.error
        )
    }
}

impl StructuredLog for DescriptionFailed<'_> {
    fn log(&self) {
        tracing::warn!(device = self.device, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "description_failed",
            span_name = name,
            device = self.device,
            error = %self.error,
        )
    }
}

/// A service emitted "goodbye" and the matching registry entries were dropped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DeviceDeparted<'a> {
    pub service: &'a str,
    pub removed: &'a [String],
}

impl Display for DeviceDeparted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.removed.is_empty() {
            write!(f, "Service '{}' departed; no matching devices were known", self.service)
        } else {
            write!(
                f,
                "Service '{}' departed; forgot devices: {}",
                self.service,
                self.removed.join(", ")
            )
        }
    }
}

impl StructuredLog for DeviceDeparted<'_> {
    fn log(&self) {
        tracing::info!(
            service = self.service,
            removed = ?self.removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("device_departed", span_name = name, service = self.service)
    }
}

/// Periodic diagnostic listing of the registry.
///
/// # Log Level
/// `info!` - Heartbeat of the discovery loop
pub struct KnownDevicesListing<'a> {
    pub devices: &'a [String],
    pub described: usize,
}

impl Display for KnownDevicesListing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Current number of devices: {} ({} described): [{}]",
            self.devices.len(),
            self.described,
            self.devices.join(", ")
        )
    }
}

impl StructuredLog for KnownDevicesListing<'_> {
    fn log(&self) {
        tracing::info!(
            device_count = self.devices.len(),
            described = self.described,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "known_devices",
            span_name = name,
            device_count = self.devices.len(),
            described = self.described,
        )
    }
}

/// The registry was emptied and browsing restarted so that every running
/// device is discovered again.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DiscoveryRefreshed {
    pub forgotten: usize,
}

impl Display for DiscoveryRefreshed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Device discovery reset; forgot {} devices and restarted browsing",
            self.forgotten
        )
    }
}

impl StructuredLog for DiscoveryRefreshed {
    fn log(&self) {
        tracing::info!(forgotten = self.forgotten, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("discovery_refresh", span_name = name, forgotten = self.forgotten)
    }
}
