// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::discovery::{DiscoveryEvent, ServiceInfo};
use crate::observability::messages::discovery::{
    DescriptionAdded, DescriptionFailed, DeviceAlreadyKnown, DeviceDeparted, DeviceDiscovered,
    DiscoveryRefreshed, KnownDevicesListing,
};
use crate::observability::messages::StructuredLog;
use crate::registry::DeviceRegistry;
use crate::errors::DiscoveryError;
use crate::traits::{DescriptionFetcher, ServiceBrowser};

/// Keeps the device registry in step with what discovery reports.
///
/// Events are handled in delivery order. Description fetches run as their own
/// tasks so a slow device never holds up the event stream; their results are
/// merged whenever they arrive.
pub struct DiscoveryWatcher {
    registry: DeviceRegistry,
    fetcher: Arc<dyn DescriptionFetcher>,
    listing_interval: Duration,
}

impl DiscoveryWatcher {
    pub fn new(
        registry: DeviceRegistry,
        fetcher: Arc<dyn DescriptionFetcher>,
        listing_interval: Duration,
    ) -> Self {
        Self {
            registry,
            fetcher,
            listing_interval,
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Apply one discovery event to the registry.
    ///
    /// Returns the handle of the description fetch when one was started.
    pub async fn handle(&self, event: DiscoveryEvent) -> Option<JoinHandle<()>> {
        match event {
            DiscoveryEvent::ServiceUp(service) => self.service_up(service).await,
            DiscoveryEvent::ServiceDown(service) => {
                self.service_down(service).await;
                None
            }
        }
    }

    async fn service_up(&self, service: ServiceInfo) -> Option<JoinHandle<()>> {
        let Some(device) = self.registry.observe(&service).await else {
            DeviceAlreadyKnown {
                device: &service.name,
            }
            .log();
            return None;
        };

        let discovered = DeviceDiscovered {
            device: &device.id,
            addresses: &device.communication.addresses,
            port: device.communication.port,
        };
        discovered.log();
        let span = discovered.span("description_fetch");

        let registry = self.registry.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let fetch = async move {
            match fetcher.fetch(&device.id, &device.communication).await {
                Ok(description) => {
                    let platform = description.platform.clone();
                    let interface_count = description.supervisor_interfaces.len();
                    if registry.set_description(&device.id, description).await {
                        DescriptionAdded {
                            device: &device.id,
                            platform: &platform,
                            interface_count,
                        }
                        .log();
                    }
                }
                Err(error) => DescriptionFailed {
                    device: &device.id,
                    error: &error,
                }
                .log(),
            }
        };
        Some(tokio::spawn(fetch.instrument(span)))
    }

    async fn service_down(&self, service: ServiceInfo) {
        let removed = self.registry.remove_departed(&service).await;
        DeviceDeparted {
            service: &service.name,
            removed: &removed,
        }
        .log();
    }

    /// Forget every known device and have `browser` start over, so devices
    /// that are still running are discovered and described afresh.
    ///
    /// Returns how many devices were forgotten.
    pub async fn refresh(&self, browser: &dyn ServiceBrowser) -> Result<usize, DiscoveryError> {
        let forgotten = self.registry.len().await;
        self.registry.clear().await;
        browser.rebrowse()?;
        DiscoveryRefreshed { forgotten }.log();
        Ok(forgotten)
    }

    /// Log the ids of all known devices.
    pub async fn log_known_devices(&self) {
        let devices = self.registry.snapshot().await;
        let described = devices.iter().filter(|d| d.is_described()).count();
        let ids: Vec<String> = devices.into_iter().map(|d| d.id).collect();
        KnownDevicesListing {
            devices: &ids,
            described,
        }
        .log();
    }

    /// Process events until the channel closes or `cancel` fires, listing the
    /// known devices every `listing_interval` in between.
    pub async fn run(&self, mut events: mpsc::Receiver<DiscoveryEvent>, cancel: CancellationToken) {
        let mut listing = tokio::time::interval(self.listing_interval);
        // The first tick completes immediately.
        listing.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = listing.tick() => self.log_known_devices().await,
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event).await;
                    }
                    None => break,
                },
            }
        }
        tracing::debug!("Discovery watcher stopped");
    }
}
