// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::net::IpAddr;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::discovery::{DiscoveryEvent, ServiceInfo};
use crate::errors::DiscoveryError;
use crate::observability::messages::discovery::DiscoveryStarted;
use crate::observability::messages::StructuredLog;
use crate::traits::ServiceBrowser;

/// Browses the local network for device supervisors with multicast DNS and
/// forwards what it finds to the discovery event channel.
pub struct MdnsBrowser {
    daemon: ServiceDaemon,
    service_type: String,
    events: mpsc::Sender<DiscoveryEvent>,
    cancel: CancellationToken,
    forwarding: Mutex<Option<JoinHandle<()>>>,
}

impl MdnsBrowser {
    pub fn new(
        service_type: impl Into<String>,
        events: mpsc::Sender<DiscoveryEvent>,
        cancel: CancellationToken,
    ) -> Result<Self, DiscoveryError> {
        let daemon = ServiceDaemon::new().map_err(|e| DiscoveryError::Mdns(e.to_string()))?;
        Ok(Self {
            daemon,
            service_type: service_type.into(),
            events,
            cancel,
            forwarding: Mutex::new(None),
        })
    }

    /// Start browsing. Events are forwarded until the browse is stopped,
    /// `cancel` fires or the receiving side goes away.
    pub fn start(&self) -> Result<(), DiscoveryError> {
        let receiver = self
            .daemon
            .browse(&self.service_type)
            .map_err(|e| DiscoveryError::Mdns(e.to_string()))?;

        DiscoveryStarted {
            service_type: &self.service_type,
        }
        .log();

        let events = self.events.clone();
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = receiver.recv_async() => match event {
                        Ok(event) => event,
                        Err(_) => break,
                    },
                };
                if matches!(event, ServiceEvent::SearchStopped(_)) {
                    break;
                }
                if let Some(event) = translate(event) {
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
            }
        });

        let mut forwarding = self
            .forwarding
            .lock()
            .map_err(|_| DiscoveryError::Mdns("forwarding task lock poisoned".to_string()))?;
        // A replaced task ends on its own once its browse reports SearchStopped.
        *forwarding = Some(handle);
        Ok(())
    }

    /// Wait for the forwarding task to finish, then stop the daemon. Cancel
    /// the token passed to [`MdnsBrowser::new`] first.
    pub async fn shutdown(self) {
        let handle = match self.forwarding.lock() {
            Ok(mut forwarding) => forwarding.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("mDNS forwarding task ended abnormally: {}", e);
            }
        }
        if let Err(e) = self.daemon.shutdown() {
            tracing::warn!("mDNS daemon shutdown failed: {}", e);
        }
    }
}

impl ServiceBrowser for MdnsBrowser {
    fn rebrowse(&self) -> Result<(), DiscoveryError> {
        if let Err(e) = self.daemon.stop_browse(&self.service_type) {
            tracing::debug!("No running browse to stop for '{}': {}", self.service_type, e);
        }
        self.start()
    }
}

fn translate(event: ServiceEvent) -> Option<DiscoveryEvent> {
    match event {
        ServiceEvent::ServiceResolved(info) => {
            let mut addresses: Vec<IpAddr> = info.get_addresses().iter().copied().collect();
            // IPv4 first, then a stable order.
            addresses.sort();
            Some(DiscoveryEvent::ServiceUp(ServiceInfo::new(
                info.get_fullname(),
                addresses.iter().map(IpAddr::to_string).collect(),
                info.get_port(),
            )))
        }
        ServiceEvent::ServiceRemoved(_service_type, fullname) => {
            Some(DiscoveryEvent::ServiceDown(ServiceInfo::new(fullname, Vec::new(), 0)))
        }
        other => {
            tracing::trace!("Ignoring mDNS event {:?}", other);
            None
        }
    }
}
