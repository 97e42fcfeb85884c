// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Device discovery: mDNS browsing, capability description queries and the
//! watcher that applies both to the [`DeviceRegistry`].
//!
//! [`DeviceRegistry`]: crate::registry::DeviceRegistry

mod description;
mod events;
mod mdns;
mod watcher;


pub use description::HttpDescriptionFetcher;
pub use events::{DiscoveryEvent, ServiceInfo};
pub use mdns::MdnsBrowser;
pub use watcher::DiscoveryWatcher;
