// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::DiscoveryError;

/// Source of discovery events that can be told to start over.
pub trait ServiceBrowser: Send + Sync {
    /// Drop the running browse and issue a fresh one, so that every service
    /// still on the network is announced again.
    fn rebrowse(&self) -> Result<(), DiscoveryError>;
}
