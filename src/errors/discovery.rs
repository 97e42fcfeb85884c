// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;
use thiserror::Error;

/// Errors raised while learning about devices on the network.
///
/// None of these are fatal to the discovery loop: a device whose description
/// cannot be fetched stays registered without a description until the next
/// rediscovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The advertised service carried no usable address
    #[error("Device '{device}' advertised no addresses")]
    NoAddress { device: String },

    /// The device answered the description query with a non-200 status
    #[error("Description query to {url} responded {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The description body was not a valid capability description
    #[error("Description from {url} is malformed: {reason}")]
    MalformedDescription { url: String, reason: String },

    /// The description query did not finish in time
    #[error("Description query to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Transport level failure
    #[error("Description query to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The mDNS daemon could not be started or browsed
    #[error("mDNS error: {0}")]
    Mdns(String),
}
