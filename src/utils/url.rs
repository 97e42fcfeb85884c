// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Format an address for use as the host part of a URL.
///
/// IPv6 addresses are wrapped in brackets; IPv4 addresses and host names are
/// returned unchanged.
///
/// ```rust
/// use wasm_fleet::utils::host_for_url;
///
/// assert_eq!(host_for_url("192.168.1.20"), "192.168.1.20");
/// assert_eq!(host_for_url("fe80::1"), "[fe80::1]");
/// ```
pub fn host_for_url(address: &str) -> String {
    if address.contains(':') && !address.starts_with('[') {
        format!("[{}]", address)
    } else {
        address.to_string()
    }
}

/// Make sure relative joins against `url` append instead of replacing its
/// last path segment.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
