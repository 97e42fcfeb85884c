// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// DNS-SD service type advertised by device supervisors
pub const DEFAULT_SERVICE_TYPE: &str = "_webthing._tcp.local.";
/// Path at which a supervisor serves its capability description
pub const DEFAULT_DESCRIPTION_PATH: &str = "/.well-known/wasmiot-device-description";
/// Path to which deployment manifests are POSTed
pub const DEFAULT_DEPLOY_PATH: &str = "/deploy";
/// Base URL devices use to fetch module binaries and descriptions
pub const DEFAULT_PACKAGE_BASE_URL: &str = "http://localhost:3000/";
/// Upper bound for a single description fetch
pub const DEFAULT_DESCRIPTION_TIMEOUT_SECONDS: u64 = 5;
/// Upper bound for a single deploy or execution request
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
/// How often the discovery watcher logs the devices it knows
pub const DEFAULT_LISTING_INTERVAL_SECONDS: u64 = 60;
/// Tracing filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
