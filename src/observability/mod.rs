// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational log lines of the orchestrator are message
//! structs with a `Display` implementation, so the wording lives in one place
//! and the structured fields travel with it.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::discovery` - device discovery and registry maintenance
//! * `messages::deployment` - sequence matching, manifest building and dispatch
//! * `messages::resolver` - constraint resolution
//!
//! # Usage
//!
//! ```rust
//! use wasm_fleet::observability::messages::StructuredLog;
//! use wasm_fleet::observability::messages::discovery::DeviceAlreadyKnown;
//!
//! let msg = DeviceAlreadyKnown { device: "supervisor-1._webthing._tcp.local." };
//! msg.log();
//! tracing::debug!("{}", msg);
//! ```

pub mod messages;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set. Calling this twice is
/// harmless: the second installation attempt is ignored.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
