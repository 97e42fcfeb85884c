// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wasm_fleet::config::{load_and_validate_config, Config};
use wasm_fleet::discovery::{DiscoveryWatcher, HttpDescriptionFetcher, MdnsBrowser};
use wasm_fleet::observability::init_tracing;
use wasm_fleet::registry::DeviceRegistry;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => load_and_validate_config(&path)
            .with_context(|| format!("Failed to load configuration from '{}'", path))?,
        None => Config::default(),
    };

    init_tracing(&config.log_filter);
    tracing::info!(
        service_type = %config.discovery.service_type,
        package_base_url = %config.package_base_url,
        "Starting wasm-fleet orchestrator"
    );

    let registry = DeviceRegistry::new();
    let fetcher = HttpDescriptionFetcher::new(
        config.discovery.description_path.clone(),
        config.discovery.description_timeout(),
    )?;
    let watcher = Arc::new(DiscoveryWatcher::new(
        registry.clone(),
        Arc::new(fetcher),
        config.discovery.listing_interval(),
    ));

    let cancel = CancellationToken::new();
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let browser = MdnsBrowser::new(
        config.discovery.service_type.clone(),
        events_tx,
        cancel.clone(),
    )
    .context("Failed to start mDNS daemon")?;
    browser.start()?;
    let watching = {
        let watcher = Arc::clone(&watcher);
        let cancel = cancel.clone();
        tokio::spawn(async move { watcher.run(events_rx, cancel).await })
    };

    // SIGHUP resets discovery: known devices are forgotten and rediscovered.
    let mut hangup = signal(SignalKind::hangup()).context("Failed to listen for SIGHUP")?;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
            _ = hangup.recv() => {
                if let Err(e) = watcher.refresh(&browser).await {
                    tracing::warn!("Device discovery reset failed: {}", e);
                }
            }
        }
    }
    tracing::info!("Shutting down");

    cancel.cancel();
    if let Err(e) = watching.await {
        tracing::warn!("Discovery watcher ended abnormally: {}", e);
    }
    browser.shutdown().await;

    tracing::info!(known_devices = registry.len().await, "Stopped");
    Ok(())
}
