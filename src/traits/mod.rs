// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod browser;
pub mod fetcher;
pub mod messenger;
pub mod persistence;

pub use browser::ServiceBrowser;
pub use fetcher::DescriptionFetcher;
pub use messenger::{
    DeviceMessenger, DeviceResponse, ExecutionBody, ExecutionRequest, ExecutionResponse,
    FileInput, HttpMethod,
};
pub use persistence::Persistence;
