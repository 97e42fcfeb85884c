// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod url;

#[cfg(test)]
pub(crate) mod fixtures;

pub use url::{host_for_url, with_trailing_slash};
