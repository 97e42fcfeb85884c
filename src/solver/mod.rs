// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deployment solving: match a sequence of calls to devices, then build the
//! manifest each chosen device receives.
//!
//! Matching reads registry snapshots and manifest building is pure, so solving
//! the same sequence twice over an unchanged registry yields the same result.

mod endpoint;
mod manifest;
mod matching;


pub use endpoint::endpoint_description;
pub use manifest::build_manifest;
pub use matching::resolve;
