// SPDX-License-Identifier: GPL-3.0-only
pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod installer;
pub mod logging;
pub mod utils;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::DownloadError;
pub use installer::{InstalledItem, ItemDownloadService, StatusSink};
