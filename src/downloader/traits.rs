// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::Path;

use crate::error::DownloadError;

#[async_trait]
pub trait Downloader: Send + Sync {
    /// Stream an archive from a URL into a local file
    async fn download_archive(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}
