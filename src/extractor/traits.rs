// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::DownloadError;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract a ZIP archive into the destination directory
    ///
    /// Returns every path written, directories included, in archive order.
    async fn extract_zip(
        &self,
        archive_path: PathBuf,
        dest: PathBuf,
    ) -> Result<Vec<PathBuf>, DownloadError>;
}
