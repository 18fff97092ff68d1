// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipArchive;

use crate::error::DownloadError;
use crate::extractor::traits::Extractor;
use crate::utils::is_within_base;

pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for ZipExtractor {
    async fn extract_zip(
        &self,
        archive_path: PathBuf,
        dest: PathBuf,
    ) -> Result<Vec<PathBuf>, DownloadError> {
        info!(archive = %archive_path.display(), dest = %dest.display(), "Extracting ZIP archive");

        tokio::fs::create_dir_all(&dest).await?;

        let archive_path_clone = archive_path.clone();
        let dest_clone = dest.clone();

        let written =
            tokio::task::spawn_blocking(move || extract_entries(&archive_path_clone, &dest_clone))
                .await
                .map_err(|e| DownloadError::Io(std::io::Error::other(e)))??;

        info!(
            archive = %archive_path.display(),
            dest = %dest.display(),
            files = written.len(),
            "ZIP extraction completed"
        );
        Ok(written)
    }
}

impl Default for ZipExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_entries(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, DownloadError> {
    let file = File::open(archive_path).map_err(|e| DownloadError::OpenArchive {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| DownloadError::OpenArchive {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut written = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| DownloadError::Io(std::io::Error::other(e)))?;

        // Any entry escaping the destination fails the whole extraction
        // before a single byte of that entry is written
        let target = dest.join(entry.name());
        if !is_within_base(&target, dest) {
            return Err(DownloadError::IllegalPath { path: target });
        }

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut outfile = File::create(&target)?;
            std::io::copy(&mut entry, &mut outfile)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode))?;
            }
        }

        written.push(target);
    }

    Ok(written)
}
