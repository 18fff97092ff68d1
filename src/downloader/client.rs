// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::downloader::traits::Downloader;
use crate::error::DownloadError;

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for large downloads
            .user_agent("workshop-downloader/0.3.0")
            .build()?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Downloader for HttpClient {
    async fn download_archive(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        info!(url = %url, path = %dest.display(), "Starting archive download");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Transfer(format!(
                "archive endpoint returned {}",
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Transfer(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::Transfer(e.to_string()))?;
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;

        info!(url = %url, path = %dest.display(), "Archive download completed");
        Ok(())
    }
}
