// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::downloader::client::HttpClient;
use crate::error::DownloadError;

/// Ticket handed back by the backend when a preparation request is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparationTicket {
    pub uuid: Uuid,
}

/// Outcome of a single status poll
#[derive(Debug, Clone, Default)]
pub struct PollResult {
    pub status_text: String,
    pub prepared: bool,
}

#[derive(Serialize)]
struct PrepareRequest {
    #[serde(rename = "publishedFileId")]
    published_file_id: u64,
    #[serde(rename = "collectionId")]
    collection_id: u64,
    extract: bool,
    hidden: bool,
    direct: bool,
    autodownload: bool,
}

#[derive(Deserialize)]
struct PrepareResponse {
    uuid: Uuid,
}

#[derive(Serialize)]
struct StatusRequest {
    uuids: Vec<String>,
}

pub struct WorkshopRequestClient {
    http: HttpClient,
    base_url: String,
}

impl WorkshopRequestClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url,
        })
    }

    pub fn transmit_url(&self, ticket: &PreparationTicket) -> String {
        format!(
            "{}/api/download/transmit?uuid={}",
            self.base_url, ticket.uuid
        )
    }

    /// Ask the backend to prepare a workshop item for download
    pub async fn request_preparation(
        &self,
        published_file_id: u64,
    ) -> Result<PreparationTicket, DownloadError> {
        let url = format!("{}/api/download/request", self.base_url);
        let body = PrepareRequest {
            published_file_id,
            collection_id: 0,
            extract: true,
            hidden: false,
            direct: false,
            autodownload: true,
        };

        info!(published_file_id, url = %url, "Requesting item preparation");

        let response = self
            .http
            .client()
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DownloadError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Unavailable(format!(
                "request endpoint returned {}",
                response.status()
            )));
        }

        let parsed: PrepareResponse = response
            .json()
            .await
            .map_err(|e| DownloadError::Unavailable(e.to_string()))?;

        info!(published_file_id, uuid = %parsed.uuid, "Preparation request accepted");
        Ok(PreparationTicket { uuid: parsed.uuid })
    }

    /// Poll the backend once for preparation progress
    ///
    /// Transport and decode failures are logged and reported as a
    /// non-prepared result so the caller's bounded retry loop keeps going.
    /// The prepared check is a substring match on the raw body, matching
    /// the backend's documented contract.
    pub async fn poll_status(&self, ticket: &PreparationTicket) -> PollResult {
        let url = format!("{}/api/download/status", self.base_url);
        let body = StatusRequest {
            uuids: vec![ticket.uuid.to_string()],
        };

        let raw = match self.http.client().post(&url).json(&body).send().await {
            Ok(response) => match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(uuid = %ticket.uuid, error = %e, "Failed to read status response");
                    return PollResult::default();
                }
            },
            Err(e) => {
                warn!(uuid = %ticket.uuid, error = %e, "Status poll failed");
                return PollResult::default();
            }
        };

        let prepared = raw.contains("prepared");
        let status_text = serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .and_then(|value| {
                value
                    .get(ticket.uuid.to_string())
                    .and_then(|entry| entry.get("status"))
                    .and_then(|status| status.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_default();

        PollResult {
            status_text,
            prepared,
        }
    }
}
