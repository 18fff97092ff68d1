// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::downloader::{client::HttpClient, traits::Downloader, workshop::WorkshopRequestClient};
use crate::error::DownloadError;
use crate::extractor::{traits::Extractor, zip::ZipExtractor};
use crate::installer::traits::StatusSink;
use crate::installer::url_parser;
use crate::utils::strip_file_scheme;

/// Report of one successfully installed workshop item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledItem {
    pub workshop_item_id: u64,
    pub install_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

pub struct ItemDownloadService {
    workshop: WorkshopRequestClient,
    transfer: HttpClient,
    extractor: ZipExtractor,
    status_sink: Arc<dyn StatusSink>,
    destination_folder: Option<PathBuf>,
    download_dir: PathBuf,
    poll_max_attempts: u32,
    poll_interval: Duration,
}

impl ItemDownloadService {
    pub fn new(config: &Config, status_sink: Arc<dyn StatusSink>) -> anyhow::Result<Self> {
        Ok(Self {
            workshop: WorkshopRequestClient::new(config.backend_api_url.clone())?,
            transfer: HttpClient::new()?,
            extractor: ZipExtractor::new(),
            status_sink,
            destination_folder: None,
            download_dir: config.download_dir.clone(),
            poll_max_attempts: config.poll_max_attempts,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        })
    }

    /// Store the folder extracted items are installed under
    ///
    /// Folder pickers hand back `file://` URIs on some platforms; the
    /// scheme is stripped before storing. Empty input clears the folder.
    pub fn set_destination_folder(&mut self, raw: &str) {
        if raw.is_empty() {
            self.destination_folder = None;
            return;
        }
        self.destination_folder = Some(strip_file_scheme(raw));
    }

    pub fn destination_folder(&self) -> Option<&Path> {
        self.destination_folder.as_deref()
    }

    /// Download and install a single workshop item
    ///
    /// Runs the whole flow: validate, request preparation, poll until the
    /// backend reports the item prepared, transfer the archive, extract it
    /// into `<destination_folder>/<id>/` and remove the archive. Errors are
    /// reported through the status sink before being returned.
    pub async fn handle_download(&self, raw_url: &str) -> Result<InstalledItem, DownloadError> {
        match self.run_download(raw_url).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.report(&e.to_string());
                Err(e)
            }
        }
    }

    async fn run_download(&self, raw_url: &str) -> Result<InstalledItem, DownloadError> {
        let published_file_id = url_parser::parse_published_file_id(raw_url)?;
        let destination_folder = self
            .destination_folder
            .clone()
            .ok_or(DownloadError::FolderNotSpecified)?;

        info!(url = %raw_url, published_file_id, "Starting workshop item download");

        self.report("Checking if Available");
        let ticket = self.workshop.request_preparation(published_file_id).await?;

        self.report("Item Available");

        let mut prepared = false;
        for attempt in 1..=self.poll_max_attempts {
            let poll = self.workshop.poll_status(&ticket).await;
            self.report(&title_case(&poll.status_text));

            if poll.prepared {
                prepared = true;
                self.report("Initializing Download...");
                break;
            }

            debug!(attempt, max_attempts = self.poll_max_attempts, "Item not prepared yet");
            tokio::time::sleep(self.poll_interval).await;
        }

        if !prepared {
            return Err(DownloadError::ServerBusy(self.poll_max_attempts));
        }

        let archive_path = self
            .download_dir
            .join(format!("{}.zip", published_file_id));
        let transmit_url = self.workshop.transmit_url(&ticket);
        self.transfer
            .download_archive(&transmit_url, &archive_path)
            .await?;

        self.report("Trying to Decompress");
        let install_dir = destination_folder.join(published_file_id.to_string());
        let files = self
            .extractor
            .extract_zip(archive_path.clone(), install_dir.clone())
            .await?;
        self.report("Successfully Decompressed");

        tokio::fs::remove_file(&archive_path)
            .await
            .map_err(|source| DownloadError::Cleanup {
                path: archive_path.clone(),
                source,
            })?;

        self.report("Download Finished");
        info!(
            published_file_id,
            install_dir = %install_dir.display(),
            files = files.len(),
            "Workshop item installed"
        );

        Ok(InstalledItem {
            workshop_item_id: published_file_id,
            install_dir,
            files,
        })
    }

    fn report(&self, status: &str) {
        debug!(status, "Status update");
        self.status_sink.report_status(status);
    }
}

/// Capitalize the first letter of every space-separated word
fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers;
    use tempfile::TempDir;

    const TICKET_UUID: &str = "0b84f0b8-3f3c-4b9b-8f0e-6d2f3a4b5c6d";
    const ITEM_URL: &str = "https://steamcommunity.com/sharedfiles/filedetails/?id=42";

    fn setup_service(
        base_url: &str,
        download_dir: &Path,
    ) -> (ItemDownloadService, Arc<test_helpers::RecordingSink>) {
        let config = test_helpers::create_test_config(base_url, download_dir);
        let sink = test_helpers::RecordingSink::new();
        let service = ItemDownloadService::new(&config, sink.clone()).unwrap();
        (service, sink)
    }

    fn prepare_mocks_uuid_body() -> String {
        format!(r#"{{"uuid": "{}"}}"#, TICKET_UUID)
    }

    #[tokio::test]
    async fn test_handle_download_invalid_url_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let (mut service, sink) = setup_service(&server.url(), temp_dir.path());
        service.set_destination_folder(temp_dir.path().to_string_lossy().as_ref());

        let mock = server
            .mock("POST", "/api/download/request")
            .expect(0)
            .create_async()
            .await;

        let result = service.handle_download("123456789").await;

        assert!(matches!(result, Err(DownloadError::InvalidUrl)));
        let statuses = sink.statuses();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].contains("invalid workshop URL"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_handle_download_folder_not_specified() {
        let mut server = mockito::Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let (service, sink) = setup_service(&server.url(), temp_dir.path());

        let mock = server
            .mock("POST", "/api/download/request")
            .expect(0)
            .create_async()
            .await;

        let result = service.handle_download(ITEM_URL).await;

        assert!(matches!(result, Err(DownloadError::FolderNotSpecified)));
        assert_eq!(sink.statuses(), vec!["download folder not specified"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_handle_download_backend_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let (mut service, sink) = setup_service(&server.url(), temp_dir.path());
        service.set_destination_folder(temp_dir.path().to_string_lossy().as_ref());

        let mock = server
            .mock("POST", "/api/download/request")
            .with_status(500)
            .create_async()
            .await;
        let status_mock = server
            .mock("POST", "/api/download/status")
            .expect(0)
            .create_async()
            .await;

        let result = service.handle_download(ITEM_URL).await;

        assert!(matches!(result, Err(DownloadError::Unavailable(_))));
        let statuses = sink.statuses();
        assert_eq!(statuses[0], "Checking if Available");
        assert!(statuses.last().unwrap().contains("unavailable"));
        mock.assert_async().await;
        status_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_handle_download_server_busy_when_never_prepared() {
        let mut server = mockito::Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let (mut service, sink) = setup_service(&server.url(), temp_dir.path());
        service.set_destination_folder(temp_dir.path().to_string_lossy().as_ref());

        let request_mock = server
            .mock("POST", "/api/download/request")
            .with_status(200)
            .with_body(prepare_mocks_uuid_body())
            .create_async()
            .await;
        let status_mock = server
            .mock("POST", "/api/download/status")
            .with_status(200)
            .with_body(format!(
                r#"{{"{}": {{"status": "retrieving"}}}}"#,
                TICKET_UUID
            ))
            .expect(10)
            .create_async()
            .await;
        let transmit_mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex("/api/download/transmit.*".to_string()),
            )
            .expect(0)
            .create_async()
            .await;

        let result = service.handle_download(ITEM_URL).await;

        match result {
            Err(DownloadError::ServerBusy(attempts)) => assert_eq!(attempts, 10),
            other => panic!("expected ServerBusy error, got {:?}", other),
        }
        let statuses = sink.statuses();
        assert_eq!(statuses[0], "Checking if Available");
        assert_eq!(statuses[1], "Item Available");
        // One title-cased status line per poll attempt
        assert_eq!(
            statuses.iter().filter(|s| *s == "Retrieving").count(),
            10
        );
        request_mock.assert_async().await;
        status_mock.assert_async().await;
        transmit_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_handle_download_success_flow() {
        let mut server = mockito::Server::new_async().await;
        let work_dir = TempDir::new().unwrap();
        let dest_dir = TempDir::new().unwrap();
        let (mut service, sink) = setup_service(&server.url(), work_dir.path());
        service.set_destination_folder(dest_dir.path().to_string_lossy().as_ref());

        let archive = test_helpers::zip_archive_bytes(&[
            ("readme.txt", "hello"),
            ("maps/level.bsp", "binary"),
        ]);

        let request_mock = server
            .mock("POST", "/api/download/request")
            .with_status(200)
            .with_body(prepare_mocks_uuid_body())
            .create_async()
            .await;
        let status_mock = server
            .mock("POST", "/api/download/status")
            .with_status(200)
            .with_body(format!(
                r#"{{"{}": {{"status": "prepared"}}}}"#,
                TICKET_UUID
            ))
            .create_async()
            .await;
        let transmit_mock = server
            .mock(
                "GET",
                format!("/api/download/transmit?uuid={}", TICKET_UUID).as_str(),
            )
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let item = service.handle_download(ITEM_URL).await.unwrap();

        let install_dir = dest_dir.path().join("42");
        assert_eq!(item.workshop_item_id, 42);
        assert_eq!(item.install_dir, install_dir);
        assert_eq!(
            std::fs::read_to_string(install_dir.join("readme.txt")).unwrap(),
            "hello"
        );
        assert_eq!(
            std::fs::read_to_string(install_dir.join("maps").join("level.bsp")).unwrap(),
            "binary"
        );
        // The transient archive is removed after extraction
        assert!(!work_dir.path().join("42.zip").exists());

        assert_eq!(
            sink.statuses(),
            vec![
                "Checking if Available",
                "Item Available",
                "Prepared",
                "Initializing Download...",
                "Trying to Decompress",
                "Successfully Decompressed",
                "Download Finished",
            ]
        );

        request_mock.assert_async().await;
        status_mock.assert_async().await;
        transmit_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_destination_folder_strips_scheme_and_clears() {
        let server_url = "http://backend.test".to_string();
        let temp_dir = TempDir::new().unwrap();
        let (mut service, _sink) = setup_service(&server_url, temp_dir.path());

        service.set_destination_folder("file:///home/user/mods");
        assert_eq!(
            service.destination_folder(),
            Some(Path::new("/home/user/mods"))
        );

        service.set_destination_folder("");
        assert_eq!(service.destination_folder(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("prepared"), "Prepared");
        assert_eq!(title_case("still retrieving data"), "Still Retrieving Data");
        assert_eq!(title_case(""), "");
    }
}
