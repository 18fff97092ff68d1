// SPDX-License-Identifier: GPL-3.0-only
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::installer::traits::StatusSink;

/// Create a test configuration pointed at a mock backend
///
/// The poll interval is zero so bounded-retry tests finish instantly.
pub fn create_test_config(backend_api_url: &str, download_dir: &Path) -> Config {
    Config {
        backend_api_url: backend_api_url.to_string(),
        download_dir: download_dir.to_path_buf(),
        poll_max_attempts: 10,
        poll_interval_secs: 0,
        log_level: "error".to_string(), // Reduce log noise in tests
    }
}

/// Create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp directory")
}

/// Build an in-memory ZIP archive from (name, contents) pairs
pub fn zip_archive_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        for (name, contents) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Status sink that records every reported line for assertions
pub struct RecordingSink {
    statuses: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(Vec::new()),
        })
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn report_status(&self, status: &str) {
        self.statuses.lock().unwrap().push(status.to_string());
    }
}
