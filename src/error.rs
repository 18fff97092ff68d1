// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("invalid workshop URL: missing or malformed 'id' query parameter")]
    InvalidUrl,

    #[error("download folder not specified")]
    FolderNotSpecified,

    #[error("workshop backend unavailable: {0}")]
    Unavailable(String),

    #[error("server is busy: item not prepared after {0} status checks")]
    ServerBusy(u32),

    #[error("archive transfer failed: {0}")]
    Transfer(String),

    #[error("failed to open archive {}: {reason}", path.display())]
    OpenArchive { path: PathBuf, reason: String },

    #[error("{}: illegal file path", path.display())]
    IllegalPath { path: PathBuf },

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to remove archive {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
