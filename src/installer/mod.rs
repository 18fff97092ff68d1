// SPDX-License-Identifier: GPL-3.0-only
pub mod traits;
pub mod service;
pub mod url_parser;

pub use traits::StatusSink;
pub use service::{InstalledItem, ItemDownloadService};
