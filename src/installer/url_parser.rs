// SPDX-License-Identifier: GPL-3.0-only
use url::Url;

use crate::error::DownloadError;

/// Extract the numeric `id` query parameter from a workshop item URL
pub fn parse_published_file_id(raw: &str) -> Result<u64, DownloadError> {
    let parsed = Url::parse(raw).map_err(|_| DownloadError::InvalidUrl)?;

    let id_value = parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .ok_or(DownloadError::InvalidUrl)?;

    if id_value.is_empty() {
        return Err(DownloadError::InvalidUrl);
    }

    id_value
        .parse::<u64>()
        .map_err(|_| DownloadError::InvalidUrl)
}
