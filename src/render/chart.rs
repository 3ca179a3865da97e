//! Summary chart fetching.
//!
//! The server renders the chart; the client only fetches the raw image
//! bytes and re-encodes them as a base64 data URI for display. The full
//! summary endpoint serves JPEG, the annual and monthly endpoints PNG.
//!
//! Same failure policy as the table fetch: log and leave the current image
//! alone.

use std::io::Read;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};
use url::Url;

/// Largest chart the client will buffer. The server renders small plot
/// images; anything past this is a misbehaving response.
const MAX_CHART_BYTES: u64 = 8 * 1024 * 1024;

/// MIME type of a chart endpoint's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMime {
    Png,
    Jpeg,
}

impl ChartMime {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Encode raw image bytes as a `data:` URI.
pub fn to_data_uri(bytes: &[u8], mime: ChartMime) -> String {
    format!("data:{};base64,{}", mime.as_str(), STANDARD.encode(bytes))
}

/// Fetch chart bytes and return them as a data URI.
///
/// Returns `None` on any failure — logged, never alerted.
pub fn fetch_data_uri(url: &Url, mime: ChartMime, timeout: Duration) -> Option<String> {
    debug!(url = %url, "fetching chart");

    let response = match ureq::get(url.as_str()).timeout(timeout).call() {
        Ok(response) => response,
        Err(err) => {
            warn!(url = %url, error = %err, "chart fetch failed, leaving image unchanged");
            return None;
        }
    };

    let mut bytes = Vec::new();
    if let Err(err) = response
        .into_reader()
        .take(MAX_CHART_BYTES)
        .read_to_end(&mut bytes)
    {
        warn!(url = %url, error = %err, "chart body read failed");
        return None;
    }

    Some(to_data_uri(&bytes, mime))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_data_uri_carries_mime_and_base64_payload() {
        // PNG signature bytes.
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let uri = to_data_uri(&bytes, ChartMime::Png);
        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn jpeg_mime_is_distinct() {
        let uri = to_data_uri(b"x", ChartMime::Jpeg);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn empty_body_still_forms_a_uri() {
        assert_eq!(to_data_uri(&[], ChartMime::Png), "data:image/png;base64,");
    }
}
