use crate::media::{MediaFormat, StreamFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One playable format of a media item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StreamInfo {
    // Absolute url of the variant playlist (or the media playlist itself)
    pub url: String,
    pub stream_format: StreamFormat,
    pub media_format: MediaFormat,
    // e.g. "1280x720", or "Source" when the manifest does not say
    pub quality: String,
    // Bitrate in kbps, 0 when unknown
    pub bitrate: u64,
    pub codec: String,
    pub fps: f64,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub has_drm: bool,
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.stream_format, self.media_format, self.quality
        )?;
        if self.bitrate > 0 {
            write!(f, " @ {} kbps", self.bitrate)?;
        }
        if self.has_drm {
            write!(f, " [DRM]")?;
        }
        Ok(())
    }
}
