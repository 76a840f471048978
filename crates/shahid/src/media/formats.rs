use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Delivery protocol of a format.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamFormat {
    Hls,
}

impl StreamFormat {
    pub fn as_str(&self) -> &str {
        match self {
            StreamFormat::Hls => "hls",
        }
    }
}

impl Display for StreamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Container of the media segments.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Ts,
    Mp4,
}

impl MediaFormat {
    pub fn as_str(&self) -> &str {
        match self {
            MediaFormat::Ts => "ts",
            MediaFormat::Mp4 => "mp4",
        }
    }

    /// Guesses the container from a segment uri.
    pub fn from_segment_uri(uri: &str) -> Self {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        if path.contains("fmp4") || path.ends_with(".mp4") || path.ends_with(".m4s") {
            MediaFormat::Mp4
        } else {
            MediaFormat::Ts
        }
    }
}

impl Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_format_from_segment_uri() {
        assert_eq!(
            MediaFormat::from_segment_uri("seg_1.m4s?token=abc"),
            MediaFormat::Mp4
        );
        assert_eq!(MediaFormat::from_segment_uri("seg_1.ts"), MediaFormat::Ts);
        assert_eq!(
            MediaFormat::from_segment_uri("https://cdn.example.com/fmp4/init?x=1"),
            MediaFormat::Mp4
        );
        assert_eq!(StreamFormat::Hls.to_string(), "hls");
    }
}
