use async_trait::async_trait;
use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist};
use reqwest::RequestBuilder;
use tracing::debug;
use url::Url;

use super::error::ExtractorError;
use crate::media::{MediaFormat, StreamFormat, stream_info::StreamInfo};

/// Turns an HLS manifest into the list of its playable formats.
#[async_trait]
pub trait HlsExtractor {
    /// Sends `request` (a GET for `m3u8_url`) and parses the returned manifest.
    ///
    /// Master playlists yield one format per variant; a media playlist yields a
    /// single "Source" format pointing at `m3u8_url`.
    async fn extract_hls_formats(
        &self,
        request: RequestBuilder,
        m3u8_url: &str,
        has_drm: bool,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        let base_url =
            Url::parse(m3u8_url).map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::HttpStatus {
                status,
                url: m3u8_url.to_string(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let playlist = m3u8_rs::parse_playlist_res(&bytes)
            .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

        let formats = match playlist {
            Playlist::MasterPlaylist(pl) => process_master_playlist(pl, &base_url, has_drm)?,
            Playlist::MediaPlaylist(pl) => vec![media_playlist_format(&pl, m3u8_url, has_drm)],
        };
        debug!("{} hls formats from {}", formats.len(), m3u8_url);

        Ok(formats)
    }
}

fn media_playlist_format(playlist: &MediaPlaylist, m3u8_url: &str, has_drm: bool) -> StreamInfo {
    let media_format = playlist
        .segments
        .first()
        .map(|s| MediaFormat::from_segment_uri(&s.uri))
        .unwrap_or(MediaFormat::Ts);

    StreamInfo {
        url: m3u8_url.to_string(),
        stream_format: StreamFormat::Hls,
        media_format,
        quality: "Source".to_string(),
        bitrate: 0,
        codec: String::new(),
        fps: 0.0,
        width: None,
        height: None,
        has_drm,
    }
}

fn process_master_playlist(
    playlist: MasterPlaylist,
    base_url: &Url,
    has_drm: bool,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    playlist
        .variants
        .into_iter()
        // I-frame only variants are trick-play tracks, not playable formats
        .filter(|variant| !variant.is_i_frame)
        .map(|variant| -> Result<StreamInfo, ExtractorError> {
            let stream_url = base_url
                .join(&variant.uri)
                .map_err(|e| ExtractorError::HlsPlaylistError(format!("{}: {e}", variant.uri)))?;

            let quality = variant
                .resolution
                .as_ref()
                .map(|r| format!("{}x{}", r.width, r.height))
                .unwrap_or_else(|| "Source".to_string());

            Ok(StreamInfo {
                url: stream_url.to_string(),
                stream_format: StreamFormat::Hls,
                // the variant uri does not tell the segment container
                media_format: MediaFormat::Ts,
                quality,
                bitrate: variant.bandwidth / 1000,
                codec: variant.codecs.unwrap_or_default(),
                fps: variant.frame_rate.unwrap_or(0.0),
                width: variant.resolution.as_ref().map(|r| r.width),
                height: variant.resolution.as_ref().map(|r| r.height),
                has_drm,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=1280000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
360/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2560000,RESOLUTION=1280x720,CODECS=\"avc1.4d401f,mp4a.40.2\"
https://other.example.com/720/index.m3u8
";

    #[test]
    fn test_process_master_playlist() {
        let Ok(Playlist::MasterPlaylist(pl)) = m3u8_rs::parse_playlist_res(MASTER.as_bytes())
        else {
            panic!("expected a master playlist");
        };
        let base = Url::parse("https://cdn.example.com/out/v1/master.m3u8?other=1").unwrap();

        let formats = process_master_playlist(pl, &base, false).unwrap();

        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].url, "https://cdn.example.com/out/v1/360/index.m3u8");
        assert_eq!(formats[0].quality, "640x360");
        assert_eq!(formats[0].bitrate, 1280);
        assert_eq!(formats[0].codec, "avc1.4d401e,mp4a.40.2");
        assert_eq!(formats[1].url, "https://other.example.com/720/index.m3u8");
        assert_eq!(formats[1].height, Some(720));
    }
}
