pub mod formats;
pub mod media_item;
pub mod playlist;
pub mod stream_info;

pub use formats::{MediaFormat, StreamFormat};
pub use media_item::MediaItem;
pub use playlist::{Playlist, PlaylistEntry, PlaylistPage};
pub use stream_info::StreamInfo;

/// Result of running a [`crate::extractor::platform_extractor::PlatformExtractor`].
#[derive(Debug)]
pub enum Extraction {
    Media(Box<MediaItem>),
    Playlist(Playlist),
}
