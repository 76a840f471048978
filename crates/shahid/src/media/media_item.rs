use super::stream_info::StreamInfo;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// A resolved episode, clip or movie.
///
/// Merges the playout manifest (as a list of formats) with the metadata
/// published by the public catalogue API.
///
/// # Fields
///
/// * `id` - Numeric id taken from the item url, kept as a string
/// * `title` - Title from the catalogue metadata
/// * `thumbnail` - Optional thumbnail url
/// * `duration` - Duration in seconds, when the catalogue reports one
/// * `timestamp` - Unix timestamp of the reference date
/// * `categories` - Genre names, in catalogue order
/// * `series` - Show title, falling back to the show name
/// * `drm_protected` - Whether the playout declared DRM protection
/// * `formats` - Playable formats, never empty
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<i64>,
    pub timestamp: Option<i64>,
    pub categories: Vec<String>,
    pub series: Option<String>,
    pub season: Option<String>,
    pub season_number: Option<i64>,
    pub season_id: Option<String>,
    pub episode_number: Option<i64>,
    pub episode_id: String,
    pub drm_protected: bool,
    pub formats: Vec<StreamInfo>,
}

impl MediaItem {
    /// Format with the highest bitrate.
    pub fn best_format(&self) -> Option<&StreamInfo> {
        self.formats.iter().max_by_key(|f| f.bitrate)
    }
}
