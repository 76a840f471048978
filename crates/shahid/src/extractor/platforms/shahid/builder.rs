use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::api::{ShahidApi, ShahidOptions};
use super::auth::Credentials;
use super::models::{PlayoutResponse, VideoMetadata};
use crate::extractor::error::ExtractorError;
use crate::extractor::factory::ShahidUrl;
use crate::extractor::hls_extractor::HlsExtractor;
use crate::extractor::platform_extractor::{Extractor, PlatformExtractor};
use crate::extractor::signing::RequestSigner;
use crate::extractor::utils::{
    bool_or_none, int_or_none, parse_iso8601, remove_query_param, str_or_none,
};
use crate::media::{Extraction, MediaItem, StreamInfo};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://shahid\.mbc\.net/[a-z]{2}/(?:serie|show|movie)s/[^/]+/(?P<type>episode|clip|movie)-(?P<id>\d+)",
    )
    .unwrap()
});

/// CDN-side manifest rewriting directive, stripped before the manifest is fetched.
const MANIFEST_FILTER_PARAM: &str = "aws.manifestfilter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Episode,
    Clip,
    Movie,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Episode => "episode",
            ItemType::Clip => "clip",
            ItemType::Movie => "movie",
        }
    }

    /// Type used by the catalogue API, which files clips under episodes.
    pub fn metadata_type(&self) -> &'static str {
        match self {
            ItemType::Clip => ItemType::Episode.as_str(),
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "episode" => Ok(ItemType::Episode),
            "clip" => Ok(ItemType::Clip),
            "movie" => Ok(ItemType::Movie),
            _ => Err(ExtractorError::ValidationError(format!(
                "unknown item type: {s}"
            ))),
        }
    }
}

/// Resolves episodes, clips and movies.
pub struct Shahid {
    api: ShahidApi,
}

impl Shahid {
    pub fn new(
        url: String,
        client: Client,
        cookies: Option<String>,
        extras: Option<serde_json::Value>,
    ) -> Self {
        let options = ShahidOptions::from_extras(extras.as_ref());
        let mut api = ShahidApi::new(url, client, options);
        if let Some(cookies) = cookies {
            api.extractor_mut().set_cookies_from_string(&cookies);
        }
        Self { api }
    }

    pub fn with_api(api: ShahidApi) -> Self {
        Self { api }
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.api = self.api.with_signer(signer);
        self
    }

    pub fn api(&self) -> &ShahidApi {
        &self.api
    }

    pub fn extract_item_id(&self) -> Result<(ItemType, String), ExtractorError> {
        match ShahidUrl::parse(&self.api.extractor().url)? {
            ShahidUrl::Item { item_type, id } => Ok((item_type, id)),
            ShahidUrl::Show { .. } => Err(ExtractorError::ValidationError(
                "Shahid url points at a show, not an item".to_string(),
            )),
        }
    }

    /// Resolves an item into its formats and metadata.
    ///
    /// DRM protected items fail with [`ExtractorError::Drm`] before the
    /// manifest or the catalogue are requested, unless the options allow
    /// unplayable formats.
    pub async fn resolve(
        &self,
        item_type: ItemType,
        id: &str,
    ) -> Result<MediaItem, ExtractorError> {
        let playout = self
            .api
            .call_api_as::<PlayoutResponse, ()>(&format!("playout/new/url/{id}"), id, None)
            .await?
            .playout;

        let drm_protected = bool_or_none(&playout.drm).unwrap_or(false);
        if drm_protected && !self.api.options().allow_unplayable_formats {
            return Err(ExtractorError::Drm { id: id.to_string() });
        }

        let manifest_url = playout.url.filter(|url| !url.is_empty()).ok_or_else(|| {
            ExtractorError::ValidationError(format!("{id}: playout has no manifest url"))
        })?;
        let formats = self.extract_formats(&manifest_url, drm_protected).await?;

        let response = self.api.fetch_metadata(item_type, id).await?;
        let data = response.data.unwrap_or_default();
        if let Some(message) = metadata_error(&data) {
            return Err(ExtractorError::Data(format!(
                "{} returned error: {}",
                ShahidApi::PLATFORM_NAME,
                message
            )));
        }

        let video = data
            .get(item_type.metadata_type())
            .cloned()
            .ok_or_else(|| {
                ExtractorError::ValidationError(format!(
                    "{id}: no {} in metadata response",
                    item_type.metadata_type()
                ))
            })?;
        let video: VideoMetadata = serde_json::from_value(video)?;

        Ok(build_media_item(id, video, drm_protected, formats))
    }

    async fn extract_formats(
        &self,
        manifest_url: &str,
        has_drm: bool,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        let m3u8_url = remove_query_param(manifest_url, MANIFEST_FILTER_PARAM)?;
        debug!("manifest url: {}", m3u8_url);

        let request = self.api.extractor().get(&m3u8_url);
        let formats = self.extract_hls_formats(request, &m3u8_url, has_drm).await?;
        if formats.is_empty() {
            return Err(ExtractorError::NoStreamsFound);
        }
        Ok(formats)
    }
}

/// Message of a non-empty `error` entry in the catalogue response.
fn metadata_error(data: &Map<String, Value>) -> Option<String> {
    match data.get("error")? {
        Value::Object(error) if !error.is_empty() => Some(
            error
                .values()
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Value::String(error) if !error.is_empty() => Some(error.clone()),
        _ => None,
    }
}

fn build_media_item(
    id: &str,
    video: VideoMetadata,
    drm_protected: bool,
    formats: Vec<StreamInfo>,
) -> MediaItem {
    let categories = video
        .genres
        .unwrap_or_default()
        .into_iter()
        .filter_map(|genre| genre.name)
        .collect();

    MediaItem {
        id: id.to_string(),
        title: video.title,
        description: video.description,
        thumbnail: video.thumbnail_url,
        duration: int_or_none(&video.duration),
        timestamp: video.reference_date.as_deref().and_then(parse_iso8601),
        categories,
        series: video
            .show_title
            .filter(|title| !title.is_empty())
            .or(video.show_name),
        season: video.season_title,
        season_number: int_or_none(&video.season_number),
        season_id: str_or_none(&video.season_id),
        episode_number: int_or_none(&video.number),
        episode_id: id.to_string(),
        drm_protected,
        formats,
    }
}

impl HlsExtractor for Shahid {}

#[async_trait]
impl PlatformExtractor for Shahid {
    fn get_extractor(&self) -> &Extractor {
        self.api.extractor()
    }

    async fn login(&mut self, credentials: &Credentials) -> Result<(), ExtractorError> {
        self.api.login(credentials).await
    }

    async fn extract(&self) -> Result<Extraction, ExtractorError> {
        let (item_type, id) = self.extract_item_id()?;
        debug!("Extracting {} {}", item_type, id);

        let item = self.resolve(item_type, &id).await?;
        Ok(Extraction::Media(Box::new(item)))
    }
}
