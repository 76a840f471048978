use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::api::{ShahidApi, ShahidOptions};
use super::auth::Credentials;
use super::models::{
    PlayableAssetRequest, PlayableAssetResponse, PlaylistPageRequest, PlaylistSort,
    ProductPlaylistResponse,
};
use crate::extractor::error::ExtractorError;
use crate::extractor::factory::ShahidUrl;
use crate::extractor::platform_extractor::{Extractor, PlatformExtractor};
use crate::extractor::signing::RequestSigner;
use crate::extractor::utils::{int_or_none, str_or_none};
use crate::media::playlist::{PageFetcher, PagedList, page_count};
use crate::media::{Extraction, Playlist, PlaylistEntry};

pub static SHOW_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://shahid\.mbc\.net/[a-z]{2}/(?:show|serie)s/[^/]+/(?:show|series)-(?P<id>\d+)",
    )
    .unwrap()
});

/// Entries requested per playlist page.
pub const PAGE_SIZE: usize = 30;

/// Resolves shows and series into paged playlists.
pub struct ShahidShow {
    api: ShahidApi,
}

impl ShahidShow {
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

    pub fn extract_show_id(&self) -> Result<String, ExtractorError> {
        match ShahidUrl::parse(&self.api.extractor().url)? {
            ShahidUrl::Show { id } => Ok(id),
            ShahidUrl::Item { .. } => Err(ExtractorError::ValidationError(
                "Shahid url points at an item, not a show".to_string(),
            )),
        }
    }

    /// Looks up the show's playlist. No page is fetched until it is accessed.
    pub async fn resolve_show(&self, show_id: &str) -> Result<Playlist, ExtractorError> {
        let product = self
            .api
            .call_api_as::<PlayableAssetResponse, _>(
                "playableAsset",
                show_id,
                Some(&PlayableAssetRequest { show_id }),
            )
            .await?
            .product_model;

        let total = int_or_none(&product.playlist.count)
            .map(|count| count.max(0) as u64)
            .unwrap_or(0);
        let pages = page_count(total, PAGE_SIZE as u64);
        debug!(
            "{}: playlist {} has {} entries over {} pages",
            show_id, product.playlist.id, total, pages
        );

        let fetcher = ShowPageFetcher {
            api: self.api.clone(),
            show_id: show_id.to_string(),
            playlist_id: product.playlist.id,
        };
        let show = product.show;

        Ok(Playlist {
            id: show_id.to_string(),
            title: show.as_ref().and_then(|s| s.title.clone()),
            description: show.and_then(|s| s.description),
            entries: PagedList::new(Arc::new(fetcher), pages, PAGE_SIZE),
        })
    }
}

struct ShowPageFetcher {
    api: ShahidApi,
    show_id: String,
    playlist_id: Value,
}

#[async_trait]
impl PageFetcher for ShowPageFetcher {
    async fn fetch_page(&self, page: usize) -> Result<Vec<PlaylistEntry>, ExtractorError> {
        let request = PlaylistPageRequest {
            play_list_id: &self.playlist_id,
            page_number: page,
            page_size: PAGE_SIZE,
            sorts: [PlaylistSort::NEWEST_FIRST],
        };
        let response = self
            .api
            .call_api_as::<ProductPlaylistResponse, _>(
                "product/playlist",
                &self.show_id,
                Some(&request),
            )
            .await?;

        let products = response
            .product_list
            .and_then(|list| list.products)
            .unwrap_or_default();

        Ok(products
            .into_iter()
            .filter_map(|product| {
                let url = product
                    .product_url
                    .and_then(|u| u.url)
                    .filter(|url| !url.is_empty())?;
                Some(PlaylistEntry {
                    id: str_or_none(&product.id),
                    title: product.title,
                    url,
                })
            })
            .collect())
    }
}

#[async_trait]
impl PlatformExtractor for ShahidShow {
    fn get_extractor(&self) -> &Extractor {
        self.api.extractor()
    }

    async fn login(&mut self, credentials: &Credentials) -> Result<(), ExtractorError> {
        self.api.login(credentials).await
    }

    async fn extract(&self) -> Result<Extraction, ExtractorError> {
        let show_id = self.extract_show_id()?;
        debug!("Extracting show {}", show_id);

        let playlist = self.resolve_show(&show_id).await?;
        Ok(Extraction::Playlist(playlist))
    }
}
