use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{Stream, StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::extractor::error::ExtractorError;
use crate::extractor::factory::ShahidUrl;

/// A playlist item pointing at a page that can be resolved later.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: String,
}

impl PlaylistEntry {
    /// Routes the entry url to the item it points at.
    pub fn target(&self) -> Result<ShahidUrl, ExtractorError> {
        ShahidUrl::parse(&self.url)
    }
}

/// Entries returned by a single page fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaylistPage {
    pub index: usize,
    pub items: Vec<PlaylistEntry>,
}

/// Source of playlist pages. `page` is zero-based.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page: usize) -> Result<Vec<PlaylistEntry>, ExtractorError>;
}

/// Number of pages needed to hold `total` items.
pub fn page_count(total: u64, page_size: u64) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size) as usize
}

/// A fixed-length list of pages, each fetched on first access and kept.
///
/// Accessing page `i` never fetches any other page, and concurrent accesses to
/// the same page share a single fetch.
pub struct PagedList {
    fetcher: Arc<dyn PageFetcher>,
    page_size: usize,
    pages: Vec<OnceCell<PlaylistPage>>,
}

impl PagedList {
    pub fn new(fetcher: Arc<dyn PageFetcher>, page_count: usize, page_size: usize) -> Self {
        Self {
            fetcher,
            page_size,
            pages: (0..page_count).map(|_| OnceCell::new()).collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_fetched(&self, index: usize) -> bool {
        self.pages
            .get(index)
            .is_some_and(|cell| cell.initialized())
    }

    pub async fn page(&self, index: usize) -> Result<&PlaylistPage, ExtractorError> {
        let cell = self
            .pages
            .get(index)
            .ok_or(ExtractorError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })?;

        cell.get_or_try_init(|| async {
            debug!("fetching playlist page {}/{}", index + 1, self.pages.len());
            let items = self.fetcher.fetch_page(index).await?;
            Ok(PlaylistPage { index, items })
        })
        .await
    }

    /// All entries in page order. Pages are fetched as the stream reaches them.
    pub fn entries(&self) -> impl Stream<Item = Result<PlaylistEntry, ExtractorError>> + '_ {
        stream::iter(0..self.pages.len())
            .then(move |index| self.page(index))
            .map_ok(|page| {
                stream::iter(
                    page.items
                        .clone()
                        .into_iter()
                        .map(Ok::<_, ExtractorError>),
                )
            })
            .try_flatten()
    }

    pub async fn collect_entries(&self) -> Result<Vec<PlaylistEntry>, ExtractorError> {
        self.entries().try_collect().await
    }
}

impl fmt::Debug for PagedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fetched = self.pages.iter().filter(|cell| cell.initialized()).count();
        f.debug_struct("PagedList")
            .field("page_size", &self.page_size)
            .field("page_count", &self.pages.len())
            .field("fetched", &fetched)
            .finish()
    }
}

/// A show and its lazily fetched episodes.
#[derive(Debug)]
pub struct Playlist {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub entries: PagedList,
}
