use std::sync::{Arc, LazyLock};

use super::error::ExtractorError;
use super::platform_extractor::PlatformExtractor;
use super::signing::{RequestSigner, UnsignedRequests};
use crate::extractor::platforms::shahid::{self, ItemType, Shahid, ShahidShow};
use regex::Regex;
use reqwest::Client;

/// What a Shahid url points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShahidUrl {
    Item { item_type: ItemType, id: String },
    Show { id: String },
}

impl ShahidUrl {
    pub fn parse(url: &str) -> Result<Self, ExtractorError> {
        if let Some(caps) = shahid::URL_REGEX.captures(url) {
            let item_type = caps["type"].parse()?;
            return Ok(ShahidUrl::Item {
                item_type,
                id: caps["id"].to_string(),
            });
        }
        if let Some(caps) = shahid::SHOW_URL_REGEX.captures(url) {
            return Ok(ShahidUrl::Show {
                id: caps["id"].to_string(),
            });
        }
        Err(ExtractorError::InvalidUrl(url.to_string()))
    }
}

type ExtractorConstructor = fn(
    String,
    Client,
    Arc<dyn RequestSigner>,
    Option<String>,
    Option<serde_json::Value>,
) -> Box<dyn PlatformExtractor>;

struct PlatformEntry {
    regex: &'static LazyLock<Regex>,
    constructor: ExtractorConstructor,
}

macro_rules! create_constructor {
    ($name:ident, $ty:ty) => {
        fn $name(
            url: String,
            client: Client,
            signer: Arc<dyn RequestSigner>,
            cookies: Option<String>,
            extras: Option<serde_json::Value>,
        ) -> Box<dyn PlatformExtractor> {
            Box::new(<$ty>::new(url, client, cookies, extras).with_signer(signer))
        }
    };
}

create_constructor!(new_shahid, Shahid);
create_constructor!(new_shahid_show, ShahidShow);

static PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry {
        regex: &shahid::URL_REGEX,
        constructor: new_shahid,
    },
    PlatformEntry {
        regex: &shahid::SHOW_URL_REGEX,
        constructor: new_shahid_show,
    },
];

/// Builds the extractor matching a url.
///
/// Every extractor shares the factory's client and request signer.
pub struct ExtractorFactory {
    client: Client,
    signer: Arc<dyn RequestSigner>,
}

impl ExtractorFactory {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            signer: Arc::new(UnsignedRequests),
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// `cookies` is a browser-style cookie string; `extras` holds
    /// [`ShahidOptions`](crate::extractor::platforms::shahid::ShahidOptions) as json.
    pub fn create_extractor(
        &self,
        url: &str,
        cookies: Option<String>,
        extras: Option<serde_json::Value>,
    ) -> Result<Box<dyn PlatformExtractor>, ExtractorError> {
        PLATFORMS
            .iter()
            .find(|platform| platform.regex.is_match(url))
            .map(|platform| {
                (platform.constructor)(
                    url.to_string(),
                    self.client.clone(),
                    self.signer.clone(),
                    cookies,
                    extras,
                )
            })
            .ok_or(ExtractorError::UnsupportedExtractor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_urls() {
        let url = "https://shahid.mbc.net/ar/shows/%D9%85%D8%AA%D8%AD%D9%81-1/clip-816924";
        assert_eq!(
            ShahidUrl::parse(url).unwrap(),
            ShahidUrl::Item {
                item_type: ItemType::Clip,
                id: "816924".to_string()
            }
        );

        let url = "https://shahid.mbc.net/ar/movies/%D8%A7%D9%84%D9%82%D9%86%D8%A7%D8%B5%D8%A9/movie-151746";
        assert_eq!(
            ShahidUrl::parse(url).unwrap(),
            ShahidUrl::Item {
                item_type: ItemType::Movie,
                id: "151746".to_string()
            }
        );

        let url = "https://shahid.mbc.net/en/shows/Ramez-Fi-Al-Shallal-season-1-episode-1/episode-359319";
        assert!(matches!(
            ShahidUrl::parse(url).unwrap(),
            ShahidUrl::Item { item_type: ItemType::Episode, id } if id == "359319"
        ));
    }

    #[test]
    fn test_parse_show_urls() {
        let url = "https://shahid.mbc.net/ar/shows/%D8%B1%D8%A7%D9%85%D8%B2/show-79187";
        assert_eq!(
            ShahidUrl::parse(url).unwrap(),
            ShahidUrl::Show {
                id: "79187".to_string()
            }
        );

        let url = "https://shahid.mbc.net/ar/series/How-to-live-Longer-(The-Big-Think)/series-291861";
        assert_eq!(
            ShahidUrl::parse(url).unwrap(),
            ShahidUrl::Show {
                id: "291861".to_string()
            }
        );
    }

    #[test]
    fn test_unsupported_url() {
        assert!(matches!(
            ShahidUrl::parse("https://example.com/video/1"),
            Err(ExtractorError::InvalidUrl(_))
        ));

        let factory = ExtractorFactory::new(Client::new());
        assert!(matches!(
            factory.create_extractor("https://example.com/video/1", None, None),
            Err(ExtractorError::UnsupportedExtractor)
        ));
        assert!(
            factory
                .create_extractor(
                    "https://shahid.mbc.net/ar/series/x/series-291861",
                    None,
                    None
                )
                .is_ok()
        );
    }
}
