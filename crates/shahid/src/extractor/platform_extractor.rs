use crate::extractor::default::DEFAULT_UA;
use crate::extractor::platforms::shahid::Credentials;
use crate::media::Extraction;

use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Shared HTTP state of an extractor instance.
///
/// Holds the `reqwest` client, the platform's default headers and a cookie
/// store. Every request built through [`Extractor::request`] carries both, and
/// [`Extractor::parse_and_store_cookies`] feeds `Set-Cookie` headers back into
/// the store, which is how a login session reaches later calls.
///
/// ```rust
/// use reqwest::Client;
/// use shahid_parser::extractor::platform_extractor::Extractor;
///
/// let mut extractor = Extractor::new("Shahid", "https://shahid.mbc.net/ar/movies/x/movie-1", Client::new());
/// extractor.set_cookies_from_string("sessionId=abc123; lang=ar");
/// assert!(extractor.has_cookie("sessionId"));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    // url to extract from, e.g. "https://shahid.mbc.net/ar/shows/x/show-79187"
    pub url: String,
    pub platform_name: String,
    pub client: Client,
    platform_headers: HeaderMap,
    cookies: FxHashMap<String, String>,
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ar,en-US;q=0.8,en;q=0.5"),
        );

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            client,
            platform_headers: default_headers,
            cookies: FxHashMap::default(),
        }
    }

    /// Adds a default header. Invalid names or values are logged and skipped.
    pub fn add_header<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match (
            HeaderName::from_str(key.as_ref()),
            HeaderValue::from_str(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.platform_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}", key.as_ref()),
        }
    }

    /// Set cookies from a cookie string (format: "name1=value1; name2=value2").
    pub fn set_cookies_from_string(&mut self, cookie_string: &str) {
        for cookie in cookie_string.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    fn build_cookie_header(&self) -> Option<HeaderValue> {
        if self.cookies.is_empty() {
            return None;
        }

        let cookie_string = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        HeaderValue::from_str(&cookie_string)
            .inspect_err(|e| warn!("Dropping unencodable cookie header: {}", e))
            .ok()
    }

    /// Stores the cookies of every `Set-Cookie` header in `headers`.
    pub fn parse_and_store_cookies(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(reqwest::header::SET_COOKIE).iter() {
            let Ok(cookie_str) = value.to_str() else {
                continue;
            };
            // "name=value; Path=/; HttpOnly"
            if let Some((name, value)) = cookie_str
                .split(';')
                .next()
                .and_then(|pair| pair.split_once('='))
            {
                let name = name.trim().to_string();
                debug!("Storing cookie: {}", name);
                self.cookies.insert(name, value.trim().to_string());
            }
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Creates a request carrying the platform headers and stored cookies.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .headers(self.platform_headers.clone());

        match self.build_cookie_header() {
            Some(cookies) => builder.header(reqwest::header::COOKIE, cookies),
            None => builder,
        }
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    /// Establishes an account session for later requests.
    async fn login(&mut self, credentials: &Credentials) -> Result<(), ExtractorError>;

    async fn extract(&self) -> Result<Extraction, ExtractorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_store_cookies() {
        let mut extractor = Extractor::new("Shahid", "https://shahid.mbc.net", Client::new());
        let mut headers = HeaderMap::new();
        headers.append(
            reqwest::header::SET_COOKIE,
            HeaderValue::from_static("JSESSIONID=abc; Path=/; HttpOnly"),
        );
        headers.append(
            reqwest::header::SET_COOKIE,
            HeaderValue::from_static("shahid_os=web"),
        );

        extractor.parse_and_store_cookies(&headers);

        assert_eq!(extractor.get_cookie("JSESSIONID").map(String::as_str), Some("abc"));
        assert_eq!(extractor.get_cookie("shahid_os").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_request_carries_cookies() {
        let mut extractor = Extractor::new("Shahid", "https://shahid.mbc.net", Client::new());
        extractor.set_cookies_from_string("a=1");
        extractor.add_header("x-platform", "web");

        let request = extractor.get("https://shahid.mbc.net/").build().unwrap();
        assert_eq!(request.headers()["cookie"], "a=1");
        assert_eq!(request.headers()["x-platform"], "web");
    }
}
