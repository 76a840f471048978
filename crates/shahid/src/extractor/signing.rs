//! Request signing for the Shahid proxy API.
//!
//! The proxy only accepts requests carrying a valid signature. How that
//! signature is produced (keys, token exchange, algorithm) is up to the
//! caller, who plugs a [`RequestSigner`] into
//! [`ShahidApi`](crate::extractor::platforms::shahid::ShahidApi).

use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use url::Url;

use super::error::ExtractorError;

/// A proxy request about to be sent. `url` already contains `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    url: Url,
    path: String,
    query: Vec<(String, String)>,
}

impl SignedRequest {
    pub fn new(
        method: Method,
        base: &str,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Self, ExtractorError> {
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))
            .map_err(|e| ExtractorError::InvalidUrl(format!("{base}/{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(Self {
            method,
            url,
            path: path.to_string(),
            query,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path relative to the proxy root, e.g. `playout/new/url/123`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Produces the authentication headers for a proxy request.
#[async_trait]
pub trait RequestSigner: Send + Sync + fmt::Debug {
    async fn sign(&self, request: &SignedRequest) -> Result<HeaderMap, ExtractorError>;
}

/// Sends proxy requests without any signature headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsignedRequests;

#[async_trait]
impl RequestSigner for UnsignedRequests {
    async fn sign(&self, _request: &SignedRequest) -> Result<HeaderMap, ExtractorError> {
        Ok(HeaderMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_request_url() {
        let request = SignedRequest::new(
            Method::GET,
            "https://api2.shahid.net/proxy/v2/",
            "playableAsset",
            vec![("request".to_string(), r#"{"showId":"79187"}"#.to_string())],
        )
        .unwrap();

        assert_eq!(request.url().path(), "/proxy/v2/playableAsset");
        let (key, value) = request.url().query_pairs().next().unwrap();
        assert_eq!(key, "request");
        assert_eq!(value, r#"{"showId":"79187"}"#);
        assert_eq!(request.path(), "playableAsset");
    }
}
