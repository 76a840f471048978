use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::builder::ItemType;
use super::models::MetadataResponse;
use crate::extractor::error::ExtractorError;
use crate::extractor::platform_extractor::Extractor;
use crate::extractor::signing::{RequestSigner, SignedRequest, UnsignedRequests};
use crate::extractor::utils::clean_html;

/// Query credentials of the public catalogue API.
const METADATA_API_KEY: &str = "sh@hid0nlin3";
const METADATA_API_HASH: &str = "b2wMCTHpSmyxGqQjJFOycRmLSex+BpTK/ooxy6vHaqs=";

/// Hosts the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShahidEndpoints {
    /// Root of the signed proxy API
    pub proxy_base: String,
    /// Root of the public catalogue API
    pub metadata_base: String,
    pub login_url: String,
    pub populate_context_url: String,
}

impl Default for ShahidEndpoints {
    fn default() -> Self {
        Self {
            proxy_base: "https://api2.shahid.net/proxy/v2".to_string(),
            metadata_base: "http://api.shahid.net/api/v1_1".to_string(),
            login_url: "https://shahid.mbc.net/wd/service/users/login".to_string(),
            populate_context_url: "https://shahid.mbc.net/populateContext".to_string(),
        }
    }
}

impl ShahidEndpoints {
    /// Every endpoint served from one origin, keeping the production paths.
    pub fn with_host(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            proxy_base: format!("{origin}/proxy/v2"),
            metadata_base: format!("{origin}/api/v1_1"),
            login_url: format!("{origin}/wd/service/users/login"),
            populate_context_url: format!("{origin}/populateContext"),
        }
    }
}

/// Per-extractor settings, read from the factory's `extras` json.
///
/// ```json
/// { "allow_unplayable_formats": false, "endpoints": { "proxy_base": "..." } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShahidOptions {
    /// Resolve DRM protected items instead of failing with [`ExtractorError::Drm`]
    pub allow_unplayable_formats: bool,
    pub endpoints: ShahidEndpoints,
}

impl ShahidOptions {
    pub fn from_extras(extras: Option<&Value>) -> Self {
        let Some(extras) = extras else {
            return Self::default();
        };
        serde_json::from_value(extras.clone()).unwrap_or_else(|e| {
            warn!("Ignoring invalid Shahid options: {}", e);
            Self::default()
        })
    }
}

/// Client for the signed proxy API and the public catalogue API.
///
/// Cloning is cheap and clones share the HTTP connection pool, but each clone
/// owns its own cookie store.
#[derive(Debug, Clone)]
pub struct ShahidApi {
    extractor: Extractor,
    signer: Arc<dyn RequestSigner>,
    options: ShahidOptions,
}

impl ShahidApi {
    pub const PLATFORM_NAME: &'static str = "Shahid";

    pub(crate) const BASE_URL: &'static str = "https://shahid.mbc.net";

    pub fn new<S: Into<String>>(url: S, client: Client, options: ShahidOptions) -> Self {
        let mut extractor = Extractor::new(Self::PLATFORM_NAME, url, client);
        extractor.add_header(reqwest::header::ORIGIN.as_str(), Self::BASE_URL);
        extractor.add_header(
            reqwest::header::REFERER.as_str(),
            format!("{}/", Self::BASE_URL),
        );

        Self {
            extractor,
            signer: Arc::new(UnsignedRequests),
            options,
        }
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn extractor_mut(&mut self) -> &mut Extractor {
        &mut self.extractor
    }

    pub fn options(&self) -> &ShahidOptions {
        &self.options
    }

    /// Calls `path` on the signed proxy API.
    ///
    /// `request` is json-encoded into the `request` query parameter. A 4xx/5xx
    /// answer carrying fault messages fails with [`ExtractorError::ApiFault`];
    /// any other failed answer keeps its status and raw body in
    /// [`ExtractorError::HttpStatus`].
    pub async fn call_api<R>(
        &self,
        path: &str,
        video_id: &str,
        request: Option<&R>,
    ) -> Result<Value, ExtractorError>
    where
        R: Serialize + ?Sized,
    {
        self.call_api_as(path, video_id, request).await
    }

    pub async fn call_api_as<T, R>(
        &self,
        path: &str,
        video_id: &str,
        request: Option<&R>,
    ) -> Result<T, ExtractorError>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let mut query = Vec::new();
        if let Some(request) = request {
            query.push(("request".to_string(), serde_json::to_string(request)?));
        }

        let signed = SignedRequest::new(
            Method::GET,
            &self.options.endpoints.proxy_base,
            path,
            query,
        )?;
        let signature = self.signer.sign(&signed).await?;

        debug!("{}: calling proxy api {}", video_id, signed.path());
        let response = self
            .extractor
            .request(signed.method().clone(), signed.url().as_str())
            .headers(signature)
            .send()
            .await?;

        read_json_or_fault(response, ExtractorError::ApiFault).await
    }

    /// Fetches the catalogue entry of an item. `clip` is looked up as `episode`.
    pub async fn fetch_metadata(
        &self,
        item_type: ItemType,
        id: &str,
    ) -> Result<MetadataResponse, ExtractorError> {
        let url = format!(
            "{}/{}/{}",
            self.options.endpoints.metadata_base.trim_end_matches('/'),
            item_type.metadata_type(),
            id
        );
        debug!("{}: downloading video json from {}", id, url);

        let response = self
            .extractor
            .get(&url)
            .query(&[("apiKey", METADATA_API_KEY), ("hash", METADATA_API_HASH)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractorError::HttpStatus { status, url, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Decodes a json body, turning 4xx/5xx answers into errors.
///
/// Fault messages found in a failed body are wrapped with `on_fault`.
pub(super) async fn read_json_or_fault<T: DeserializeOwned>(
    response: Response,
    on_fault: fn(String) -> ExtractorError,
) -> Result<T, ExtractorError> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await?;

    if status.is_client_error() || status.is_server_error() {
        debug!("{} answered {}: {}", url, status, body);
        return Err(match fault_message(&body) {
            Some(message) => on_fault(message),
            None => ExtractorError::HttpStatus { status, url, body },
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Joins the user messages of a `{"faults": [...]}` body, html stripped.
///
/// `None` when the body is not json or no fault carries a message.
pub(super) fn fault_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("faults")?
        .as_array()?
        .iter()
        .filter_map(|fault| fault.get("userMessage")?.as_str())
        .map(clean_html)
        .filter(|message| !message.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    (!message.is_empty()).then_some(message)
}
