use super::error::ExtractorError;
use super::factory::ExtractorFactory;
use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn default_client() -> Result<Client, ExtractorError> {
    create_client(None)
}

/// Builds the shared HTTP client: rustls with the platform verifier, a 30s
/// timeout and an optional outbound proxy.
pub fn create_client(proxy_config: Option<ProxyConfig>) -> Result<Client, ExtractorError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ExtractorError::Other(format!("tls protocol versions: {e}")))?
        .with_platform_verifier()
        .map_err(|e| ExtractorError::Other(format!("tls platform verifier: {e}")))?
        .with_no_client_auth();

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(DEFAULT_TIMEOUT);

    if let Some(config) = proxy_config {
        match reqwest::Proxy::all(&config.url) {
            Ok(mut proxy) => {
                if let (Some(username), Some(password)) = (config.username, config.password) {
                    proxy = proxy.basic_auth(&username, &password);
                }
                builder = builder.proxy(proxy);
            }
            Err(e) => {
                warn!("Failed to configure proxy '{}': {}", config.url, e);
            }
        }
    }

    Ok(builder.build()?)
}

/// Returns a new `ExtractorFactory` for Shahid item and show urls.
pub fn default_factory() -> Result<ExtractorFactory, ExtractorError> {
    Ok(ExtractorFactory::new(default_client()?))
}

/// Returns a new `ExtractorFactory` with proxy support.
pub fn factory_with_proxy(
    proxy_config: Option<ProxyConfig>,
) -> Result<ExtractorFactory, ExtractorError> {
    Ok(ExtractorFactory::new(create_client(proxy_config)?))
}
