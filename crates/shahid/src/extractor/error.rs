use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("unsupported extractor")]
    UnsupportedExtractor,
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    // server-provided fault messages, already stripped of html
    #[error("{0}")]
    ApiFault(String),
    #[error("login failed: {0}")]
    Auth(String),
    #[error("{id}: this video is DRM protected")]
    Drm { id: String },
    #[error("{0}")]
    Data(String),
    #[error("no streams found")]
    NoStreamsFound,
    #[error("page {index} out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("request signing failed: {0}")]
    Signing(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("hls playlist error: {0}")]
    HlsPlaylistError(String),
    #[error("other error: {0}")]
    Other(String),
}

impl ExtractorError {
    /// Errors caused by the content or the account rather than by a bug or
    /// the network. Callers usually print these without a backtrace.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ExtractorError::ApiFault(_)
                | ExtractorError::Auth(_)
                | ExtractorError::Drm { .. }
                | ExtractorError::Data(_)
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ExtractorError::HttpStatus { status, .. } => Some(*status),
            ExtractorError::HttpError(e) => e.status(),
            _ => None,
        }
    }
}
