use common::blob_ref::BlobRef;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("invalid auth token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    #[error("server did not acknowledge blob {0}")]
    NotReceived(BlobRef),
    #[error("server does not advertise a sign handler")]
    NoSignHandler,
}
