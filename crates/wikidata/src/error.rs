#[derive(thiserror::Error, Debug)]
pub enum WikidataError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Entity {0} not found")]
    EntityNotFound(String),
    #[error("HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl WikidataError {
    /// Transport-level failures (connect, timeout, body read) all surface as
    /// an unavailable upstream; status errors are handled before this.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamUnavailable(format!("request timed out: {err}"))
        } else {
            Self::UpstreamUnavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, WikidataError>;
