use reqwest::StatusCode;

/// Errors decoding or encoding a gzip-compressed JSON payload.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("empty payload")]
    Empty,
    #[error("gzip error: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors talking to a single dashboard.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid dashboard address: {0}")]
    InvalidAddress(#[from] url::ParseError),
    #[error("could not encode request: {0}")]
    Encode(#[from] CodecError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("could not decode reply: {0}")]
    Reply(serde_json::Error),
}
