use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum RpcError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("node returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("node rejected {method}: {message} (code {code})")]
    Node { method: &'static str, code: i64, message: String },

    #[error("node returned no result for {0}")]
    MissingResult(&'static str),

    #[error("malformed response to {method}: {reason}")]
    Decode { method: &'static str, reason: String },

    #[error("no '{0}' asset label known to the node")]
    MissingAssetLabel(String),

    #[error("{0}")]
    General(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        RpcError::Transport(err.to_string())
    }
}

pub type RpcResult<T> = std::result::Result<T, crate::RpcError>;
