use crate::api::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum KupoError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error("{record} is missing required field `{field}`")]
    Validation {
        record: &'static str,
        field: &'static str,
    },

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Why a response body could not be turned into the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl KupoError {
    pub(crate) fn decode(context: &'static str, source: impl Into<DecodeError>) -> Self {
        Self::Decode {
            context,
            source: source.into(),
        }
    }
}
