pub mod api;
pub mod error;
pub mod types;

pub use api::{ClientConfig, Conditional, Endpoint, HttpKupoClient, KupoApi};
pub use error::{DecodeError, KupoError};
pub use types::{
    Assets, ChainPoint, DatumResponse, DatumType, Match, MetadataItem, Pattern, ScriptResponse,
    Value,
};
