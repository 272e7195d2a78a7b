use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::{debug, trace, warn};

use crate::error::KupoError;
use crate::types::{DatumResponse, Match, MetadataItem, Pattern, ScriptResponse};

use super::super::{Conditional, Endpoint, KupoApi};
use super::connection::{parse_base_url, ClientConfig};
use super::parsing::{
    decode_datum, decode_matches, decode_metadata, decode_patterns, decode_script,
};

/// Kupo HTTP API client.
///
/// Holds nothing but the normalised base URL and a `reqwest::Client` built
/// from its own [`ClientConfig`]. Cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpKupoClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpKupoClient {
    /// Create a client for `base_url` with the default transport settings
    /// (five minute request timeout).
    pub fn new(base_url: &str) -> Result<Self, KupoError> {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self, KupoError> {
        let base_url = parse_base_url(base_url)?;
        let client = config.build_http_client()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET for `path` and buffer the body.
    ///
    /// `304` becomes [`Conditional::NotModified`] on endpoints that support
    /// it; any other non-200 status is a [`KupoError::Status`].
    async fn fetch(
        &self,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<Conditional<String>, KupoError> {
        let url = format!("{}{path}", self.base_url);
        debug!(kupo.endpoint = %endpoint, %url, "kupo request");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED && endpoint.supports_not_modified() {
            debug!(kupo.endpoint = %endpoint, %status, "kupo resource not modified");
            return Ok(Conditional::NotModified);
        }
        if status != StatusCode::OK {
            warn!(kupo.endpoint = %endpoint, %url, %status, "unexpected kupo response status");
            return Err(KupoError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(kupo.endpoint = %endpoint, %status, body_len = body.len(), "kupo response");
        trace!(kupo.endpoint = %endpoint, body = %body, "kupo response body");

        Ok(Conditional::Modified(body))
    }

    /// [`fetch`](Self::fetch) for endpoints where only `200` is acceptable.
    async fn fetch_body(&self, endpoint: Endpoint, path: &str) -> Result<String, KupoError> {
        match self.fetch(endpoint, path).await? {
            Conditional::Modified(body) => Ok(body),
            Conditional::NotModified => Err(KupoError::Status {
                endpoint,
                status: StatusCode::NOT_MODIFIED.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl KupoApi for HttpKupoClient {
    async fn get_all_matches(&self) -> Result<Vec<Match>, KupoError> {
        let body = self.fetch_body(Endpoint::Matches, "/matches").await?;
        decode_matches(&body)
    }

    async fn get_matches(&self, pattern: &str) -> Result<Vec<Match>, KupoError> {
        let body = self
            .fetch_body(Endpoint::Matches, &format!("/matches/{pattern}"))
            .await?;
        decode_matches(&body)
    }

    async fn get_metadata(
        &self,
        slot_no: u64,
        transaction_id: Option<&str>,
    ) -> Result<Conditional<Vec<MetadataItem>>, KupoError> {
        let path = metadata_path(slot_no, transaction_id);
        match self.fetch(Endpoint::Metadata, &path).await? {
            Conditional::Modified(body) => decode_metadata(&body).map(Conditional::Modified),
            Conditional::NotModified => Ok(Conditional::NotModified),
        }
    }

    async fn get_all_patterns(&self) -> Result<Vec<Pattern>, KupoError> {
        let body = self.fetch_body(Endpoint::Patterns, "/patterns").await?;
        decode_patterns(&body)
    }

    async fn get_patterns(&self, pattern: &str) -> Result<Vec<Pattern>, KupoError> {
        let body = self
            .fetch_body(Endpoint::Patterns, &format!("/patterns/{pattern}"))
            .await?;
        decode_patterns(&body)
    }

    async fn get_script(
        &self,
        script_hash: &str,
    ) -> Result<Conditional<Option<ScriptResponse>>, KupoError> {
        let path = format!("/scripts/{script_hash}");
        match self.fetch(Endpoint::Scripts, &path).await? {
            Conditional::Modified(body) => decode_script(&body).map(Conditional::Modified),
            Conditional::NotModified => Ok(Conditional::NotModified),
        }
    }

    async fn get_datum(
        &self,
        datum_hash: &str,
    ) -> Result<Conditional<Option<DatumResponse>>, KupoError> {
        let path = format!("/datums/{datum_hash}");
        match self.fetch(Endpoint::Datums, &path).await? {
            Conditional::Modified(body) => decode_datum(&body).map(Conditional::Modified),
            Conditional::NotModified => Ok(Conditional::NotModified),
        }
    }
}

// Segments are interpolated verbatim; wildcards like `*` must reach the
// indexer unescaped.
fn metadata_path(slot_no: u64, transaction_id: Option<&str>) -> String {
    match transaction_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("/metadata/{slot_no}?transaction_id={id}"),
        None => format!("/metadata/{slot_no}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_path_without_transaction_id() {
        assert_eq!(metadata_path(16_000_000, None), "/metadata/16000000");
    }

    #[test]
    fn metadata_path_with_transaction_id() {
        assert_eq!(
            metadata_path(42, Some("c1a2")),
            "/metadata/42?transaction_id=c1a2"
        );
    }

    #[test]
    fn metadata_path_ignores_empty_transaction_id() {
        assert_eq!(metadata_path(42, Some("")), "/metadata/42");
    }

    #[test]
    fn new_normalises_base_url() {
        let client = HttpKupoClient::new("http://127.0.0.1:1442/").expect("client must build");
        assert_eq!(client.base_url(), "http://127.0.0.1:1442");
    }

    #[test]
    fn new_rejects_bad_url() {
        let err = HttpKupoClient::new("not a url").expect_err("must reject");
        assert!(matches!(err, KupoError::InvalidConfig(_)));
    }
}
