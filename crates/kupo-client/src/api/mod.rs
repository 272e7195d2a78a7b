//! Kupo HTTP API abstraction layer.
//!
//! Defines the [`KupoApi`] trait and provides the `reqwest`-backed
//! implementation ([`HttpKupoClient`]).

mod http_adapter;

pub use http_adapter::{ClientConfig, HttpKupoClient};

use async_trait::async_trait;

use crate::error::KupoError;
use crate::types::{DatumResponse, Match, MetadataItem, Pattern, ScriptResponse};

// ==============================================================================
// Endpoints
// ==============================================================================

/// The fixed set of endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Matches,
    Metadata,
    Patterns,
    Scripts,
    Datums,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::Metadata => "metadata",
            Self::Patterns => "patterns",
            Self::Scripts => "scripts",
            Self::Datums => "datums",
        }
    }

    /// Whether a 304 from this endpoint is a [`Conditional::NotModified`]
    /// outcome rather than a status error.
    pub fn supports_not_modified(self) -> bool {
        matches!(self, Self::Metadata | Self::Scripts | Self::Datums)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.as_str())
    }
}

// ==============================================================================
// Conditional Results
// ==============================================================================

/// Outcome of a fetch that the indexer may answer with `304 Not Modified`.
#[derive(Debug, Clone, PartialEq)]
pub enum Conditional<T> {
    Modified(T),
    NotModified,
}

impl<T> Conditional<T> {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified)
    }

    /// The fetched value, or `None` on `304`.
    pub fn modified(self) -> Option<T> {
        match self {
            Self::Modified(value) => Some(value),
            Self::NotModified => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conditional<U> {
        match self {
            Self::Modified(value) => Conditional::Modified(f(value)),
            Self::NotModified => Conditional::NotModified,
        }
    }
}

// ==============================================================================
// Client Trait
// ==============================================================================

/// The query surface of a Kupo indexer.
///
/// Every call is a single independent GET round trip; a failed call leaves
/// the implementation usable for the next one.
#[async_trait]
pub trait KupoApi: Send + Sync {
    /// Fetch every match the indexer knows about, spent or unspent.
    async fn get_all_matches(&self) -> Result<Vec<Match>, KupoError>;

    /// Fetch matches for `pattern`. The pattern is placed in the URL path
    /// as-is, so it must already be URL-safe.
    async fn get_matches(&self, pattern: &str) -> Result<Vec<Match>, KupoError>;

    /// Fetch metadata of the transactions at `slot_no`, optionally narrowed
    /// to one transaction. An empty `transaction_id` counts as absent.
    ///
    /// Items are all-or-nothing: one bad item fails the whole call.
    async fn get_metadata(
        &self,
        slot_no: u64,
        transaction_id: Option<&str>,
    ) -> Result<Conditional<Vec<MetadataItem>>, KupoError>;

    /// Fetch every pattern the indexer is currently following.
    async fn get_all_patterns(&self) -> Result<Vec<Pattern>, KupoError>;

    /// Fetch the registered patterns that overlap `pattern`.
    async fn get_patterns(&self, pattern: &str) -> Result<Vec<Pattern>, KupoError>;

    /// Look up a script by hash. `Modified(None)` means the indexer has no
    /// such script.
    async fn get_script(
        &self,
        script_hash: &str,
    ) -> Result<Conditional<Option<ScriptResponse>>, KupoError>;

    /// Look up a datum by hash. `Modified(None)` means the indexer has no
    /// such datum.
    async fn get_datum(
        &self,
        datum_hash: &str,
    ) -> Result<Conditional<Option<DatumResponse>>, KupoError>;
}
