//! Domain types returned by the Kupo HTTP API.
//!
//! Matches, chain points and patterns decode straight from the wire. Metadata,
//! script and datum records go through private wire structs in
//! `api::http_adapter::parsing` first, so that required fields are checked
//! before a value is handed to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::KupoError;

// ==============================================================================
// Chain Points
// ==============================================================================

/// A position on the chain: slot number plus block header hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainPoint {
    pub slot_no: u64,
    pub header_hash: String,
}

// ==============================================================================
// Matches
// ==============================================================================

/// Native asset quantities keyed by `policy_id.asset_name`.
pub type Assets = BTreeMap<String, u64>;

/// Lovelace amount plus any native assets locked in an output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub coins: u64,
    #[serde(default)]
    pub assets: Assets,
}

/// How a datum is attached to an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatumType {
    Hash,
    Inline,
}

impl std::fmt::Display for DatumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Inline => write!(f, "inline"),
        }
    }
}

/// A transaction output matched by one of the indexer's patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub transaction_index: u32,
    pub transaction_id: String,
    pub output_index: u32,
    pub address: String,
    pub value: Value,
    pub datum_hash: Option<String>,
    pub datum_type: Option<DatumType>,
    pub script_hash: Option<String>,
    pub created_at: ChainPoint,
    /// Set once the output has been consumed; `None` means still unspent.
    pub spent_at: Option<ChainPoint>,
}

impl Match {
    pub fn is_spent(&self) -> bool {
        self.spent_at.is_some()
    }

    /// `transaction_id#output_index`, the usual way outputs are referenced.
    pub fn output_reference(&self) -> String {
        format!("{}#{}", self.transaction_id, self.output_index)
    }
}

// ==============================================================================
// Metadata
// ==============================================================================

/// Transaction metadata attached to a transaction at a given slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataItem {
    pub hash: String,
    /// CBOR-encoded metadata, decoded from the hex string on the wire.
    #[serde(serialize_with = "serialize_hex")]
    pub raw: Vec<u8>,
    /// Detailed-schema JSON rendition of `raw`, passed through untouched.
    pub schema: serde_json::Value,
}

// ==============================================================================
// Patterns
// ==============================================================================

/// An indexer match pattern such as `addr1.../*` or `*/*`.
///
/// The client never interprets patterns; they are carried as opaque strings.
/// `#[serde(transparent)]` keeps the wire form a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(pub String);

impl Pattern {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::ops::Deref for Pattern {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ==============================================================================
// Scripts & Datums
// ==============================================================================

/// A script looked up by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResponse {
    /// `native`, `plutus:v1`, `plutus:v2`, ...
    pub language: String,
    /// Hex-encoded serialized script.
    pub script: String,
}

impl ScriptResponse {
    pub fn script_bytes(&self) -> Result<Vec<u8>, KupoError> {
        hex::decode(&self.script).map_err(|e| KupoError::decode("script", e))
    }
}

/// A datum looked up by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatumResponse {
    /// Hex-encoded CBOR datum.
    pub datum: String,
}

impl DatumResponse {
    pub fn datum_bytes(&self) -> Result<Vec<u8>, KupoError> {
        hex::decode(&self.datum).map_err(|e| KupoError::decode("datum", e))
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
