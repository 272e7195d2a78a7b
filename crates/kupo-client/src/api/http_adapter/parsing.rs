use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::KupoError;
use crate::types::{DatumResponse, Match, MetadataItem, Pattern, ScriptResponse};

// ==============================================================================
// Wire Shapes
// ==============================================================================

// Required fields are `Option` here so that a missing field surfaces as a
// `Validation` error naming it, rather than a generic serde failure.

#[derive(Deserialize)]
struct MetadataWire {
    hash: Option<String>,
    raw: Option<String>,
    #[serde(default, deserialize_with = "present")]
    schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ScriptWire {
    language: Option<String>,
    script: Option<String>,
}

#[derive(Deserialize)]
struct DatumWire {
    datum: Option<String>,
}

/// Distinguish an explicit `null` (present) from a missing key (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

// ==============================================================================
// Decoders
// ==============================================================================

pub(super) fn decode_json<T: DeserializeOwned>(
    body: &str,
    context: &'static str,
) -> Result<T, KupoError> {
    serde_json::from_str(body).map_err(|e| KupoError::decode(context, e))
}

pub(super) fn decode_matches(body: &str) -> Result<Vec<Match>, KupoError> {
    decode_json(body, "matches")
}

pub(super) fn decode_patterns(body: &str) -> Result<Vec<Pattern>, KupoError> {
    decode_json(body, "patterns")
}

/// Decode a metadata listing. The first item that fails hex decoding or
/// validation fails the whole listing.
pub(super) fn decode_metadata(body: &str) -> Result<Vec<MetadataItem>, KupoError> {
    let wire: Vec<MetadataWire> = decode_json(body, "metadata")?;
    wire.into_iter().map(metadata_item_from_wire).collect()
}

fn metadata_item_from_wire(wire: MetadataWire) -> Result<MetadataItem, KupoError> {
    const RECORD: &str = "metadata item";

    let raw = hex::decode(wire.raw.unwrap_or_default())
        .map_err(|e| KupoError::decode("metadata raw payload", e))?;
    let hash = require(wire.hash, RECORD, "hash")?;
    if raw.is_empty() {
        return Err(KupoError::Validation {
            record: RECORD,
            field: "raw",
        });
    }
    let schema = wire.schema.ok_or(KupoError::Validation {
        record: RECORD,
        field: "schema",
    })?;

    Ok(MetadataItem { hash, raw, schema })
}

/// Decode a script lookup. A `null` body means the script is unknown.
pub(super) fn decode_script(body: &str) -> Result<Option<ScriptResponse>, KupoError> {
    const RECORD: &str = "script response";

    let wire: Option<ScriptWire> = decode_json(body, RECORD)?;
    wire.map(|wire| -> Result<_, KupoError> {
        Ok(ScriptResponse {
            language: require(wire.language, RECORD, "language")?,
            script: require(wire.script, RECORD, "script")?,
        })
    })
    .transpose()
}

/// Decode a datum lookup. A `null` body means the datum is unknown.
pub(super) fn decode_datum(body: &str) -> Result<Option<DatumResponse>, KupoError> {
    const RECORD: &str = "datum response";

    let wire: Option<DatumWire> = decode_json(body, RECORD)?;
    wire.map(|wire| -> Result<_, KupoError> {
        Ok(DatumResponse {
            datum: require(wire.datum, RECORD, "datum")?,
        })
    })
    .transpose()
}

// Absent and empty are both treated as missing.
fn require(
    value: Option<String>,
    record: &'static str,
    field: &'static str,
) -> Result<String, KupoError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(KupoError::Validation { record, field })
}
