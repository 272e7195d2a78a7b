use eyre::WrapErr;
use kupo_client::{Conditional, KupoApi};
use serde::Serialize;

use crate::cli::Command;

/// Run a single query and render its result as JSON.
///
/// Returns `None` when the indexer answered `304 Not Modified`.
pub async fn run(api: &dyn KupoApi, command: Command) -> eyre::Result<Option<serde_json::Value>> {
    match command {
        Command::Matches { pattern: None } => {
            let matches = api.get_all_matches().await.wrap_err("fetch all matches")?;
            tracing::info!(count = matches.len(), "fetched matches");
            render(&matches).map(Some)
        }
        Command::Matches {
            pattern: Some(pattern),
        } => {
            let matches = api
                .get_matches(&pattern)
                .await
                .wrap_err_with(|| format!("fetch matches for pattern `{pattern}`"))?;
            tracing::info!(%pattern, count = matches.len(), "fetched matches");
            render(&matches).map(Some)
        }
        Command::Metadata {
            slot_no,
            transaction_id,
        } => {
            let metadata = api
                .get_metadata(slot_no, transaction_id.as_deref())
                .await
                .wrap_err_with(|| format!("fetch metadata at slot {slot_no}"))?;
            render_conditional(metadata)
        }
        Command::Patterns { pattern: None } => {
            let patterns = api.get_all_patterns().await.wrap_err("fetch patterns")?;
            render(&patterns).map(Some)
        }
        Command::Patterns {
            pattern: Some(pattern),
        } => {
            let patterns = api
                .get_patterns(&pattern)
                .await
                .wrap_err_with(|| format!("fetch patterns overlapping `{pattern}`"))?;
            render(&patterns).map(Some)
        }
        Command::Script { hash } => {
            let script = api
                .get_script(&hash)
                .await
                .wrap_err_with(|| format!("fetch script {hash}"))?;
            render_conditional(script)
        }
        Command::Datum { hash } => {
            let datum = api
                .get_datum(&hash)
                .await
                .wrap_err_with(|| format!("fetch datum {hash}"))?;
            render_conditional(datum)
        }
    }
}

fn render<T: Serialize>(value: &T) -> eyre::Result<serde_json::Value> {
    serde_json::to_value(value).wrap_err("encode result as JSON")
}

fn render_conditional<T: Serialize>(
    result: Conditional<T>,
) -> eyre::Result<Option<serde_json::Value>> {
    match result {
        Conditional::Modified(value) => render(&value).map(Some),
        Conditional::NotModified => {
            tracing::info!("not modified since last request");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use kupo_client::{
        DatumResponse, Endpoint, KupoError, Match, MetadataItem, Pattern, ScriptResponse,
    };
    use serde_json::json;

    use super::*;

    /// Canned `KupoApi` that records the calls it receives.
    #[derive(Default)]
    struct StubKupo {
        calls: Mutex<Vec<String>>,
    }

    impl StubKupo {
        fn record(&self, call: String) {
            self.calls.lock().expect("lock must not be poisoned").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock must not be poisoned").clone()
        }
    }

    #[async_trait]
    impl KupoApi for StubKupo {
        async fn get_all_matches(&self) -> Result<Vec<Match>, KupoError> {
            self.record("matches".into());
            Ok(Vec::new())
        }

        async fn get_matches(&self, pattern: &str) -> Result<Vec<Match>, KupoError> {
            self.record(format!("matches/{pattern}"));
            Err(KupoError::Status {
                endpoint: Endpoint::Matches,
                status: 400,
            })
        }

        async fn get_metadata(
            &self,
            slot_no: u64,
            transaction_id: Option<&str>,
        ) -> Result<Conditional<Vec<MetadataItem>>, KupoError> {
            self.record(format!("metadata/{slot_no}?{}", transaction_id.unwrap_or("")));
            if slot_no == 0 {
                return Ok(Conditional::NotModified);
            }
            Ok(Conditional::Modified(vec![MetadataItem {
                hash: "aa".into(),
                raw: vec![0xa0],
                schema: json!({}),
            }]))
        }

        async fn get_all_patterns(&self) -> Result<Vec<Pattern>, KupoError> {
            self.record("patterns".into());
            Ok(vec![Pattern::from("*")])
        }

        async fn get_patterns(&self, pattern: &str) -> Result<Vec<Pattern>, KupoError> {
            self.record(format!("patterns/{pattern}"));
            Ok(vec![Pattern::from(pattern)])
        }

        async fn get_script(
            &self,
            script_hash: &str,
        ) -> Result<Conditional<Option<ScriptResponse>>, KupoError> {
            self.record(format!("scripts/{script_hash}"));
            Ok(Conditional::Modified(None))
        }

        async fn get_datum(
            &self,
            datum_hash: &str,
        ) -> Result<Conditional<Option<DatumResponse>>, KupoError> {
            self.record(format!("datums/{datum_hash}"));
            Ok(Conditional::Modified(Some(DatumResponse {
                datum: "d87980".into(),
            })))
        }
    }

    #[tokio::test]
    async fn patterns_without_filter_lists_all() {
        let stub = StubKupo::default();
        let out = run(&stub, Command::Patterns { pattern: None })
            .await
            .expect("command must succeed");
        assert_eq!(out, Some(json!(["*"])));
        assert_eq!(stub.calls(), vec!["patterns"]);
    }

    #[tokio::test]
    async fn patterns_with_filter_uses_filter_endpoint() {
        let stub = StubKupo::default();
        let out = run(
            &stub,
            Command::Patterns {
                pattern: Some("*/*".into()),
            },
        )
        .await
        .expect("command must succeed");
        assert_eq!(out, Some(json!(["*/*"])));
        assert_eq!(stub.calls(), vec!["patterns/*/*"]);
    }

    #[tokio::test]
    async fn metadata_renders_raw_as_hex() {
        let stub = StubKupo::default();
        let out = run(
            &stub,
            Command::Metadata {
                slot_no: 7,
                transaction_id: Some("c1".into()),
            },
        )
        .await
        .expect("command must succeed")
        .expect("metadata must be fresh");
        assert_eq!(out[0]["raw"], "a0");
        assert_eq!(stub.calls(), vec!["metadata/7?c1"]);
    }

    #[tokio::test]
    async fn not_modified_renders_nothing() {
        let stub = StubKupo::default();
        let out = run(
            &stub,
            Command::Metadata {
                slot_no: 0,
                transaction_id: None,
            },
        )
        .await
        .expect("304 is not an error");
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn unknown_script_renders_null() {
        let stub = StubKupo::default();
        let out = run(&stub, Command::Script { hash: "ff".into() })
            .await
            .expect("command must succeed");
        assert_eq!(out, Some(serde_json::Value::Null));
    }

    #[tokio::test]
    async fn datum_renders_response() {
        let stub = StubKupo::default();
        let out = run(&stub, Command::Datum { hash: "ab".into() })
            .await
            .expect("command must succeed");
        assert_eq!(out, Some(json!({"datum": "d87980"})));
    }

    #[tokio::test]
    async fn client_errors_carry_context() {
        let stub = StubKupo::default();
        let err = run(
            &stub,
            Command::Matches {
                pattern: Some("bad".into()),
            },
        )
        .await
        .expect_err("status error must propagate");
        let chain = format!("{err:#}");
        assert!(chain.contains("fetch matches for pattern `bad`"), "got: {chain}");
        assert!(chain.contains("unexpected status 400 from /matches"), "got: {chain}");
    }
}
