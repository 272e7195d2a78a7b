use std::time::Duration;

use reqwest::Url;

use crate::error::KupoError;

/// Overall request timeout applied to every call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings owned by a single [`HttpKupoClient`](super::HttpKupoClient).
///
/// Each client builds its own `reqwest::Client` from this, so two clients
/// never share timeouts or headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("kupo-client/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(super) fn build_http_client(&self) -> Result<reqwest::Client, KupoError> {
        if self.timeout.is_zero() {
            return Err(KupoError::InvalidConfig(
                "request timeout must be greater than zero".to_owned(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(KupoError::InvalidConfig(
                "connect timeout must be greater than zero".to_owned(),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}

/// Validate the indexer base URL and normalise away trailing slashes so
/// endpoint paths can be appended verbatim.
pub(super) fn parse_base_url(base_url: &str) -> Result<String, KupoError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        KupoError::InvalidConfig(format!(
            "invalid kupo url `{base_url}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(KupoError::InvalidConfig(format!(
                "unsupported kupo url scheme `{other}`; expected http or https"
            )));
        }
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(KupoError::InvalidConfig(format!(
            "kupo url `{base_url}` must not carry a query or fragment"
        )));
    }

    Ok(base_url.trim_end_matches('/').to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_http() {
        let parsed = parse_base_url("http://127.0.0.1:1442").expect("should parse");
        assert_eq!(parsed, "http://127.0.0.1:1442");
    }

    #[test]
    fn parse_base_url_strips_trailing_slashes() {
        let parsed = parse_base_url("https://kupo.example.com/v1//").expect("should parse");
        assert_eq!(parsed, "https://kupo.example.com/v1");
    }

    #[test]
    fn parse_base_url_invalid_scheme() {
        let err = parse_base_url("ftp://example.com").expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported kupo url scheme"));
    }

    #[test]
    fn parse_base_url_rejects_relative() {
        let err = parse_base_url("localhost/matches").expect_err("must reject relative url");
        assert!(matches!(err, KupoError::InvalidConfig(_)));
    }

    #[test]
    fn parse_base_url_rejects_query() {
        let err = parse_base_url("http://host:1442?token=abc").expect_err("must reject query");
        assert!(err.to_string().contains("must not carry a query"));
    }

    #[test]
    fn default_config_uses_five_minute_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("kupo-client/"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .build_http_client()
            .expect_err("zero timeout must be rejected");
        assert!(err.to_string().contains("request timeout"));
    }

    #[test]
    fn zero_connect_timeout_is_rejected() {
        let err = ClientConfig::default()
            .with_connect_timeout(Duration::ZERO)
            .build_http_client()
            .expect_err("zero connect timeout must be rejected");
        assert!(err.to_string().contains("connect timeout"));
    }
}
